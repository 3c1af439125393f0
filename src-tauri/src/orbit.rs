//! Orbit pose functions
//!
//! Every pose in the hero scene is a pure function of the elapsed scene time
//! `t` in seconds. Nothing here keeps state between frames, so evaluating the
//! same `t` twice gives the same pose and pausing the clock freezes the scene.
//!
//! Phases are computed in `f64` and narrowed to `f32` only for the engine's
//! transforms, which keeps long-running scenes from drifting.

use bevy::math::{DVec3, EulerRot, Quat};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::{float_motion, orbit, trail};

/// Rotation of the planet about the vertical axis (radians)
pub fn planet_spin(t: f64) -> f64 {
    t * orbit::PLANET_SPIN_RATE
}

/// Rotation of the primary ring: tilt about X and roll about Z
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingPose {
    pub tilt: f64,
    pub roll: f64,
}

impl RingPose {
    /// Rotation with X applied before Z, matching the scene's XYZ order
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.tilt as f32, 0.0, self.roll as f32)
    }
}

pub fn primary_ring(t: f64) -> RingPose {
    RingPose {
        tilt: FRAC_PI_2 + (t * orbit::RING_WOBBLE_RATE).sin() * orbit::RING_WOBBLE_AMPLITUDE,
        roll: t * orbit::RING_ROLL_RATE,
    }
}

/// Fixed tilt of the secondary ring; it is never animated
pub fn secondary_ring() -> RingPose {
    RingPose {
        tilt: PI / orbit::SECONDARY_RING_TILT_DIVISOR,
        roll: 0.0,
    }
}

/// Point on the rocket's path at time `t`
pub fn rocket_position(t: f64) -> DVec3 {
    let phase = t * orbit::ROCKET_RATE;
    DVec3::new(
        phase.sin() * orbit::ROCKET_RADIUS,
        phase.sin() * orbit::ROCKET_LIFT,
        phase.cos() * orbit::ROCKET_RADIUS,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocketPose {
    pub position: DVec3,
    /// Point on the path slightly ahead of `position` that the rocket faces
    pub look_target: DVec3,
}

impl RocketPose {
    /// Unit vector from the rocket towards its look target
    pub fn facing(&self) -> DVec3 {
        (self.look_target - self.position).normalize_or_zero()
    }
}

pub fn rocket(t: f64) -> RocketPose {
    RocketPose {
        position: rocket_position(t),
        look_target: rocket_position(t + orbit::ROCKET_LOOK_AHEAD),
    }
}

/// Bob and wobble applied to the group holding the planet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatOffset {
    pub lift: f64,
    pub wobble: DVec3,
}

impl FloatOffset {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.wobble.x as f32,
            self.wobble.y as f32,
            self.wobble.z as f32,
        )
    }
}

pub fn float_offset(t: f64) -> FloatOffset {
    let s = t / 4.0 * float_motion::SPEED;
    let ri = float_motion::ROTATION_INTENSITY;
    FloatOffset {
        lift: s.sin() / 10.0 * float_motion::FLOAT_INTENSITY,
        wobble: DVec3::new(s.cos() / 8.0 * ri, s.sin() / 8.0 * ri, s.sin() / 20.0 * ri),
    }
}

/// Position of trail bead `index` (0 is the newest)
///
/// Beads sample the rocket path behind `t`; samples before the scene started
/// collapse onto the starting point.
pub fn trail_bead(t: f64, index: usize) -> DVec3 {
    let sample = (t - index as f64 * trail::SPACING).max(0.0);
    rocket_position(sample)
}

/// Opacity and scale factor of trail bead `index`
pub fn trail_attenuation(index: usize) -> f32 {
    let freshness = 1.0 - index as f32 / trail::BEADS as f32;
    freshness * freshness
}

/// Everything applied to the scene for one value of `t`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenePose {
    pub elapsed: f64,
    pub planet_spin: f64,
    pub ring_tilt: f64,
    pub ring_roll: f64,
    pub secondary_ring_tilt: f64,
    pub rocket_position: [f32; 3],
    pub rocket_facing: [f32; 3],
    pub float_lift: f64,
    /// Euler XYZ wobble of the floating group (radians)
    pub float_wobble: [f32; 3],
    /// Bead positions, newest first
    pub trail: Vec<[f32; 3]>,
}

impl ScenePose {
    pub fn at(t: f64) -> Self {
        let ring = primary_ring(t);
        let rocket = rocket(t);
        let float = float_offset(t);
        Self {
            elapsed: t,
            planet_spin: planet_spin(t),
            ring_tilt: ring.tilt,
            ring_roll: ring.roll,
            secondary_ring_tilt: secondary_ring().tilt,
            rocket_position: rocket.position.as_vec3().to_array(),
            rocket_facing: rocket.facing().as_vec3().to_array(),
            float_lift: float.lift,
            float_wobble: float.wobble.as_vec3().to_array(),
            trail: (0..trail::BEADS)
                .map(|index| trail_bead(t, index).as_vec3().to_array())
                .collect(),
        }
    }
}
