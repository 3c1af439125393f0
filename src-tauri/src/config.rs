//! Configuration constants for the orbit hero scene
//!
//! This module contains all tunable parameters: render resolution, frame
//! pacing, the orbit formulas' rates and radii, scene dressing, and
//! performance/logging settings.

/// Width of the offscreen render target in pixels
pub const RENDER_WIDTH: u32 = 800;

/// Height of the offscreen render target in pixels
pub const RENDER_HEIGHT: u32 = 600;

/// Target frames per second for the Bevy render loop
pub const TARGET_FPS: f64 = 60.0;

/// Number of pre-roll frames to skip before starting output
/// This allows the scene to fully load and stabilize
pub const PRE_ROLL_FRAMES: u32 = 30;

/// Hero camera placement
pub mod camera {
    /// Camera position, looking at the origin
    pub const POSITION: [f32; 3] = [0.0, 0.0, 7.0];

    /// Vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 40.0;

    /// Background colour behind the scene (sRGB)
    pub const CLEAR_COLOR: [f32; 3] = [0.012, 0.0, 0.078];
}

/// Orbit animation rates and radii
pub mod orbit {
    /// Angular rate of the rocket's orbit phase (rad/s)
    pub const ROCKET_RATE: f64 = 0.5;

    /// Radius of the rocket path projected onto the x-z plane
    pub const ROCKET_RADIUS: f64 = 3.5;

    /// Vertical amplitude of the rocket path
    pub const ROCKET_LIFT: f64 = 1.5;

    /// Look-ahead used to orient the rocket along its path (seconds)
    pub const ROCKET_LOOK_AHEAD: f64 = 0.1;

    /// Planet spin rate about the vertical axis (rad/s)
    pub const PLANET_SPIN_RATE: f64 = 0.05;

    /// Primary ring roll rate (rad/s)
    pub const RING_ROLL_RATE: f64 = 0.1;

    /// Primary ring tilt wobble frequency (rad/s)
    pub const RING_WOBBLE_RATE: f64 = 0.2;

    /// Primary ring tilt wobble amplitude (radians)
    pub const RING_WOBBLE_AMPLITUDE: f64 = 0.1;

    /// Divisor of pi giving the secondary ring's fixed tilt
    pub const SECONDARY_RING_TILT_DIVISOR: f64 = 1.8;
}

/// Floating motion of the planet group
pub mod float_motion {
    pub const SPEED: f64 = 2.0;
    pub const ROTATION_INTENSITY: f64 = 0.2;
    pub const FLOAT_INTENSITY: f64 = 0.5;
}

/// Rocket trail settings
pub mod trail {
    /// Number of beads drawn behind the rocket
    pub const BEADS: usize = 24;

    /// Time between consecutive beads along the path (seconds)
    pub const SPACING: f64 = 0.08;

    /// Radius of the newest bead
    pub const BEAD_RADIUS: f32 = 0.05;
}

/// Background star field and particle shell
pub mod backdrop {
    pub const STAR_COUNT: usize = 5000;
    pub const STAR_RADIUS: f32 = 100.0;
    pub const STAR_DEPTH: f32 = 50.0;

    /// Fixed seed so the sky is identical between runs
    pub const STAR_SEED: u64 = 0x0b17_a9e0;

    pub const PARTICLE_SHELL_RADIUS: f32 = 6.0;
    pub const PARTICLE_SHELL_SECTORS: u32 = 32;
    pub const PARTICLE_SHELL_STACKS: u32 = 32;
}

/// Scene lighting
pub mod lighting {
    /// Scale from the hero's unit-less intensities to Bevy lumens
    pub const LUMENS_PER_UNIT: f32 = 1_000_000.0;

    pub const AMBIENT_BRIGHTNESS: f32 = 0.2 * 400.0;

    pub const KEY_LIGHT_POSITION: [f32; 3] = [10.0, 10.0, 10.0];
    pub const KEY_LIGHT_INTENSITY: f32 = 2.0;

    pub const FILL_LIGHT_POSITION: [f32; 3] = [-10.0, -5.0, -10.0];
    pub const FILL_LIGHT_INTENSITY: f32 = 1.0;

    /// Engine glow carried by the rocket; its range is only one unit
    pub const ENGINE_GLOW_INTENSITY: f32 = 0.02;
    pub const ENGINE_GLOW_RANGE: f32 = 1.0;
}

/// Performance monitoring settings
pub mod performance {
    /// Interval for printing performance stats (seconds)
    pub const STATS_PRINT_INTERVAL: f64 = 2.0;

    /// Number of frame timing samples to keep for averaging
    pub const FRAME_TIMING_SAMPLES: usize = 60;
}

/// Image compression settings
pub mod compression {
    /// JPEG quality level (0-100, higher = better quality but larger size)
    pub const JPEG_QUALITY: u8 = 85;
}

/// Logging settings
pub mod logging {
    /// Filter used when `RUST_LOG` is not set
    pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";
}
