//! Animation systems
//!
//! Each system reads the scene clock and writes the pose from
//! [`crate::orbit`] straight into the entity's transform. Nothing is
//! accumulated across frames.

use bevy::{math::Quat, prelude::*, time::Time};
use tracing::warn;

use crate::bevy::components::{FloatingGroup, Planet, PrimaryRing, Rocket, TrailBead};
use crate::bevy::resources::ScenePoseRes;
use crate::orbit::{self, ScenePose};

fn scene_time(time: &Time) -> f64 {
    time.elapsed_secs_f64()
}

pub fn spin_planet(time: Res<Time>, mut query: Query<&mut Transform, With<Planet>>) {
    let angle = orbit::planet_spin(scene_time(&time)) as f32;
    for mut transform in query.iter_mut() {
        transform.rotation = Quat::from_rotation_y(angle);
    }
}

pub fn float_planet(time: Res<Time>, mut query: Query<&mut Transform, With<FloatingGroup>>) {
    let offset = orbit::float_offset(scene_time(&time));
    for mut transform in query.iter_mut() {
        transform.translation.y = offset.lift as f32;
        transform.rotation = offset.rotation();
    }
}

pub fn swing_ring(time: Res<Time>, mut query: Query<&mut Transform, With<PrimaryRing>>) {
    let rotation = orbit::primary_ring(scene_time(&time)).rotation();
    for mut transform in query.iter_mut() {
        transform.rotation = rotation;
    }
}

pub fn fly_rocket(time: Res<Time>, mut query: Query<&mut Transform, With<Rocket>>) {
    let pose = orbit::rocket(scene_time(&time));
    let target = pose.look_target.as_vec3();
    for mut transform in query.iter_mut() {
        transform.translation = pose.position.as_vec3();
        transform.look_at(target, Vec3::Y);
    }
}

pub fn trail_rocket(time: Res<Time>, mut query: Query<(&mut Transform, &TrailBead)>) {
    let t = scene_time(&time);
    for (mut transform, bead) in query.iter_mut() {
        transform.translation = orbit::trail_bead(t, bead.0).as_vec3();
    }
}

/// Publish the pose applied this frame for the frontend
pub fn publish_scene_pose(time: Res<Time>, shared: Option<Res<ScenePoseRes>>) {
    let Some(shared) = shared else { return };
    if let Err(err) = shared.0.publish(ScenePose::at(scene_time(&time))) {
        warn!(%err, "could not publish scene pose");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tauri_bridge::SharedScenePose;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.add_systems(
            Update,
            (
                spin_planet,
                float_planet,
                swing_ring,
                fly_rocket,
                trail_rocket,
                publish_scene_pose,
            ),
        );
        app
    }

    fn advance(app: &mut App, secs: f64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f64(secs));
        app.update();
    }

    fn transform_of<C: Component>(app: &mut App) -> Transform {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<C>>();
        *query.single(world).unwrap()
    }

    #[test]
    fn systems_apply_pure_poses() {
        let mut app = app();
        app.world_mut().spawn((Transform::default(), Planet));
        app.world_mut().spawn((Transform::default(), Rocket));
        app.world_mut().spawn((Transform::default(), PrimaryRing));

        advance(&mut app, 3.0);

        let t = app.world().resource::<Time>().elapsed_secs_f64();
        let planet = transform_of::<Planet>(&mut app);
        let expected = Quat::from_rotation_y(orbit::planet_spin(t) as f32);
        assert!(planet.rotation.angle_between(expected) < 1e-5);

        let rocket = transform_of::<Rocket>(&mut app);
        let pose = orbit::rocket(t);
        assert!(rocket.translation.distance(pose.position.as_vec3()) < 1e-5);
        assert!(rocket.forward().distance(pose.facing().as_vec3()) < 1e-4);

        let ring = transform_of::<PrimaryRing>(&mut app);
        assert!(ring.rotation.angle_between(orbit::primary_ring(t).rotation()) < 1e-5);
    }

    #[test]
    fn trail_beads_follow_the_path() {
        let mut app = app();
        for index in 0..4 {
            app.world_mut().spawn((Transform::default(), TrailBead(index)));
        }

        advance(&mut app, 2.0);

        let t = app.world().resource::<Time>().elapsed_secs_f64();
        let world = app.world_mut();
        let mut query = world.query::<(&Transform, &TrailBead)>();
        for (transform, bead) in query.iter(world) {
            let expected = orbit::trail_bead(t, bead.0).as_vec3();
            assert!(transform.translation.distance(expected) < 1e-5);
        }
    }

    #[test]
    fn publishes_the_applied_pose() {
        let shared = SharedScenePose::default();
        let mut app = app();
        app.insert_resource(ScenePoseRes(shared.clone()));

        advance(&mut app, 0.75);

        let t = app.world().resource::<Time>().elapsed_secs_f64();
        assert_eq!(shared.snapshot().unwrap(), ScenePose::at(t));
    }
}
