//! Pause and resume of the scene clock
//!
//! Poses are functions of virtual elapsed time, so pausing the virtual
//! clock freezes every object and resuming continues from the same pose.

use bevy::{prelude::*, time::Virtual};
use tracing::{info, warn};

use crate::bevy::resources::PlaybackRes;

pub fn apply_playback_request(
    playback: Option<Res<PlaybackRes>>,
    mut time: ResMut<Time<Virtual>>,
) {
    let Some(playback) = playback else { return };
    let request = match playback.0.current() {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "could not read playback request");
            return;
        }
    };

    if request.paused == time.is_paused() {
        return;
    }

    if request.paused {
        time.pause();
    } else {
        time.unpause();
    }
    info!(
        paused = request.paused,
        elapsed = time.elapsed_secs_f64(),
        "scene clock toggled"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bevy::components::Rocket;
    use crate::bevy::systems::fly_rocket;
    use crate::tauri_bridge::SharedPlayback;
    use bevy::time::{TimePlugin, TimeSystems, TimeUpdateStrategy};
    use std::time::Duration;

    const STEP: Duration = Duration::from_millis(100);

    fn app(shared: &SharedPlayback) -> App {
        let mut app = App::new();
        app.init_resource::<Time<Virtual>>();
        app.insert_resource(PlaybackRes(shared.clone()));
        app.add_systems(First, apply_playback_request);
        app
    }

    #[test]
    fn follows_the_frontend_request() {
        let shared = SharedPlayback::default();
        let mut app = app(&shared);

        app.update();
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());

        shared.request(true).unwrap();
        app.update();
        assert!(app.world().resource::<Time<Virtual>>().is_paused());

        shared.request(false).unwrap();
        app.update();
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    }

    /// App whose clock advances by `STEP` on every update
    fn clocked_app(shared: &SharedPlayback) -> App {
        let mut app = App::new();
        app.add_plugins(TimePlugin);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));
        app.insert_resource(PlaybackRes(shared.clone()));
        app.add_systems(First, apply_playback_request.before(TimeSystems));
        app.add_systems(Update, fly_rocket);
        app.world_mut().spawn((Transform::default(), Rocket));
        app
    }

    fn rocket_transform(app: &mut App) -> Transform {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<Rocket>>();
        *query.single(world).unwrap()
    }

    fn elapsed(app: &App) -> f64 {
        app.world().resource::<Time<Virtual>>().elapsed_secs_f64()
    }

    #[test]
    fn pausing_freezes_the_rocket_and_resuming_continues() {
        let shared = SharedPlayback::default();
        let mut app = clocked_app(&shared);

        for _ in 0..20 {
            app.update();
        }
        let running = rocket_transform(&mut app);
        assert!(elapsed(&app) > 1.0);

        shared.request(true).unwrap();
        app.update();
        let paused_at = elapsed(&app);
        let frozen = rocket_transform(&mut app);
        assert_eq!(frozen, running);

        for _ in 0..10 {
            app.update();
            assert_eq!(rocket_transform(&mut app), frozen);
            assert_eq!(elapsed(&app), paused_at);
        }

        shared.request(false).unwrap();
        app.update();
        let resumed_at = elapsed(&app);
        assert!(resumed_at > paused_at);
        assert!(resumed_at - paused_at <= STEP.as_secs_f64() + 1e-9);
        assert_ne!(rocket_transform(&mut app), frozen);
    }
}
