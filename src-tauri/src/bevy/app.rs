//! Bevy application setup and execution
//!
//! This module handles the creation and configuration of the Bevy app,
//! including plugin registration and system scheduling.

use bevy::{
    app::{App, ScheduleRunnerPlugin},
    prelude::*,
    time::TimeSystems,
    window::ExitCondition,
};
use std::io;
use std::thread;
use std::time::Duration;
use tracing::info;

use crate::bevy::plugins::ImageCopyPlugin;
use crate::bevy::resources::*;
use crate::bevy::systems::*;
use crate::config::{PRE_ROLL_FRAMES, TARGET_FPS};
use crate::tauri_bridge::shared_state::{
    SharedFrameBuffer, SharedPerfStats, SharedPlayback, SharedScenePose,
};

/// Shared cells handed from the Tauri side to the Bevy thread
#[derive(Clone, Default)]
pub struct BridgeHandles {
    pub frame_buffer: SharedFrameBuffer,
    pub perf_stats: SharedPerfStats,
    pub scene_pose: SharedScenePose,
    pub playback: SharedPlayback,
}

/// Create and configure the Bevy application
pub fn create_app(handles: BridgeHandles) -> App {
    let mut app = App::new();

    // Use DefaultPlugins but configure for headless operation
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    // Add schedule runner for controlled frame rate
    app.add_plugins(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
        1.0 / TARGET_FPS,
    )));

    app.add_plugins(ImageCopyPlugin);

    app.add_systems(Startup, setup_scene);
    app.add_systems(First, apply_playback_request.before(TimeSystems));
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
    app.add_systems(Last, extract_and_process_frame);

    app.insert_resource(FrameBufferRes(handles.frame_buffer));
    app.insert_resource(PerfStatsRes(handles.perf_stats));
    app.insert_resource(ScenePoseRes(handles.scene_pose));
    app.insert_resource(PlaybackRes(handles.playback));
    app.insert_resource(FrameCount::default());
    app.insert_resource(PreRollFrames(PRE_ROLL_FRAMES));
    app.insert_resource(FrameTimings::default());
    app.insert_resource(FrameRateLimiter::new(TARGET_FPS));

    info!(fps = TARGET_FPS, "bevy app configured (headless)");
    app
}

/// Start Bevy in a background thread
pub fn start_bevy(handles: BridgeHandles) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("bevy-render".into())
        .spawn(move || {
            info!("bevy thread started");
            let mut app = create_app(handles);
            app.run();
            info!("bevy render loop exited");
        })
}
