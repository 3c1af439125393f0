//! Orbit Hero: headless 3D hero backdrop for the agency landing page
//!
//! Bevy renders the hero scene (a floating planet, two orbital rings and a
//! rocket with a fading trail over a star field) offscreen, and Tauri
//! streams the frames to the landing page's web view.
//!
//! Architecture:
//! - Bevy runs in a background thread with NO window (true headless mode)
//! - Every animated pose is a pure function of the scene clock (`orbit`)
//! - GPU texture -> Buffer -> CPU channel -> shared frame buffer
//! - Frames reach the web view via the `frame://` protocol (JPEG) or
//!   Base64-encoded RGBA through a command
//!
//! # Module Structure
//!
//! - `config`: Configuration constants and settings
//! - `orbit`: Pose functions of elapsed time
//! - `error`: Bridge error type
//! - `tauri_bridge`: Bridge layer between Tauri and Bevy
//!   - `shared_state`: Thread-safe data structures
//!   - `commands`: Tauri command handlers
//!   - `protocol`: Custom protocol handlers
//! - `bevy`: Bevy engine integration
//!   - `components`: ECS components
//!   - `resources`: Global resources
//!   - `plugins`: GPU readback plugin
//!   - `point_cloud`: Star field and particle shell meshes
//!   - `systems`: Scene setup, animation, playback and frame extraction
//!   - `app`: Application setup

mod bevy;
mod config;
mod error;
mod orbit;
mod tauri_bridge;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tauri_bridge::protocol::ProtocolState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::logging::DEFAULT_FILTER));
    // A subscriber may already be installed when embedded in a host process
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Main entry point for the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();
    info!("starting orbit hero");

    let handles = bevy::BridgeHandles::default();

    // Frames appear once the pre-roll is over; until then the web view
    // gets "frame not ready"
    if let Err(err) = bevy::start_bevy(handles.clone()) {
        error!(%err, "failed to spawn bevy thread");
        return;
    }

    let protocol_state = ProtocolState {
        buffer: handles.frame_buffer.clone(),
        perf_stats: handles.perf_stats.clone(),
        pose: handles.scene_pose.clone(),
    };

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(handles.frame_buffer)
        .manage(handles.perf_stats)
        .manage(handles.scene_pose)
        .manage(handles.playback)
        // Register custom protocol "frame://" for direct binary transfer
        .register_asynchronous_uri_scheme_protocol("frame", move |_ctx, request, responder| {
            let state = protocol_state.clone();

            // JPEG encoding is slow; keep it off the webview thread
            std::thread::spawn(move || {
                // For Tauri v2, URL format is: http://frame.localhost/path
                let response =
                    tauri_bridge::protocol::handle_frame_protocol(request.uri().path(), &state);
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            tauri_bridge::commands::get_frame,
            tauri_bridge::commands::get_render_size,
            tauri_bridge::commands::get_performance_stats,
            tauri_bridge::commands::get_scene_pose,
            tauri_bridge::commands::evaluate_scene_pose,
            tauri_bridge::commands::set_animation_paused,
            tauri_bridge::commands::get_animation_paused,
        ])
        .run(tauri::generate_context!());

    if let Err(err) = result {
        error!(%err, "tauri application failed");
    }
}
