//! Tauri command handlers
//!
//! This module contains all the Tauri command functions that can be invoked
//! from the frontend JavaScript/TypeScript code.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::time::Instant;
use tauri::State;
use tracing::debug;

use super::shared_state::{
    FrameResponse, PerformanceStats, PlaybackRequest, SharedFrameBuffer, SharedPerfStats,
    SharedPlayback, SharedScenePose,
};
use crate::config::{RENDER_HEIGHT, RENDER_WIDTH};
use crate::error::{BridgeError, Result};
use crate::orbit::ScenePose;

/// Get the current rendered frame as Base64-encoded RGBA data
#[tauri::command]
pub fn get_frame(
    state: State<SharedFrameBuffer>,
    perf_state: State<SharedPerfStats>,
) -> Result<FrameResponse> {
    let cmd_start = Instant::now();
    let rgba_data = state.latest()?;
    let data_fetch_time = cmd_start.elapsed().as_secs_f64() * 1000.0;

    let encode_start = Instant::now();
    let data = STANDARD.encode(&rgba_data);
    let encode_time = encode_start.elapsed().as_secs_f64() * 1000.0;

    perf_state.update(|stats| {
        stats.tauri_get_frame_ms = data_fetch_time;
        stats.tauri_serialize_ms = encode_time;
    })?;

    Ok(FrameResponse {
        data,
        width: RENDER_WIDTH,
        height: RENDER_HEIGHT,
    })
}

/// Get the render resolution
#[tauri::command]
pub fn get_render_size() -> (u32, u32) {
    (RENDER_WIDTH, RENDER_HEIGHT)
}

/// Get performance statistics
#[tauri::command]
pub fn get_performance_stats(state: State<SharedPerfStats>) -> Result<PerformanceStats> {
    state.snapshot()
}

/// Pose applied on the most recently rendered frame
#[tauri::command]
pub fn get_scene_pose(state: State<SharedScenePose>) -> Result<ScenePose> {
    state.snapshot()
}

/// Compute the pose for an arbitrary scene time without touching the scene
#[tauri::command]
pub fn evaluate_scene_pose(t: f64) -> Result<ScenePose> {
    evaluate(t)
}

fn evaluate(t: f64) -> Result<ScenePose> {
    if !t.is_finite() || t < 0.0 {
        return Err(BridgeError::InvalidTime(t));
    }
    Ok(ScenePose::at(t))
}

/// Pause or resume the scene clock
#[tauri::command]
pub fn set_animation_paused(state: State<SharedPlayback>, paused: bool) -> Result<()> {
    debug!(paused, "playback requested");
    state.request(paused)
}

#[tauri::command]
pub fn get_animation_paused(state: State<SharedPlayback>) -> Result<PlaybackRequest> {
    state.current()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_rejects_invalid_times() {
        assert!(matches!(evaluate(-0.5), Err(BridgeError::InvalidTime(_))));
        assert!(matches!(evaluate(f64::NAN), Err(BridgeError::InvalidTime(_))));
        assert!(matches!(
            evaluate(f64::INFINITY),
            Err(BridgeError::InvalidTime(_))
        ));
    }

    #[test]
    fn evaluate_matches_pose_functions() {
        assert_eq!(evaluate(7.25).unwrap(), ScenePose::at(7.25));
    }

    #[test]
    fn render_size_matches_config() {
        assert_eq!(get_render_size(), (RENDER_WIDTH, RENDER_HEIGHT));
    }
}
