//! Shared state structures for communication between Tauri and Bevy
//!
//! This module defines thread-safe data structures that allow bidirectional
//! communication between the Tauri frontend and the Bevy render backend.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{BridgeError, Result};
use crate::orbit::ScenePose;

fn lock<'a, T>(cell: &'a Mutex<T>, name: &'static str) -> Result<MutexGuard<'a, T>> {
    cell.lock().map_err(|_| BridgeError::LockPoisoned(name))
}

// =============================================================================
// Frame Buffer
// =============================================================================

/// Thread-safe RGBA frame buffer shared between Bevy and Tauri
/// Stores raw RGBA8 pixel data (4 bytes per pixel)
#[derive(Clone, Default)]
pub struct SharedFrameBuffer(pub Arc<Mutex<Option<Vec<u8>>>>);

impl SharedFrameBuffer {
    pub fn store(&self, rgba: Vec<u8>) -> Result<()> {
        *lock(&self.0, "frame buffer")? = Some(rgba);
        Ok(())
    }

    /// Copy of the latest frame, or `FrameNotReady` before the first one
    pub fn latest(&self) -> Result<Vec<u8>> {
        lock(&self.0, "frame buffer")?
            .clone()
            .ok_or(BridgeError::FrameNotReady)
    }
}

/// Frame response containing Base64-encoded RGBA pixel data
#[derive(Serialize, Deserialize)]
pub struct FrameResponse {
    /// Base64-encoded RGBA pixel data (avoids slow JSON array serialization)
    pub data: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Scene Pose
// =============================================================================

/// Pose applied to the scene on the most recent frame
#[derive(Clone, Default)]
pub struct SharedScenePose(pub Arc<Mutex<ScenePose>>);

impl SharedScenePose {
    pub fn publish(&self, pose: ScenePose) -> Result<()> {
        *lock(&self.0, "scene pose")? = pose;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<ScenePose> {
        Ok(lock(&self.0, "scene pose")?.clone())
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Pause request written by the frontend and applied by Bevy
#[derive(Serialize, Deserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub paused: bool,
}

#[derive(Clone, Default)]
pub struct SharedPlayback(pub Arc<Mutex<PlaybackRequest>>);

impl SharedPlayback {
    pub fn request(&self, paused: bool) -> Result<()> {
        lock(&self.0, "playback")?.paused = paused;
        Ok(())
    }

    pub fn current(&self) -> Result<PlaybackRequest> {
        Ok(*lock(&self.0, "playback")?)
    }
}

// =============================================================================
// Performance Statistics
// =============================================================================

/// Performance statistics for debugging and monitoring
#[derive(Serialize, Deserialize, Clone, Default, Debug)]
pub struct PerformanceStats {
    // Backend (Bevy/Rust) timings
    pub gpu_transfer_ms: f64,
    pub data_processing_ms: f64,
    pub frame_encoding_ms: f64,
    pub bevy_fps: f64,
    pub frame_count: u64,
    pub data_size_kb: f64,
    // Tauri command timings
    pub tauri_get_frame_ms: f64,
    pub tauri_serialize_ms: f64,
}

/// Thread-safe performance statistics
#[derive(Clone, Default)]
pub struct SharedPerfStats(pub Arc<Mutex<PerformanceStats>>);

impl SharedPerfStats {
    pub fn update(&self, f: impl FnOnce(&mut PerformanceStats)) -> Result<()> {
        f(&mut *lock(&self.0, "performance stats")?);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<PerformanceStats> {
        Ok(lock(&self.0, "performance stats")?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_buffer_reports_not_ready_until_stored() {
        let buffer = SharedFrameBuffer::default();
        assert!(matches!(buffer.latest(), Err(BridgeError::FrameNotReady)));

        buffer.store(vec![1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.latest().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn clones_share_the_same_cell() {
        let playback = SharedPlayback::default();
        let frontend = playback.clone();
        frontend.request(true).unwrap();
        assert!(playback.current().unwrap().paused);
    }

    #[test]
    fn pose_snapshot_returns_published_pose() {
        let shared = SharedScenePose::default();
        let pose = ScenePose::at(2.5);
        shared.publish(pose.clone()).unwrap();
        assert_eq!(shared.snapshot().unwrap(), pose);
    }
}
