//! Bevy resource definitions
//!
//! This module contains all global resources used by Bevy systems.
//! Resources are singleton data that can be accessed by any system.

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::performance::FRAME_TIMING_SAMPLES;
use crate::tauri_bridge::shared_state::{
    SharedFrameBuffer, SharedPerfStats, SharedPlayback, SharedScenePose,
};

// =============================================================================
// Bridge State
// =============================================================================

/// Shared frame buffer resource for Bevy
#[derive(Resource, Clone)]
pub struct FrameBufferRes(pub SharedFrameBuffer);

/// Shared performance statistics resource
#[derive(Resource)]
pub struct PerfStatsRes(pub SharedPerfStats);

/// Where the animation publishes the pose it applied
#[derive(Resource)]
pub struct ScenePoseRes(pub SharedScenePose);

/// Pause requests coming from the frontend
#[derive(Resource)]
pub struct PlaybackRes(pub SharedPlayback);

// =============================================================================
// Frame Management
// =============================================================================

/// Counter for total frames published
#[derive(Resource, Default)]
pub struct FrameCount(pub u64);

impl FrameCount {
    /// Count one more published frame and return the new total
    pub fn bump(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }
}

/// Number of pre-roll frames to skip before starting output
#[derive(Resource, Default)]
pub struct PreRollFrames(pub u32);

/// Frame rate limiter to control output FPS
#[derive(Resource)]
pub struct FrameRateLimiter {
    pub last_frame_time: Instant,
    pub min_frame_interval: Duration,
}

impl FrameRateLimiter {
    pub fn new(target_fps: f64) -> Self {
        Self {
            last_frame_time: Instant::now(),
            min_frame_interval: Duration::from_secs_f64(1.0 / target_fps),
        }
    }

    /// Returns true and restarts the interval if a frame is due at `now`
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_frame_time) < self.min_frame_interval {
            return false;
        }
        self.last_frame_time = now;
        true
    }
}

impl Default for FrameRateLimiter {
    fn default() -> Self {
        Self::new(60.0)
    }
}

// =============================================================================
// Performance Monitoring
// =============================================================================

/// Rolling window of frame processing times (ms)
#[derive(Resource, Default)]
pub struct FrameTimings {
    pub last_print_time: f64,
    pub frame_times: VecDeque<f64>,
}

impl FrameTimings {
    pub fn record(&mut self, ms: f64) {
        self.frame_times.push_back(ms);
        while self.frame_times.len() > FRAME_TIMING_SAMPLES {
            self.frame_times.pop_front();
        }
    }

    pub fn average(&self) -> Option<f64> {
        if self.frame_times.is_empty() {
            return None;
        }
        Some(self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64)
    }

    pub fn min_max(&self) -> (f64, f64) {
        self.frame_times
            .iter()
            .fold((f64::MAX, 0.0f64), |(lo, hi), &t| (lo.min(t), hi.max(t)))
    }
}

// =============================================================================
// Channel Communication (Main World <-> Render World)
// =============================================================================

/// Receives data from render world
#[derive(Resource, Deref)]
pub struct MainWorldReceiver(pub Receiver<Vec<u8>>);

/// Sends data to main world
#[derive(Resource, Deref)]
pub struct RenderWorldSender(pub Sender<Vec<u8>>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timings_keep_a_bounded_window() {
        let mut timings = FrameTimings::default();
        for i in 0..(FRAME_TIMING_SAMPLES + 10) {
            timings.record(i as f64);
        }
        assert_eq!(timings.frame_times.len(), FRAME_TIMING_SAMPLES);
        assert_eq!(timings.frame_times.front(), Some(&10.0));
        assert_eq!(timings.min_max(), (10.0, (FRAME_TIMING_SAMPLES + 9) as f64));
    }

    #[test]
    fn empty_timings_have_no_average() {
        assert_eq!(FrameTimings::default().average(), None);
    }

    #[test]
    fn frame_count_wraps_instead_of_overflowing() {
        let mut count = FrameCount(u64::MAX - 1);
        assert_eq!(count.bump(), u64::MAX);
        assert_eq!(count.bump(), 0);
        assert_eq!(count.bump(), 1);
    }

    #[test]
    fn limiter_waits_for_the_interval() {
        let mut limiter = FrameRateLimiter::new(10.0);
        let start = limiter.last_frame_time;
        assert!(!limiter.try_begin(start + Duration::from_millis(50)));
        assert!(limiter.try_begin(start + Duration::from_millis(100)));
        assert!(!limiter.try_begin(start + Duration::from_millis(150)));
    }
}
