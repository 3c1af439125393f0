//! Bevy systems
//!
//! This module contains all the systems that build, animate and capture
//! the hero scene in the Bevy ECS.

pub mod animation;
pub mod frame_extraction;
pub mod playback;
pub mod scene;

pub use animation::{
    float_planet, fly_rocket, publish_scene_pose, spin_planet, swing_ring, trail_rocket,
};
pub use frame_extraction::extract_and_process_frame;
pub use playback::apply_playback_request;
pub use scene::setup_scene;
