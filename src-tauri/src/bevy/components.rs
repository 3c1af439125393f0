//! Bevy component definitions
//!
//! This module contains all component markers and data structures used
//! to tag and identify entities in the Bevy ECS (Entity Component System).

use bevy::prelude::*;

/// Marker component for the offscreen rendering camera
///
/// Entities with this component are cameras that render to an offscreen
/// texture instead of a window.
#[derive(Component)]
pub struct OffscreenCamera;

/// Group that bobs and wobbles around the planet
#[derive(Component)]
pub struct FloatingGroup;

/// The planet sphere, spun about its vertical axis
#[derive(Component)]
pub struct Planet;

/// The animated orbital ring
#[derive(Component)]
pub struct PrimaryRing;

/// The faint ring with a fixed tilt; never animated
#[derive(Component)]
pub struct SecondaryRing;

/// Root of the rocket: cone mesh plus engine glow
#[derive(Component)]
pub struct Rocket;

/// One bead of the rocket trail; `0` is the newest
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailBead(pub usize);
