//! Kinematic body component.
//!
//! The [`RigidBody`] stores the world-space velocity of an entity. Movement
//! integration belongs to the host physics layer; this crate only reads and
//! rewrites the vertical component when gravity flips.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Kinematic body storing velocity in world units per second.
///
/// # Fields
/// - `velocity` - Current velocity. Positive Y points down the screen.
/// - `frozen` - When true, the host is driving the position externally
///   (e.g. while carried) and speed transforms are skipped.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
    pub frozen: bool,
}

impl RigidBody {
    /// Create a RigidBody with zero velocity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RigidBody moving with the given velocity.
    pub fn with_velocity(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec2::new(x, y),
            frozen: false,
        }
    }

    /// Freeze the rigid body, speed transforms leave it untouched.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze the rigid body.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
