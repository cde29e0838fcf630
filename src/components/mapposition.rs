//! World-space position component.
//!
//! The [`MapPosition`] is the pivot of an entity. For actors the pivot sits at
//! the feet, so flipping gravity moves it to the opposite edge of the collider.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// World-space pivot of an entity. Y grows downward.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
