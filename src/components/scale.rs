//! Visual components touched by gravity flips.
//!
//! Rendering is owned by the host; these components only carry the values the
//! renderer reads. A flip mirrors both vertically.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// 2D sprite scale. A negative `scale.y` draws the sprite upside down.
#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Scale {
    pub scale: Vec2,
}
impl Scale {
    pub fn new(sx: f32, sy: f32) -> Self {
        Self {
            scale: Vec2::new(sx, sy),
        }
    }
    pub fn flip_vertical(&mut self) {
        self.scale.y = -self.scale.y;
    }
    pub fn is_flipped(&self) -> bool {
        self.scale.y < 0.0
    }
    pub fn set_flipped(&mut self, flipped: bool) {
        if self.is_flipped() != flipped {
            self.flip_vertical();
        }
    }
}
impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Offset of the light/glow attached to an entity, relative to its pivot.
#[derive(Component, Clone, Debug, Copy, PartialEq, Default)]
pub struct LightOffset {
    pub offset: Vec2,
    /// Whether `offset` is currently mirrored from the authored value.
    pub flipped: bool,
}
impl LightOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            offset: Vec2::new(x, y),
            flipped: false,
        }
    }
    pub fn flip_vertical(&mut self) {
        self.offset.y = -self.offset.y;
        self.flipped = !self.flipped;
    }
    pub fn set_flipped(&mut self, flipped: bool) {
        if self.flipped != flipped {
            self.flip_vertical();
        }
    }
}
