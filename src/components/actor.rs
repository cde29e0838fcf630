//! Actor and player-side components.
//!
//! Movement and collision resolution are provided by the host; the host keeps
//! these components up to date and the gravity systems read them.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Marks an entity that moves and collides. Only actors are seen by spatial triggers.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Actor;

/// Marks the player-controlled actor.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// Ground contact reported by the host physics for this frame.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroundContact {
    /// Standing on solid ground (tiles or solids).
    pub on_solid: bool,
    /// Standing on something else: jump-through platforms, moving blocks.
    pub on_platform: bool,
}

impl GroundContact {
    pub fn solid() -> Self {
        Self {
            on_solid: true,
            on_platform: false,
        }
    }

    pub fn platform() -> Self {
        Self {
            on_solid: false,
            on_platform: true,
        }
    }

    pub fn airborne() -> Self {
        Self::default()
    }

    pub fn is_grounded(&self) -> bool {
        self.on_solid || self.on_platform
    }
}

/// Extra mid-air jumps granted by an external variant. Absent means zero.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtraJumps {
    pub available: u32,
}

impl ExtraJumps {
    pub fn new(available: u32) -> Self {
        Self { available }
    }

    /// Use one jump. Returns false when none were left.
    pub fn consume_one(&mut self) -> bool {
        if self.available == 0 {
            return false;
        }
        self.available -= 1;
        true
    }
}

/// Dash inventory of the player.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dashes {
    pub current: u32,
    pub max: u32,
}

impl Dashes {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn empty(&mut self) {
        self.current = 0;
    }
}

/// Unit vector of the last dash. Its vertical component flips with gravity.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct DashDirection(pub Vec2);

/// High-level movement state of an actor as seen by the gravity systems.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Normal,
    Dashing,
    /// Travelling through a dream block; flips are not allowed.
    Dreaming,
    /// Scripted sequence or death; the actor ignores control.
    Locked,
}

impl MovementState {
    /// The actor responds to gameplay-driven gravity requests.
    pub fn is_controllable(&self) -> bool {
        !matches!(self, MovementState::Locked)
    }

    /// The actor may flip from its own jump input.
    pub fn allows_flip(&self) -> bool {
        matches!(self, MovementState::Normal | MovementState::Dashing)
    }
}
