//! Carryable objects and their gravity adapter.
//!
//! [`Holdable`] is maintained by the host's carry logic. [`HoldableGravity`]
//! couples the object's gravity to its carrier while held and returns it to a
//! reset orientation after it has been left alone for a while.
//!
//! # Related
//!
//! - [`crate::systems::holdable::attach_holdable_gravity`] – attaches the adapter
//! - [`crate::systems::holdable::holdable_gravity_system`] – per-frame update

use bevy_ecs::prelude::{Component, Entity};

use crate::components::gravity::GravityType;

/// An object that can be picked up.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Holdable {
    /// The entity currently carrying this object.
    pub carrier: Option<Entity>,
}

impl Holdable {
    pub fn is_held(&self) -> bool {
        self.carrier.is_some()
    }
}

/// Gravity adapter for carryable objects.
///
/// `reset_time` and `reset_type` override the active behavior controller when
/// set. A reset time of zero or less disables the idle reset.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct HoldableGravity {
    pub reset_time: Option<f32>,
    pub reset_type: Option<GravityType>,
    /// Seconds left before the object returns to its reset type.
    pub timer: f32,
}

impl HoldableGravity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reset_time(mut self, seconds: f32) -> Self {
        self.reset_time = Some(seconds);
        self
    }

    pub fn with_reset_type(mut self, gravity: GravityType) -> Self {
        self.reset_type = Some(gravity);
        self
    }
}
