use bevy_ecs::prelude::Component;

use crate::components::gravity::GravityType;

/// Zone that requests a gravity change on actors entering it.
///
/// Driven by a [`SpatialTrigger`](crate::components::trigger::SpatialTrigger)
/// on the same entity. When `flag` is set the field is inert unless that
/// session flag is present; it keeps tracking who is inside either way.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct GravityField {
    pub gravity_type: GravityType,
    pub momentum_multiplier: f32,
    pub flag: Option<String>,
}

impl GravityField {
    pub fn new(gravity_type: GravityType) -> Self {
        Self {
            gravity_type,
            momentum_multiplier: 1.0,
            flag: None,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }
}
