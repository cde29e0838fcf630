//! Category tag for entities.
//!
//! Gravity listeners can filter the objects they observe by group name
//! (e.g. `"player"`, `"jelly"`, `"crystal"`).

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(pub String);

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}
