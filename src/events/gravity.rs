//! Gravity change description and the global change event.
//!
//! A [`GravityChangeEvent`] is built once per accepted request and handed by
//! value to every listener, so all consumers see the same transition. After
//! the listener pass, [`GravityChanged`] is triggered for world observers.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<GravityChanged>| {
//!     let event = trigger.event();
//!     if event.change.changed() {
//!         log::info!("{:?} is now {}", event.entity, event.change.new_value);
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

use crate::components::gravity::GravityType;

/// Immutable description of one gravity transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityChangeEvent {
    /// Resolved state after the request. Never `Toggle` or `None`.
    pub new_value: GravityType,
    /// State before the request; absent for the initial notification on attach.
    pub old_value: Option<GravityType>,
    pub momentum_multiplier: f32,
    /// The request was a `Toggle`.
    pub was_toggled: bool,
    pub instant: bool,
}

impl GravityChangeEvent {
    /// Notification describing the starting state of a freshly attached component.
    pub fn initial(value: GravityType) -> Self {
        Self {
            new_value: value,
            old_value: None,
            momentum_multiplier: 1.0,
            was_toggled: false,
            instant: false,
        }
    }

    /// True when an old value is known and differs from the new one.
    pub fn changed(&self) -> bool {
        matches!(self.old_value, Some(old) if old != self.new_value)
    }
}

/// Global observer event fired after listeners have been notified.
#[derive(Event, Debug, Clone, Copy)]
pub struct GravityChanged {
    /// The entity whose gravity was requested to change.
    pub entity: Entity,
    pub change: GravityChangeEvent,
}
