//! Room transition notification.
use bevy_ecs::prelude::*;

/// Triggered when the current room is left, before the next room spawns.
///
/// `from` is empty on the first room entry after a map load.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct RoomTransitionEvent {
    pub from: String,
    pub to: String,
}
