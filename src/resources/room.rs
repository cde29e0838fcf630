//! Current room resource.
//!
//! Controller resolution and the speed transform read the room the player is
//! in from here. It is written only by
//! [`crate::systems::room::enter_room`].

use bevy_ecs::prelude::{Resource, World};

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomState {
    /// Name of the room the player is in. Empty before the first room is entered.
    pub current: String,
    /// The current room is a reduced-gravity room.
    pub in_space: bool,
}

impl RoomState {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            current: room.into(),
            in_space: false,
        }
    }
}

/// Name of the current room, or an empty string when no room is loaded.
pub fn current_room(world: &World) -> &str {
    world
        .get_resource::<RoomState>()
        .map(|room| room.current.as_str())
        .unwrap_or("")
}
