//! Scene lifetime markers.
//!
//! Entities with [`Persistent`] survive room transitions and scene teardown.
//! Persistent controllers are spawned with it at map load. Entities with
//! [`RoomScoped`] belong to the room they were spawned for and are despawned
//! when the player leaves it.

use bevy_ecs::prelude::Component;

/// Tag component used to mark entities that should persist across room changes.
#[derive(Component, Clone, Debug)]
pub struct Persistent;

/// Tag component for entities spawned from a room's placements.
#[derive(Component, Clone, Debug)]
pub struct RoomScoped {
    pub room: String,
}
