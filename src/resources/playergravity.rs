//! The "current player" gravity slot.
//!
//! Exactly one entity at a time is the player whose gravity drives sounds,
//! sequencers and the alternate control mode. The slot is written through
//! [`PlayerGravity::on_player_attached`] / [`PlayerGravity::on_player_detached`]
//! and must be cleared on scene teardown and re-established after a session
//! restore. Readers go through [`player_gravity`], which also checks that the
//! stored entity is still alive and still carries a gravity component.

use bevy_ecs::prelude::{Entity, Resource, World};
use log::debug;

use crate::components::gravity::GravityComponent;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerGravity {
    entity: Option<Entity>,
}

impl PlayerGravity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entity` as the player.
    pub fn on_player_attached(&mut self, entity: Entity) {
        debug!("player gravity attached to {:?}", entity);
        self.entity = Some(entity);
    }

    /// Forget the player if it is `entity`. A stale detach for an older
    /// player does not clear a newer registration.
    pub fn on_player_detached(&mut self, entity: Entity) {
        if self.entity == Some(entity) {
            debug!("player gravity detached from {:?}", entity);
            self.entity = None;
        }
    }

    pub fn clear(&mut self) {
        self.entity = None;
    }

    /// Raw slot value without a liveness check.
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }
}

/// The live player entity, if one is registered and still has gravity.
pub fn player_gravity(world: &World) -> Option<Entity> {
    let entity = world.get_resource::<PlayerGravity>()?.entity()?;
    world.get::<GravityComponent>(entity).map(|_| entity)
}
