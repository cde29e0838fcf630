//! Player lifecycle and session save/restore.
//!
//! Restoring a session replaces the [`SessionStore`] wholesale, so anything
//! derived from it has to be rebuilt: the player slot is re-established from
//! the live [`Player`] entity and every mirrored gravity flag is re-applied.
use std::path::Path;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{info, warn};

use crate::components::actor::{
    Actor, DashDirection, Dashes, GroundContact, MovementState, Player,
};
use crate::components::boxcollider::BoxCollider;
use crate::components::gravity::{GravityComponent, GravityType};
use crate::components::listener::GravityListener;
use crate::components::mapposition::MapPosition;
use crate::components::persistent::Persistent;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::controllers::sound::play_flip_sound;
use crate::resources::playergravity::PlayerGravity;
use crate::resources::session::{PLAYER_GRAVITY_FLAG, SessionError, SessionStore};
use crate::systems::altmode::{AltModeState, update_dash_lock};
use crate::systems::gravity::{attach_gravity, set_gravity, spawn_listener, sync_gravity_flags};

const PLAYER_WIDTH: f32 = 8.0;
const PLAYER_HEIGHT: f32 = 11.0;

/// Spawn the player at `position` with the session's respawn gravity.
pub fn spawn_player(world: &mut World, position: Vec2) -> Entity {
    let player = world
        .spawn((
            Player,
            Actor,
            Persistent,
            MapPosition::new(position.x, position.y),
            BoxCollider::feet_anchored(PLAYER_WIDTH, PLAYER_HEIGHT),
            RigidBody::new(),
            GroundContact::default(),
            Dashes::new(1),
            DashDirection::default(),
            MovementState::default(),
            Scale::default(),
        ))
        .id();
    let initial = world
        .get_resource_or_insert_with(SessionStore::default)
        .initial_gravity();
    attach_gravity(
        world,
        player,
        GravityComponent::new().with_flag(PLAYER_GRAVITY_FLAG),
        initial,
    );
    spawn_listener(world, player, GravityListener::for_player(play_flip_sound));
    if dashes_locked(world) {
        if let Some(mut dashes) = world.get_mut::<Dashes>(player) {
            dashes.empty();
        }
    }
    player
}

/// Put the player back at `position` after a death.
///
/// Gravity is restored first so the pivot correction of the flip does not
/// move the player off the respawn point.
pub fn respawn_player(world: &mut World, player: Entity, position: Vec2) {
    if let Some(mut gravity) = world.get_mut::<GravityComponent>(player) {
        gravity.locked = false;
    }
    let initial = world
        .get_resource::<SessionStore>()
        .map(|session| session.initial_gravity())
        .unwrap_or(GravityType::Normal);
    set_gravity(world, player, initial, 0.0, false);

    if let Some(mut pos) = world.get_mut::<MapPosition>(player) {
        pos.pos = position;
    }
    if let Some(mut body) = world.get_mut::<RigidBody>(player) {
        body.velocity = Vec2::ZERO;
        body.unfreeze();
    }
    if let Some(mut movement) = world.get_mut::<MovementState>(player) {
        *movement = MovementState::Normal;
    }
    let dash_disabled = dashes_locked(world);
    if let Some(mut dashes) = world.get_mut::<Dashes>(player) {
        if dash_disabled {
            dashes.empty();
        } else {
            dashes.refill();
        }
    }
}

fn dashes_locked(world: &World) -> bool {
    world
        .get_resource::<AltModeState>()
        .map(|state| state.dash_disabled)
        .unwrap_or(false)
}

/// Point the player slot at the live [`Player`] with gravity, or empty it
/// when there is none.
pub fn reattach_player(world: &mut World) -> Option<Entity> {
    let mut players = world.query_filtered::<Entity, (With<Player>, With<GravityComponent>)>();
    let player = players.iter(world).next();
    let mut slot = world.get_resource_or_insert_with(PlayerGravity::default);
    match player {
        Some(player) => slot.on_player_attached(player),
        None => slot.clear(),
    }
    player
}

/// Copy of the current session.
pub fn snapshot_session(world: &World) -> SessionStore {
    world
        .get_resource::<SessionStore>()
        .cloned()
        .unwrap_or_default()
}

/// Replace the session and bring derived state back in line with it.
pub fn restore_session(world: &mut World, store: SessionStore) {
    world.insert_resource(store);

    reattach_player(world);
    sync_gravity_flags(world);
    update_dash_lock(world);
}

pub fn save_session(world: &World, path: impl AsRef<Path>) -> Result<(), SessionError> {
    snapshot_session(world).save(&path)?;
    info!("Saved session to {:?}", path.as_ref());
    Ok(())
}

pub fn load_session(world: &mut World, path: impl AsRef<Path>) -> Result<(), SessionError> {
    let store = SessionStore::load(&path).inspect_err(|err| {
        warn!("Failed to load session from {:?}: {}", path.as_ref(), err);
    })?;
    restore_session(world, store);
    info!("Loaded session from {:?}", path.as_ref());
    Ok(())
}
