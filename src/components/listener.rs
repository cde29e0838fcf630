//! Passive observers of gravity changes.
//!
//! A [`GravityListener`] lives on its own entity (usually a child of the
//! feature that owns it, so it is despawned together with the owner). Every
//! accepted gravity request is offered to all listeners; each one filters by
//! source before its callback runs.
//!
//! Targets are plain [`Entity`] handles. A handle whose entity no longer
//! exists never matches, so dispatch tolerates targets that were despawned
//! earlier in the frame.

use std::fmt;

use bevy_ecs::prelude::*;

use crate::components::group::Group;
use crate::events::gravity::GravityChangeEvent;
use crate::resources::playergravity::player_gravity;

/// Callback invoked for every notification that passes the listener filter.
///
/// # Parameters
///
/// - `listener` – the entity holding the [`GravityListener`]
/// - `source` – the entity whose gravity was requested to change
/// - `change` – the shared description of the transition
pub type GravityListenerCallback =
    fn(world: &mut World, listener: Entity, source: Entity, change: GravityChangeEvent);

/// Observer of gravity changes with optional source filters.
///
/// All configured filters must match. A listener with no filter receives
/// every notification in the scene.
#[derive(Component, Clone)]
pub struct GravityListener {
    /// Only notify for this entity.
    pub target: Option<Entity>,
    /// Only notify for sources tagged with this [`Group`].
    pub group: Option<String>,
    /// Only notify for the entity currently registered as the player.
    pub player_only: bool,
    pub callback: GravityListenerCallback,
}

impl GravityListener {
    /// Listener receiving every notification.
    pub fn new(callback: GravityListenerCallback) -> Self {
        Self {
            target: None,
            group: None,
            player_only: false,
            callback,
        }
    }

    /// Listener bound to a single entity.
    pub fn for_entity(target: Entity, callback: GravityListenerCallback) -> Self {
        Self {
            target: Some(target),
            ..Self::new(callback)
        }
    }

    /// Listener bound to a category of entities.
    pub fn for_group(group: impl Into<String>, callback: GravityListenerCallback) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::new(callback)
        }
    }

    /// Listener bound to whichever entity is the registered player.
    ///
    /// Resolved through [`crate::resources::playergravity::PlayerGravity`]
    /// rather than the `"player"` group, so look-alike entities are excluded.
    pub fn for_player(callback: GravityListenerCallback) -> Self {
        Self {
            player_only: true,
            ..Self::new(callback)
        }
    }

    /// Restrict an existing listener to a group as well.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Whether a notification from `source` should reach this listener.
    pub fn accepts(&self, world: &World, source: Entity) -> bool {
        if let Some(target) = self.target {
            if target != source || world.get_entity(target).is_err() {
                return false;
            }
        }
        if let Some(group) = &self.group {
            let matches = world
                .get::<Group>(source)
                .map(|g| g.name() == group)
                .unwrap_or(false);
            if !matches {
                return false;
            }
        }
        if self.player_only && player_gravity(world) != Some(source) {
            return false;
        }
        true
    }
}

impl fmt::Debug for GravityListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GravityListener")
            .field("target", &self.target)
            .field("group", &self.group)
            .field("player_only", &self.player_only)
            .finish()
    }
}
