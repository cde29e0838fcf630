//! Generic spatial trigger.
//!
//! A [`SpatialTrigger<T>`] tracks which actors carrying a `T` component overlap
//! the trigger's [`BoxCollider`](crate::components::boxcollider::BoxCollider)
//! and raises enter/stay/leave callbacks as that set changes. Membership is
//! rebuilt every frame by
//! [`spatial_trigger_system`](crate::systems::trigger::spatial_trigger_system).
//!
//! # Filtering
//!
//! - only entities with [`Actor`](crate::components::actor::Actor) and `T` qualify
//! - the player qualifies only with `affects_player`
//! - other actors qualify by `affects_holdables` / `affects_other_actors`
//! - held objects never qualify and count as departed while held
//!
//! The optional `gate` decides whether a callback fires for an entity. It is
//! evaluated at enter, every stay, and at leave, and never changes membership,
//! so a gated trigger still knows who is inside.
//!
//! # Example
//!
//! ```ignore
//! fn push_up(world: &mut World, trigger: Entity, other: Entity) {
//!     set_gravity(world, other, GravityType::Inverted, 1.0, false);
//! }
//!
//! world.spawn((
//!     MapPosition::new(0.0, 0.0),
//!     BoxCollider::new(32.0, 32.0),
//!     SpatialTrigger::<GravityComponent>::new().on_enter(push_up),
//! ));
//! ```

use std::fmt;
use std::marker::PhantomData;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

/// Callback fired for one tracked entity.
pub type TriggerCallback = fn(world: &mut World, trigger: Entity, other: Entity);

/// Decides whether callbacks fire for `other` this frame.
pub type TriggerGate = fn(world: &World, trigger: Entity, other: Entity) -> bool;

#[derive(Component)]
pub struct SpatialTrigger<T: Component> {
    tracked: FxHashSet<Entity>,
    pub affects_player: bool,
    pub affects_holdables: bool,
    pub affects_other_actors: bool,
    pub gate: Option<TriggerGate>,
    pub on_enter: Option<TriggerCallback>,
    pub on_stay: Option<TriggerCallback>,
    pub on_leave: Option<TriggerCallback>,
    marker: PhantomData<fn() -> T>,
}

impl<T: Component> Default for SpatialTrigger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> SpatialTrigger<T> {
    /// Trigger affecting the player and every other actor.
    pub fn new() -> Self {
        Self {
            tracked: FxHashSet::default(),
            affects_player: true,
            affects_holdables: true,
            affects_other_actors: true,
            gate: None,
            on_enter: None,
            on_stay: None,
            on_leave: None,
            marker: PhantomData,
        }
    }

    pub fn affecting(mut self, player: bool, holdables: bool, other_actors: bool) -> Self {
        self.affects_player = player;
        self.affects_holdables = holdables;
        self.affects_other_actors = other_actors;
        self
    }

    pub fn with_gate(mut self, gate: TriggerGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn on_enter(mut self, callback: TriggerCallback) -> Self {
        self.on_enter = Some(callback);
        self
    }

    pub fn on_stay(mut self, callback: TriggerCallback) -> Self {
        self.on_stay = Some(callback);
        self
    }

    pub fn on_leave(mut self, callback: TriggerCallback) -> Self {
        self.on_leave = Some(callback);
        self
    }

    /// Whether `entity` is currently inside.
    pub fn contains(&self, entity: Entity) -> bool {
        self.tracked.contains(&entity)
    }

    pub fn tracked(&self) -> impl Iterator<Item = Entity> + '_ {
        self.tracked.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Start tracking. Returns true when the entity was not tracked before.
    pub(crate) fn track(&mut self, entity: Entity) -> bool {
        self.tracked.insert(entity)
    }

    pub(crate) fn untrack(&mut self, entity: Entity) {
        self.tracked.remove(&entity);
    }
}

impl<T: Component> fmt::Debug for SpatialTrigger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialTrigger")
            .field("tracked", &self.tracked)
            .field("affects_player", &self.affects_player)
            .field("affects_holdables", &self.affects_holdables)
            .field("affects_other_actors", &self.affects_other_actors)
            .field("gate", &self.gate.is_some())
            .finish()
    }
}
