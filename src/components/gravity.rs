//! Per-object gravity state.
//!
//! [`GravityComponent`] is attached to every entity whose gravity can flip.
//! It only stores state and configuration; transitions are applied by
//! [`crate::systems::gravity::set_gravity`], which runs the side effects in a
//! fixed order and notifies every listener before returning.
//!
//! # Request values
//!
//! Only [`GravityType::Normal`] and [`GravityType::Inverted`] are ever stored.
//! [`GravityType::Toggle`] resolves against the current state at request time
//! and [`GravityType::None`] means "no change requested".
//!
//! # Related
//!
//! - [`crate::components::listener::GravityListener`] – observers of changes
//! - [`crate::events::gravity::GravityChangeEvent`] – the transition description

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::rigidbody::RigidBody;
use crate::events::gravity::GravityChangeEvent;

static NEXT_GRAVITY_ID: AtomicU64 = AtomicU64::new(1);

/// Gravity orientation or request value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GravityType {
    #[default]
    Normal,
    Inverted,
    Toggle,
    None,
}

impl GravityType {
    /// The other persisted orientation. Request values map to themselves.
    pub fn opposite(self) -> Self {
        match self {
            GravityType::Normal => GravityType::Inverted,
            GravityType::Inverted => GravityType::Normal,
            other => other,
        }
    }

    /// Resolve a request against the current state.
    pub fn resolve(self, current: GravityType) -> GravityType {
        match self {
            GravityType::Toggle => current.opposite(),
            other => other,
        }
    }

    /// True for the two values that can be stored on a component.
    pub fn is_persisted(self) -> bool {
        matches!(self, GravityType::Normal | GravityType::Inverted)
    }

    /// Sign of "down" along the Y axis for this orientation.
    pub fn down_sign(self) -> f32 {
        match self {
            GravityType::Inverted => -1.0,
            _ => 1.0,
        }
    }

    /// Integer codes used by map attributes: 0 Normal, 1 Inverted, 2 Toggle, -1 None.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(GravityType::Normal),
            1 => Some(GravityType::Inverted),
            2 => Some(GravityType::Toggle),
            -1 => Some(GravityType::None),
            _ => None,
        }
    }
}

impl fmt::Display for GravityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GravityType::Normal => "Normal",
            GravityType::Inverted => "Inverted",
            GravityType::Toggle => "Toggle",
            GravityType::None => "None",
        };
        f.write_str(name)
    }
}

impl FromStr for GravityType {
    type Err = String;

    /// Accepts names (case-insensitive) or the integer codes of [`GravityType::from_code`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_ascii_lowercase().as_str() {
            "normal" => return Ok(GravityType::Normal),
            "inverted" => return Ok(GravityType::Inverted),
            "toggle" => return Ok(GravityType::Toggle),
            "none" => return Ok(GravityType::None),
            _ => {}
        }
        token
            .parse::<i64>()
            .ok()
            .and_then(GravityType::from_code)
            .ok_or_else(|| format!("invalid gravity type '{}'", token))
    }
}

/// Replacement for one of the default transition effects.
pub type GravityHook = fn(world: &mut World, entity: Entity, change: &GravityChangeEvent);

/// Answers whether the entity should currently be treated as upside down.
pub type InvertCheck = fn(world: &World, entity: Entity) -> bool;

/// Reads and writes the speed the default speed transform operates on.
#[derive(Clone, Copy)]
pub struct SpeedAccessor {
    pub get: fn(world: &World, entity: Entity) -> Option<Vec2>,
    pub set: fn(world: &mut World, entity: Entity, speed: Vec2),
}

impl SpeedAccessor {
    /// Accessor bound to the entity's own [`RigidBody`].
    pub fn rigid_body() -> Self {
        Self {
            get: |world, entity| {
                world
                    .get::<RigidBody>(entity)
                    .filter(|body| !body.frozen)
                    .map(|body| body.velocity)
            },
            set: |world, entity, speed| {
                if let Some(mut body) = world.get_mut::<RigidBody>(entity) {
                    body.velocity = speed;
                }
            },
        }
    }
}

/// Optional overrides for the transition effects.
///
/// Unset hooks fall back to the defaults in [`crate::systems::gravity`].
/// Custom hooks run on every accepted request, including ones that leave the
/// state unchanged, so they must check [`GravityChangeEvent::changed`].
#[derive(Clone, Copy, Default)]
pub struct GravityHooks {
    pub update_position: Option<GravityHook>,
    pub update_colliders: Option<GravityHook>,
    pub update_speed: Option<GravityHook>,
    pub update_visuals: Option<GravityHook>,
    pub speed: Option<SpeedAccessor>,
    pub should_invert: Option<InvertCheck>,
}

impl fmt::Debug for GravityHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GravityHooks")
            .field("update_position", &self.update_position.is_some())
            .field("update_colliders", &self.update_colliders.is_some())
            .field("update_speed", &self.update_speed.is_some())
            .field("update_visuals", &self.update_visuals.is_some())
            .field("speed", &self.speed.is_some())
            .field("should_invert", &self.should_invert.is_some())
            .finish()
    }
}

/// Gravity state of one dynamic entity.
///
/// Created detached; [`crate::systems::gravity::attach_gravity`] inserts it
/// into the world and marks it live so transition effects apply.
#[derive(Component, Debug)]
pub struct GravityComponent {
    id: u64,
    current: GravityType,
    attached: bool,
    /// While set, every request is rejected without notifications.
    pub locked: bool,
    /// Session flag mirroring the state (`true` while inverted).
    pub flag: Option<String>,
    pub hooks: GravityHooks,
}

impl Default for GravityComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityComponent {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAVITY_ID.fetch_add(1, Ordering::Relaxed),
            current: GravityType::Normal,
            attached: false,
            locked: false,
            flag: None,
            hooks: GravityHooks::default(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn with_hooks(mut self, hooks: GravityHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Process-wide unique id, stable for the lifetime of the component.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn current(&self) -> GravityType {
        self.current
    }

    pub fn is_inverted(&self) -> bool {
        self.current == GravityType::Inverted
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn set_current(&mut self, value: GravityType) {
        debug_assert!(value.is_persisted());
        self.current = value;
    }

    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }
}
