//! Gravity fields.
//!
//! A field is a [`SpatialTrigger<GravityComponent>`] whose enter callback
//! requests the field's gravity on the actor. Fields with a session flag are
//! inert (but keep tracking) while the flag is absent.
//!
//! Two overlapping Toggle fields entered on the same frame would cancel each
//! other out. The [`FieldToggleGuard`] lets the first one win: each gravity
//! component can be toggled by fields at most once per frame.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::trace;
use rustc_hash::FxHashSet;

use crate::components::boxcollider::BoxCollider;
use crate::components::field::GravityField;
use crate::components::gravity::{GravityComponent, GravityType};
use crate::components::mapposition::MapPosition;
use crate::components::trigger::SpatialTrigger;
use crate::controllers::active_config;
use crate::controllers::behavior::BehaviorController;
use crate::resources::mapdata::EntityData;
use crate::resources::session::SessionStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::gravity::set_gravity;

/// Gravity component ids already toggled by a field this frame.
#[derive(Resource, Debug, Default)]
pub struct FieldToggleGuard {
    frame: u64,
    toggled: FxHashSet<u64>,
}

impl FieldToggleGuard {
    /// Claim the toggle of `gravity_id` on `frame`. False when already claimed.
    pub fn claim(&mut self, frame: u64, gravity_id: u64) -> bool {
        if frame != self.frame {
            self.frame = frame;
            self.toggled.clear();
        }
        self.toggled.insert(gravity_id)
    }
}

/// Spawn a field covering `size` from `position` (top-left).
pub fn spawn_gravity_field(world: &mut World, position: Vec2, size: Vec2, field: GravityField) -> Entity {
    spawn_field_with(world, position, size, field, SpatialTrigger::new())
}

fn spawn_field_with(
    world: &mut World,
    position: Vec2,
    size: Vec2,
    field: GravityField,
    trigger: SpatialTrigger<GravityComponent>,
) -> Entity {
    world
        .spawn((
            MapPosition::new(position.x, position.y),
            BoxCollider::new(size.x, size.y),
            field,
            trigger.with_gate(field_gate).on_enter(field_enter),
        ))
        .id()
}

/// Room spawner for `gravityField` placements.
pub fn spawn_field_from_data(world: &mut World, data: &EntityData) -> Option<Entity> {
    let mut field = GravityField::new(data.gravity_type("gravity_type", GravityType::Toggle));
    field.momentum_multiplier = data.float("momentum_multiplier", 1.0);
    let flag = data.string("flag", "");
    if !flag.is_empty() {
        field = field.with_flag(flag);
    }
    let trigger = SpatialTrigger::new().affecting(
        data.bool("affects_player", true),
        data.bool("affects_holdables", true),
        data.bool("affects_other_actors", true),
    );
    Some(spawn_field_with(
        world,
        Vec2::new(data.x, data.y),
        Vec2::new(data.width, data.height),
        field,
        trigger,
    ))
}

/// Fields with a flag only act while the flag is set.
pub fn field_gate(world: &World, trigger: Entity, _other: Entity) -> bool {
    let Some(field) = world.get::<GravityField>(trigger) else {
        return false;
    };
    match &field.flag {
        Some(flag) => world
            .get_resource::<SessionStore>()
            .map(|session| session.has_flag(flag))
            .unwrap_or(false),
        None => true,
    }
}

pub fn field_enter(world: &mut World, trigger: Entity, other: Entity) {
    let Some(field) = world.get::<GravityField>(trigger).cloned() else {
        return;
    };
    if field.gravity_type == GravityType::Toggle && !claim_toggle(world, other) {
        trace!("{:?}: field toggle from {:?} already taken this frame", other, trigger);
        return;
    }
    set_gravity(world, other, field.gravity_type, field.momentum_multiplier, false);
}

fn claim_toggle(world: &mut World, other: Entity) -> bool {
    if !active_config::<BehaviorController>(world).exclusive_field_toggles {
        return true;
    }
    let Some(id) = world.get::<GravityComponent>(other).map(|g| g.id()) else {
        return false;
    };
    let frame = world
        .get_resource::<WorldTime>()
        .map(|t| t.frame_count)
        .unwrap_or(0);
    world
        .get_resource_or_insert_with(FieldToggleGuard::default)
        .claim(frame, id)
}
