//! Holdable gravity adapter.
//!
//! While carried, an object follows its carrier's gravity. Once put down it
//! counts down an idle timer and returns to its reset orientation when the
//! timer runs out. The timer restarts on every gravity change of the object
//! and is held at its ceiling while the object sits in a field pulling
//! toward a different orientation than the reset one.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::Actor;
use crate::components::boxcollider::BoxCollider;
use crate::components::field::GravityField;
use crate::components::gravity::{GravityComponent, GravityHooks, GravityType, SpeedAccessor};
use crate::components::holdable::{Holdable, HoldableGravity};
use crate::components::listener::GravityListener;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::controllers::active_config;
use crate::controllers::behavior::BehaviorController;
use crate::events::gravity::GravityChangeEvent;
use crate::resources::mapdata::EntityData;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::overlapping_with;
use crate::systems::field::field_gate;
use crate::systems::gravity::{attach_gravity, current_gravity, request_gravity, spawn_listener};

/// Couple `entity`'s gravity to carrying.
///
/// A gravity component is attached when missing, reading and writing speed
/// through the entity's own rigid body.
pub fn attach_holdable_gravity(world: &mut World, entity: Entity, adapter: HoldableGravity) {
    if world.get_entity(entity).is_err() {
        return;
    }
    if world.get::<GravityComponent>(entity).is_none() {
        let hooks = GravityHooks {
            speed: Some(SpeedAccessor::rigid_body()),
            ..GravityHooks::default()
        };
        attach_gravity(
            world,
            entity,
            GravityComponent::new().with_hooks(hooks),
            GravityType::Normal,
        );
    }
    world.entity_mut(entity).insert(adapter);
    let (ceiling, _) = reset_settings(world, &adapter);
    if let Some(mut adapter) = world.get_mut::<HoldableGravity>(entity) {
        adapter.timer = ceiling;
    }
    spawn_listener(world, entity, GravityListener::for_entity(entity, restart_idle_timer));
}

/// Effective reset time and type for `adapter`.
pub fn reset_settings(world: &World, adapter: &HoldableGravity) -> (f32, GravityType) {
    let behavior = active_config::<BehaviorController>(world);
    (
        adapter.reset_time.unwrap_or(behavior.holdable_reset_time),
        adapter.reset_type.unwrap_or(behavior.holdable_reset_type),
    )
}

fn restart_idle_timer(world: &mut World, _listener: Entity, source: Entity, _change: GravityChangeEvent) {
    let Some(adapter) = world.get::<HoldableGravity>(source).copied() else {
        return;
    };
    let (ceiling, _) = reset_settings(world, &adapter);
    if let Some(mut adapter) = world.get_mut::<HoldableGravity>(source) {
        adapter.timer = ceiling;
    }
}

pub fn holdable_gravity_system(world: &mut World) {
    let delta = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .unwrap_or(0.0);
    let mut query = world.query::<(Entity, &Holdable, &HoldableGravity)>();
    let holdables: Vec<(Entity, Holdable, HoldableGravity)> = query
        .iter(world)
        .map(|(entity, holdable, adapter)| (entity, *holdable, *adapter))
        .collect();

    for (entity, holdable, adapter) in holdables {
        let Some(current) = current_gravity(world, entity) else {
            continue;
        };
        let (ceiling, reset_type) = reset_settings(world, &adapter);

        if let Some(carrier) = holdable.carrier {
            if let Some(wanted) = current_gravity(world, carrier) {
                if wanted != current {
                    request_gravity(world, entity, wanted);
                }
            }
            set_timer(world, entity, ceiling);
            continue;
        }

        if ceiling <= 0.0 || current == reset_type {
            set_timer(world, entity, ceiling);
            continue;
        }
        if in_opposing_field(world, entity, reset_type) {
            set_timer(world, entity, ceiling);
            continue;
        }

        let remaining = adapter.timer - delta;
        if remaining <= 0.0 {
            debug!("{:?}: idle, returning to {}", entity, reset_type);
            request_gravity(world, entity, reset_type);
            set_timer(world, entity, ceiling);
        } else {
            set_timer(world, entity, remaining);
        }
    }
}

fn in_opposing_field(world: &mut World, entity: Entity, reset_type: GravityType) -> bool {
    let fields = overlapping_with::<GravityField>(world, entity);
    let world: &World = world;
    fields
        .into_iter()
        .filter(|&field| field_gate(world, field, entity))
        .filter_map(|field| world.get::<GravityField>(field))
        .any(|field| field.gravity_type != reset_type && field.gravity_type != GravityType::None)
}

fn set_timer(world: &mut World, entity: Entity, value: f32) {
    if let Some(mut adapter) = world.get_mut::<HoldableGravity>(entity) {
        adapter.timer = value;
    }
}

/// Room spawner for `gravityHoldable` placements.
pub fn spawn_holdable_from_data(world: &mut World, data: &EntityData) -> Option<Entity> {
    let width = if data.width > 0.0 { data.width } else { 8.0 };
    let height = if data.height > 0.0 { data.height } else { 10.0 };
    let entity = world
        .spawn((
            Actor,
            Holdable::default(),
            MapPosition::new(data.x, data.y),
            BoxCollider::feet_anchored(width, height),
            RigidBody::new(),
        ))
        .id();

    let mut adapter = HoldableGravity::new();
    if data.attributes.contains_key("reset_time") {
        adapter = adapter.with_reset_time(data.float("reset_time", 0.0));
    }
    if data.attributes.contains_key("reset_type") {
        let reset_type = data.gravity_type("reset_type", GravityType::Normal);
        if reset_type.is_persisted() {
            adapter = adapter.with_reset_type(reset_type);
        }
    }
    attach_holdable_gravity(world, entity, adapter);

    if data.gravity_type("initial_gravity", GravityType::Normal) == GravityType::Inverted {
        request_gravity(world, entity, GravityType::Inverted);
    }
    Some(entity)
}
