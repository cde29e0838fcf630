//! Spatial trigger membership and callbacks.
//!
//! [`spatial_trigger_system`] is generic over the capability component a
//! trigger requires (`SpatialTrigger<GravityComponent>` only ever sees actors
//! with gravity). Each trigger is processed in three passes:
//!
//! 1. tracked entities that were despawned, lost `T`, stopped overlapping or
//!    got picked up are dropped and receive `on_leave`
//! 2. the departed set is purged
//! 3. overlapping qualifying actors are scanned; new ones are tracked and
//!    receive `on_enter`, then every tracked entity receives `on_stay`
//!
//! The gate filters callbacks only. Membership is purely geometric.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::actor::{Actor, Player};
use crate::components::holdable::Holdable;
use crate::components::trigger::{SpatialTrigger, TriggerCallback, TriggerGate};
use crate::systems::collision::{overlaps, overlapping_with};

/// Update every `SpatialTrigger<T>` in the world.
pub fn spatial_trigger_system<T: Component>(world: &mut World) {
    let mut triggers = world.query_filtered::<Entity, With<SpatialTrigger<T>>>();
    let entities: Vec<Entity> = triggers.iter(world).collect();
    for trigger in entities {
        update_trigger::<T>(world, trigger);
    }
}

#[derive(Clone, Copy)]
struct TriggerSettings {
    affects_player: bool,
    affects_holdables: bool,
    affects_other_actors: bool,
    gate: Option<TriggerGate>,
    on_enter: Option<TriggerCallback>,
    on_stay: Option<TriggerCallback>,
    on_leave: Option<TriggerCallback>,
}

fn update_trigger<T: Component>(world: &mut World, trigger: Entity) {
    let Some(component) = world.get::<SpatialTrigger<T>>(trigger) else {
        return;
    };
    let settings = TriggerSettings {
        affects_player: component.affects_player,
        affects_holdables: component.affects_holdables,
        affects_other_actors: component.affects_other_actors,
        gate: component.gate,
        on_enter: component.on_enter,
        on_stay: component.on_stay,
        on_leave: component.on_leave,
    };
    let previously: Vec<Entity> = component.tracked().collect();

    let departed: Vec<Entity> = previously
        .into_iter()
        .filter(|other| !still_inside::<T>(world, trigger, *other))
        .collect();
    for other in &departed {
        trace!("{:?} left trigger {:?}", other, trigger);
        fire(world, settings.gate, settings.on_leave, trigger, *other);
    }
    let Some(mut component) = world.get_mut::<SpatialTrigger<T>>(trigger) else {
        return;
    };
    for other in &departed {
        component.untrack(*other);
    }

    let mut candidates = overlapping_with::<T>(world, trigger);
    candidates.retain(|other| qualifies(world, &settings, *other));
    // Query order is unspecified; keep callback order stable between runs.
    candidates.sort();

    let mut entered = Vec::new();
    if let Some(mut component) = world.get_mut::<SpatialTrigger<T>>(trigger) {
        for other in &candidates {
            if component.track(*other) {
                entered.push(*other);
            }
        }
    }
    for other in entered {
        trace!("{:?} entered trigger {:?}", other, trigger);
        fire(world, settings.gate, settings.on_enter, trigger, other);
    }

    if settings.on_stay.is_some() {
        let Some(component) = world.get::<SpatialTrigger<T>>(trigger) else {
            return;
        };
        let mut inside: Vec<Entity> = component.tracked().collect();
        inside.sort();
        for other in inside {
            fire(world, settings.gate, settings.on_stay, trigger, other);
        }
    }
}

fn still_inside<T: Component>(world: &World, trigger: Entity, other: Entity) -> bool {
    if world.get::<T>(other).is_none() {
        return false;
    }
    if is_held(world, other) {
        return false;
    }
    overlaps(world, other, trigger)
}

fn qualifies(world: &World, settings: &TriggerSettings, other: Entity) -> bool {
    if world.get::<Actor>(other).is_none() {
        return false;
    }
    if world.get::<Player>(other).is_some() {
        return settings.affects_player;
    }
    match world.get::<Holdable>(other) {
        Some(holdable) => settings.affects_holdables && !holdable.is_held(),
        None => settings.affects_other_actors,
    }
}

fn is_held(world: &World, entity: Entity) -> bool {
    world
        .get::<Holdable>(entity)
        .map(|h| h.is_held())
        .unwrap_or(false)
}

fn fire(
    world: &mut World,
    gate: Option<TriggerGate>,
    callback: Option<TriggerCallback>,
    trigger: Entity,
    other: Entity,
) {
    let Some(callback) = callback else {
        return;
    };
    if world.get_entity(trigger).is_err() {
        return;
    }
    if let Some(gate) = gate {
        if !gate(world, trigger, other) {
            return;
        }
    }
    callback(world, trigger, other);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::boxcollider::BoxCollider;
    use crate::components::mapposition::MapPosition;

    #[derive(Component)]
    struct Capable;

    #[derive(Resource, Default)]
    struct Log(Vec<(&'static str, Entity)>);

    fn enter(world: &mut World, _t: Entity, other: Entity) {
        world.resource_mut::<Log>().0.push(("enter", other));
    }
    fn stay(world: &mut World, _t: Entity, other: Entity) {
        world.resource_mut::<Log>().0.push(("stay", other));
    }
    fn leave(world: &mut World, _t: Entity, other: Entity) {
        world.resource_mut::<Log>().0.push(("leave", other));
    }
    fn closed(_world: &World, _t: Entity, _other: Entity) -> bool {
        false
    }

    fn spawn_trigger(world: &mut World, trigger: SpatialTrigger<Capable>) -> Entity {
        world
            .spawn((
                MapPosition::new(0.0, 0.0),
                BoxCollider::new(20.0, 20.0),
                trigger.on_enter(enter).on_stay(stay).on_leave(leave),
            ))
            .id()
    }

    fn spawn_actor(world: &mut World, x: f32) -> Entity {
        world
            .spawn((
                Actor,
                Capable,
                MapPosition::new(x, 5.0),
                BoxCollider::new(4.0, 4.0),
            ))
            .id()
    }

    #[test]
    fn enter_stay_leave_sequence() {
        let mut world = World::new();
        world.init_resource::<Log>();
        let trigger = spawn_trigger(&mut world, SpatialTrigger::new());
        let actor = spawn_actor(&mut world, 5.0);

        spatial_trigger_system::<Capable>(&mut world);
        assert_eq!(world.resource::<Log>().0, vec![("enter", actor), ("stay", actor)]);

        world.resource_mut::<Log>().0.clear();
        world.get_mut::<MapPosition>(actor).unwrap().pos.x = 100.0;
        spatial_trigger_system::<Capable>(&mut world);
        assert_eq!(world.resource::<Log>().0, vec![("leave", actor)]);
        assert!(world.get::<SpatialTrigger<Capable>>(trigger).unwrap().is_empty());
    }

    #[test]
    fn non_actor_is_ignored() {
        let mut world = World::new();
        world.init_resource::<Log>();
        spawn_trigger(&mut world, SpatialTrigger::new());
        world.spawn((Capable, MapPosition::new(5.0, 5.0), BoxCollider::new(4.0, 4.0)));
        spatial_trigger_system::<Capable>(&mut world);
        assert!(world.resource::<Log>().0.is_empty());
    }

    #[test]
    fn gate_blocks_callbacks_but_not_tracking() {
        let mut world = World::new();
        world.init_resource::<Log>();
        let trigger = spawn_trigger(&mut world, SpatialTrigger::new().with_gate(closed));
        let actor = spawn_actor(&mut world, 5.0);
        spatial_trigger_system::<Capable>(&mut world);
        assert!(world.resource::<Log>().0.is_empty());
        assert!(world.get::<SpatialTrigger<Capable>>(trigger).unwrap().contains(actor));
    }

    #[test]
    fn despawned_actor_leaves() {
        let mut world = World::new();
        world.init_resource::<Log>();
        let trigger = spawn_trigger(&mut world, SpatialTrigger::new());
        let actor = spawn_actor(&mut world, 5.0);
        spatial_trigger_system::<Capable>(&mut world);
        world.resource_mut::<Log>().0.clear();

        world.despawn(actor);
        spatial_trigger_system::<Capable>(&mut world);
        assert_eq!(world.resource::<Log>().0, vec![("leave", actor)]);
        assert!(world.get::<SpatialTrigger<Capable>>(trigger).unwrap().is_empty());
    }
}
