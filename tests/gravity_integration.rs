//! Gravity state integration tests.
//!
//! Drive `set_gravity` and friends against a real `World` and check the
//! resolution rules, effect application, listener filtering and the
//! attach/detach lifecycle.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;

use gravityflip::components::actor::{DashDirection, Player};
use gravityflip::components::boxcollider::{BoxCollider, PickupCollider};
use gravityflip::components::gravity::{GravityComponent, GravityHooks, GravityType};
use gravityflip::components::group::Group;
use gravityflip::components::listener::GravityListener;
use gravityflip::components::mapposition::MapPosition;
use gravityflip::components::rigidbody::RigidBody;
use gravityflip::components::scale::{LightOffset, Scale};
use gravityflip::events::gravity::{GravityChangeEvent, GravityChanged};
use gravityflip::resources::playergravity::{PlayerGravity, player_gravity};
use gravityflip::resources::session::SessionStore;
use gravityflip::systems::gravity::{
    attach_gravity, current_gravity, detach_gravity, request_gravity, set_gravity,
    should_invert, spawn_listener, sync_gravity_flags,
};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Resource, Default)]
struct Notifications(Vec<(Entity, GravityChangeEvent)>);

#[derive(Resource, Default)]
struct Observed(Vec<GravityChangeEvent>);

fn record(world: &mut World, _listener: Entity, source: Entity, change: GravityChangeEvent) {
    world.resource_mut::<Notifications>().0.push((source, change));
}

fn make_world() -> World {
    let mut world = World::new();
    world.init_resource::<Notifications>();
    world.init_resource::<Observed>();
    world.init_resource::<SessionStore>();
    world.init_resource::<PlayerGravity>();
    world
}

fn spawn_actor(world: &mut World) -> Entity {
    world
        .spawn((
            MapPosition::new(50.0, 100.0),
            BoxCollider::feet_anchored(8.0, 12.0),
            PickupCollider(BoxCollider::feet_anchored(16.0, 16.0)),
            RigidBody::with_velocity(10.0, 40.0),
            DashDirection(Vec2::new(0.6, 0.8)),
            Scale::default(),
            LightOffset::new(0.0, -6.0),
        ))
        .id()
}

fn attached_actor(world: &mut World) -> Entity {
    let entity = spawn_actor(world);
    attach_gravity(world, entity, GravityComponent::new(), GravityType::Normal);
    entity
}

fn notifications(world: &World) -> Vec<GravityChangeEvent> {
    world
        .resource::<Notifications>()
        .0
        .iter()
        .map(|(_, change)| *change)
        .collect()
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn toggle_resolves_against_current_state() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);

    assert!(request_gravity(&mut world, entity, GravityType::Toggle));
    assert_eq!(current_gravity(&world, entity), Some(GravityType::Inverted));
    assert!(request_gravity(&mut world, entity, GravityType::Toggle));
    assert_eq!(current_gravity(&world, entity), Some(GravityType::Normal));
}

#[test]
fn explicit_requests_ignore_current_state() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);

    for requested in [GravityType::Inverted, GravityType::Inverted, GravityType::Normal] {
        assert!(request_gravity(&mut world, entity, requested));
        assert_eq!(current_gravity(&world, entity), Some(requested));
    }
}

#[test]
fn none_request_is_rejected() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);
    spawn_listener(&mut world, entity, GravityListener::new(record));

    assert!(!request_gravity(&mut world, entity, GravityType::None));
    assert!(notifications(&world).is_empty());
}

// =============================================================================
// Idempotence and locking
// =============================================================================

#[test]
fn repeated_request_notifies_without_effects() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);
    spawn_listener(&mut world, entity, GravityListener::for_entity(entity, record));

    let position = *world.get::<MapPosition>(entity).unwrap();
    let collider = *world.get::<BoxCollider>(entity).unwrap();
    let body = *world.get::<RigidBody>(entity).unwrap();

    assert!(request_gravity(&mut world, entity, GravityType::Normal));
    assert!(request_gravity(&mut world, entity, GravityType::Normal));

    let seen = notifications(&world);
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|change| !change.changed()));
    assert!(seen.iter().all(|change| change.old_value == Some(GravityType::Normal)));

    assert_eq!(*world.get::<MapPosition>(entity).unwrap(), position);
    assert_eq!(*world.get::<BoxCollider>(entity).unwrap(), collider);
    assert_eq!(*world.get::<RigidBody>(entity).unwrap(), body);
}

#[test]
fn locked_component_rejects_every_request() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);
    spawn_listener(&mut world, entity, GravityListener::new(record));
    world.get_mut::<GravityComponent>(entity).unwrap().locked = true;

    for requested in [
        GravityType::Normal,
        GravityType::Inverted,
        GravityType::Toggle,
        GravityType::None,
    ] {
        assert!(!set_gravity(&mut world, entity, requested, 1.0, true));
    }
    assert!(notifications(&world).is_empty());
    assert_eq!(current_gravity(&world, entity), Some(GravityType::Normal));
}

// =============================================================================
// Effects
// =============================================================================

#[test]
fn flip_applies_effects_in_world_space() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);

    let (min_before, max_before) = world
        .get::<BoxCollider>(entity)
        .unwrap()
        .aabb(world.get::<MapPosition>(entity).unwrap().pos);

    set_gravity(&mut world, entity, GravityType::Inverted, 0.5, false);

    let pos = world.get::<MapPosition>(entity).unwrap().pos;
    let (min_after, max_after) = world.get::<BoxCollider>(entity).unwrap().aabb(pos);
    assert_eq!((min_after, max_after), (min_before, max_before));
    // Feet are now at the top edge of the box.
    assert_eq!(pos.y, min_after.y);

    let pickup = world.get::<PickupCollider>(entity).unwrap().0;
    assert_eq!(pickup.offset.y, 0.0);

    assert_eq!(world.get::<RigidBody>(entity).unwrap().velocity, Vec2::new(10.0, -20.0));
    assert_eq!(world.get::<DashDirection>(entity).unwrap().0, Vec2::new(0.6, -0.8));
    assert_eq!(world.get::<Scale>(entity).unwrap().scale.y, -1.0);
    assert_eq!(world.get::<LightOffset>(entity).unwrap().offset.y, 6.0);
}

#[test]
fn flip_back_restores_original_shape() {
    let mut world = make_world();
    let entity = attached_actor(&mut world);
    let position = *world.get::<MapPosition>(entity).unwrap();
    let collider = *world.get::<BoxCollider>(entity).unwrap();

    request_gravity(&mut world, entity, GravityType::Toggle);
    request_gravity(&mut world, entity, GravityType::Toggle);

    assert_eq!(*world.get::<MapPosition>(entity).unwrap(), position);
    assert_eq!(*world.get::<BoxCollider>(entity).unwrap(), collider);
}

#[test]
fn custom_hook_replaces_default_step() {
    fn keep_position(world: &mut World, entity: Entity, _change: &GravityChangeEvent) {
        world.get_mut::<MapPosition>(entity).unwrap().pos.x += 1.0;
    }

    let mut world = make_world();
    let entity = spawn_actor(&mut world);
    let hooks = GravityHooks {
        update_position: Some(keep_position),
        ..GravityHooks::default()
    };
    attach_gravity(
        &mut world,
        entity,
        GravityComponent::new().with_hooks(hooks),
        GravityType::Normal,
    );

    request_gravity(&mut world, entity, GravityType::Inverted);
    assert_eq!(world.get::<MapPosition>(entity).unwrap().pos, Vec2::new(51.0, 100.0));
    // The hook runs on same-state requests too.
    request_gravity(&mut world, entity, GravityType::Inverted);
    assert_eq!(world.get::<MapPosition>(entity).unwrap().pos.x, 52.0);
}

#[test]
fn should_invert_uses_custom_check() {
    fn always(_world: &World, _entity: Entity) -> bool {
        true
    }

    let mut world = make_world();
    let entity = spawn_actor(&mut world);
    let hooks = GravityHooks {
        should_invert: Some(always),
        ..GravityHooks::default()
    };
    attach_gravity(
        &mut world,
        entity,
        GravityComponent::new().with_hooks(hooks),
        GravityType::Normal,
    );
    assert!(should_invert(&world, entity));
}

// =============================================================================
// Listeners and observers
// =============================================================================

#[test]
fn listener_and_observer_see_identical_event() {
    let mut world = make_world();
    world.add_observer(|event: On<GravityChanged>, mut observed: ResMut<Observed>| {
        observed.0.push(event.event().change);
    });
    let entity = attached_actor(&mut world);
    spawn_listener(&mut world, entity, GravityListener::new(record));
    world.resource_mut::<Observed>().0.clear();

    set_gravity(&mut world, entity, GravityType::Toggle, 0.75, true);

    let listened = notifications(&world);
    let observed = &world.resource::<Observed>().0;
    assert_eq!(listened.len(), 1);
    assert_eq!(observed.len(), 1);
    assert_eq!(listened[0], observed[0]);
    assert_eq!(
        listened[0],
        GravityChangeEvent {
            new_value: GravityType::Inverted,
            old_value: Some(GravityType::Normal),
            momentum_multiplier: 0.75,
            was_toggled: true,
            instant: true,
        }
    );
}

#[test]
fn listener_sees_state_already_applied() {
    fn check_state(world: &mut World, _listener: Entity, source: Entity, change: GravityChangeEvent) {
        assert_eq!(current_gravity(world, source), Some(change.new_value));
        world.resource_mut::<Notifications>().0.push((source, change));
    }

    let mut world = make_world();
    let entity = attached_actor(&mut world);
    spawn_listener(&mut world, entity, GravityListener::new(check_state));
    request_gravity(&mut world, entity, GravityType::Inverted);
    assert_eq!(notifications(&world).len(), 1);
}

#[test]
fn target_filter_ignores_other_sources() {
    let mut world = make_world();
    let a = attached_actor(&mut world);
    let b = attached_actor(&mut world);
    spawn_listener(&mut world, a, GravityListener::for_entity(a, record));

    request_gravity(&mut world, b, GravityType::Inverted);
    assert!(notifications(&world).is_empty());
    request_gravity(&mut world, a, GravityType::Inverted);
    assert_eq!(world.resource::<Notifications>().0[0].0, a);
}

#[test]
fn dead_target_is_never_notified() {
    let mut world = make_world();
    let target = attached_actor(&mut world);
    let other = attached_actor(&mut world);
    let owner = world.spawn_empty().id();
    spawn_listener(&mut world, owner, GravityListener::for_entity(target, record));

    world.despawn(target);
    request_gravity(&mut world, other, GravityType::Inverted);
    assert!(notifications(&world).is_empty());
}

#[test]
fn group_filter_matches_category() {
    let mut world = make_world();
    let jelly = attached_actor(&mut world);
    world.entity_mut(jelly).insert(Group::new("jelly"));
    let crate_box = attached_actor(&mut world);
    world.entity_mut(crate_box).insert(Group::new("crate"));
    let owner = world.spawn_empty().id();
    spawn_listener(&mut world, owner, GravityListener::for_group("jelly", record));

    request_gravity(&mut world, crate_box, GravityType::Inverted);
    request_gravity(&mut world, jelly, GravityType::Inverted);

    let seen = &world.resource::<Notifications>().0;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, jelly);
}

#[test]
fn player_listener_excludes_lookalikes() {
    let mut world = make_world();
    let player = spawn_actor(&mut world);
    world.entity_mut(player).insert((Player, Group::new("player")));
    attach_gravity(&mut world, player, GravityComponent::new(), GravityType::Normal);

    // A ghost carrying the same category, but not the player slot.
    let ghost = attached_actor(&mut world);
    world.entity_mut(ghost).insert(Group::new("player"));

    spawn_listener(&mut world, player, GravityListener::for_player(record));
    assert_eq!(player_gravity(&world), Some(player));

    request_gravity(&mut world, ghost, GravityType::Inverted);
    assert!(notifications(&world).is_empty());
    request_gravity(&mut world, player, GravityType::Inverted);
    assert_eq!(notifications(&world).len(), 1);
}

#[test]
fn listener_despawns_with_owner() {
    let mut world = make_world();
    let owner = world.spawn_empty().id();
    let entity = attached_actor(&mut world);
    let listener = spawn_listener(&mut world, owner, GravityListener::new(record));

    world.despawn(owner);
    assert!(world.get_entity(listener).is_err());
    request_gravity(&mut world, entity, GravityType::Inverted);
    assert!(notifications(&world).is_empty());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn attach_inverted_applies_effects_and_broadcasts_once() {
    let mut world = make_world();
    let owner = world.spawn_empty().id();
    spawn_listener(&mut world, owner, GravityListener::new(record));
    let entity = spawn_actor(&mut world);

    attach_gravity(
        &mut world,
        entity,
        GravityComponent::new().with_flag("crate_inverted"),
        GravityType::Inverted,
    );

    let seen = notifications(&world);
    assert_eq!(seen, vec![GravityChangeEvent::initial(GravityType::Inverted)]);
    assert!(!seen[0].changed());
    assert_eq!(world.get::<Scale>(entity).unwrap().scale.y, -1.0);
    assert!(world.resource::<SessionStore>().has_flag("crate_inverted"));
}

#[test]
fn detach_returns_to_normal_and_clears_state() {
    let mut world = make_world();
    let player = spawn_actor(&mut world);
    world.entity_mut(player).insert(Player);
    attach_gravity(
        &mut world,
        player,
        GravityComponent::new().with_flag("player_inverted"),
        GravityType::Inverted,
    );
    let owner = world.spawn_empty().id();
    spawn_listener(&mut world, owner, GravityListener::new(record));
    world.get_mut::<GravityComponent>(player).unwrap().locked = true;

    assert!(detach_gravity(&mut world, player));

    let seen = notifications(&world);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].new_value, GravityType::Normal);
    assert!(seen[0].changed());
    assert_eq!(world.get::<Scale>(player).unwrap().scale.y, 1.0);
    assert!(world.get::<GravityComponent>(player).is_none());
    assert!(!world.resource::<SessionStore>().has_flag("player_inverted"));
    assert_eq!(world.resource::<PlayerGravity>().entity(), None);
}

#[test]
fn flag_drift_is_resynced() {
    let mut world = make_world();
    let entity = spawn_actor(&mut world);
    attach_gravity(
        &mut world,
        entity,
        GravityComponent::new().with_flag("lever_inverted"),
        GravityType::Normal,
    );

    world.resource_mut::<SessionStore>().set_flag("lever_inverted");
    sync_gravity_flags(&mut world);
    assert_eq!(current_gravity(&world, entity), Some(GravityType::Inverted));

    world.resource_mut::<SessionStore>().clear_flag("lever_inverted");
    sync_gravity_flags(&mut world);
    assert_eq!(current_gravity(&world, entity), Some(GravityType::Normal));
}

#[test]
fn request_on_entity_without_gravity_is_silent() {
    let mut world = make_world();
    let entity = spawn_actor(&mut world);
    let owner = world.spawn_empty().id();
    spawn_listener(&mut world, owner, GravityListener::new(record));

    assert!(!request_gravity(&mut world, entity, GravityType::Inverted));
    assert!(notifications(&world).is_empty());
    assert!(!detach_gravity(&mut world, entity));
}
