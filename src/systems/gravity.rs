//! Gravity state transitions.
//!
//! Every orientation change in the game goes through [`set_gravity`]. A
//! request is applied synchronously: the component state is updated, the
//! physical side effects run in a fixed order, and then every matching
//! [`GravityListener`] and every [`GravityChanged`] observer sees the same
//! [`GravityChangeEvent`] before the call returns.
//!
//! Effect order for an attached component:
//!
//! 1. position correction (pivot moved to the new feet edge)
//! 2. collider inversion ([`BoxCollider`] and [`PickupCollider`])
//! 3. speed transform and dash direction
//! 4. visuals ([`Scale`] and [`LightOffset`], as the active
//!    [`VisualController`] allows)
//! 5. external flag mirror in the [`SessionStore`]
//!
//! Steps 1 to 4 use the built-in behavior only when the orientation actually
//! changed; a custom hook in [`GravityHooks`](crate::components::gravity::GravityHooks)
//! replaces the built-in step and runs on every request.
//!
//! All functions here take `&mut World` so they can be called from exclusive
//! systems, trigger callbacks and listener callbacks alike.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::actor::{DashDirection, Player};
use crate::components::boxcollider::{BoxCollider, PickupCollider};
use crate::components::gravity::{GravityComponent, GravityType, SpeedAccessor};
use crate::components::listener::GravityListener;
use crate::components::mapposition::MapPosition;
use crate::components::scale::{LightOffset, Scale};
use crate::controllers::active_config;
use crate::controllers::visual::VisualController;
use crate::events::gravity::{GravityChangeEvent, GravityChanged};
use crate::resources::gravityconfig::GravityConfig;
use crate::resources::playergravity::PlayerGravity;
use crate::resources::room::RoomState;
use crate::resources::session::SessionStore;

/// Request a gravity change on `entity`.
///
/// Returns `false` without any effect or notification when the entity has no
/// [`GravityComponent`], the component is locked, or `requested` is
/// [`GravityType::None`]. Requesting the current orientation still notifies
/// listeners, with `changed() == false`.
pub fn set_gravity(
    world: &mut World,
    entity: Entity,
    requested: GravityType,
    momentum_multiplier: f32,
    instant: bool,
) -> bool {
    let Some(gravity) = world.get::<GravityComponent>(entity) else {
        return false;
    };
    if gravity.locked || requested == GravityType::None {
        return false;
    }

    let old = gravity.current();
    let attached = gravity.is_attached();
    let change = GravityChangeEvent {
        new_value: requested.resolve(old),
        old_value: Some(old),
        momentum_multiplier,
        was_toggled: requested == GravityType::Toggle,
        instant,
    };

    if let Some(mut gravity) = world.get_mut::<GravityComponent>(entity) {
        gravity.set_current(change.new_value);
    }
    if change.changed() {
        debug!(
            "{:?}: gravity {} -> {} (momentum {}, instant {})",
            entity, old, change.new_value, momentum_multiplier, instant
        );
    }

    if attached {
        apply_effects(world, entity, &change);
    }
    broadcast(world, entity, change);
    true
}

/// [`set_gravity`] with a momentum multiplier of 1 and no instant launch.
pub fn request_gravity(world: &mut World, entity: Entity, requested: GravityType) -> bool {
    set_gravity(world, entity, requested, 1.0, false)
}

/// Resolved orientation of `entity`, if it has gravity.
pub fn current_gravity(world: &World, entity: Entity) -> Option<GravityType> {
    world.get::<GravityComponent>(entity).map(|g| g.current())
}

/// Whether `entity` should currently behave inverted.
///
/// Uses the component's invert check when one is installed, otherwise the
/// stored orientation. Entities without gravity are never inverted.
pub fn should_invert(world: &World, entity: Entity) -> bool {
    match world.get::<GravityComponent>(entity) {
        Some(gravity) => match gravity.hooks.should_invert {
            Some(check) => check(world, entity),
            None => gravity.is_inverted(),
        },
        None => false,
    }
}

/// Attach `component` to `entity` and bring the entity to `initial`.
///
/// The effects for an inverted start are applied silently, then a single
/// [`GravityChangeEvent::initial`] is broadcast so listeners can pick up the
/// starting state. Entities with [`Player`] take the player slot. Returns
/// `false` if the entity does not exist or `initial` is not an orientation.
pub fn attach_gravity(
    world: &mut World,
    entity: Entity,
    mut component: GravityComponent,
    initial: GravityType,
) -> bool {
    if !initial.is_persisted() || world.get_entity(entity).is_err() {
        return false;
    }
    component.set_attached(true);
    world.entity_mut(entity).insert(component);

    if world.get::<Player>(entity).is_some() {
        world
            .get_resource_or_insert_with(PlayerGravity::default)
            .on_player_attached(entity);
    }

    if initial == GravityType::Inverted {
        if let Some(mut gravity) = world.get_mut::<GravityComponent>(entity) {
            gravity.set_current(GravityType::Inverted);
        }
        let change = GravityChangeEvent {
            new_value: GravityType::Inverted,
            old_value: Some(GravityType::Normal),
            momentum_multiplier: 1.0,
            was_toggled: false,
            instant: false,
        };
        apply_effects(world, entity, &change);
    } else {
        mirror_flag(world, entity, initial);
    }

    broadcast(world, entity, GravityChangeEvent::initial(initial));
    true
}

/// Remove gravity from `entity`, returning it to Normal first.
///
/// The component is unlocked and a standard Normal request is made so effects
/// and listeners run once; afterwards the external flag is cleared and the
/// player slot released.
pub fn detach_gravity(world: &mut World, entity: Entity) -> bool {
    let Some(mut gravity) = world.get_mut::<GravityComponent>(entity) else {
        return false;
    };
    gravity.locked = false;
    set_gravity(world, entity, GravityType::Normal, 1.0, false);

    let flag = world
        .get::<GravityComponent>(entity)
        .and_then(|g| g.flag.clone());
    if let (Some(flag), Some(mut session)) = (flag, world.get_resource_mut::<SessionStore>()) {
        session.clear_flag(&flag);
    }
    world.entity_mut(entity).remove::<GravityComponent>();
    if let Some(mut player) = world.get_resource_mut::<PlayerGravity>() {
        player.on_player_detached(entity);
    }
    true
}

/// Spawn `listener` as a child of `owner` so it is despawned with it.
pub fn spawn_listener(world: &mut World, owner: Entity, listener: GravityListener) -> Entity {
    world.spawn((listener, ChildOf(owner))).id()
}

/// Notify every matching listener, then the [`GravityChanged`] observers.
fn broadcast(world: &mut World, source: Entity, change: GravityChangeEvent) {
    let mut listeners = world.query::<(Entity, &GravityListener)>();
    let snapshot: Vec<(Entity, GravityListener)> = listeners
        .iter(world)
        .map(|(entity, listener)| (entity, listener.clone()))
        .collect();

    for (listener_entity, listener) in snapshot {
        // A callback earlier in the pass may have removed this listener.
        if world.get::<GravityListener>(listener_entity).is_none() {
            continue;
        }
        if listener.accepts(world, source) {
            (listener.callback)(world, listener_entity, source, change);
        }
    }

    world.trigger(GravityChanged {
        entity: source,
        change,
    });
}

fn apply_effects(world: &mut World, entity: Entity, change: &GravityChangeEvent) {
    let Some(hooks) = world.get::<GravityComponent>(entity).map(|g| g.hooks) else {
        return;
    };
    let changed = change.changed();

    match hooks.update_position {
        Some(hook) => hook(world, entity, change),
        None if changed => correct_position(world, entity),
        None => {}
    }
    match hooks.update_colliders {
        Some(hook) => hook(world, entity, change),
        None if changed => flip_colliders(world, entity),
        None => {}
    }
    match hooks.update_speed {
        Some(hook) => hook(world, entity, change),
        None if changed => {
            transform_speed(world, entity, change, hooks.speed);
            flip_dash_direction(world, entity);
        }
        None => {}
    }
    match hooks.update_visuals {
        Some(hook) => hook(world, entity, change),
        None if changed => apply_visuals(world, entity, change.new_value),
        None => {}
    }

    mirror_flag(world, entity, change.new_value);
}

/// Move the pivot to the opposite top/bottom edge of the collider, keeping
/// the collider box itself in place once it is flipped.
fn correct_position(world: &mut World, entity: Entity) {
    let Some(collider) = world.get::<BoxCollider>(entity).copied() else {
        return;
    };
    if let Some(mut position) = world.get_mut::<MapPosition>(entity) {
        let (min, max) = collider.aabb(position.pos);
        position.pos.y = min.y + max.y - position.pos.y;
    }
}

fn flip_colliders(world: &mut World, entity: Entity) {
    if let Some(mut collider) = world.get_mut::<BoxCollider>(entity) {
        collider.flip_vertical();
    }
    if let Some(mut pickup) = world.get_mut::<PickupCollider>(entity) {
        pickup.0.flip_vertical();
    }
}

fn transform_speed(
    world: &mut World,
    entity: Entity,
    change: &GravityChangeEvent,
    accessor: Option<SpeedAccessor>,
) {
    let accessor = accessor.unwrap_or_else(SpeedAccessor::rigid_body);
    let Some(mut speed) = (accessor.get)(world, entity) else {
        return;
    };
    if change.instant {
        let in_space = world
            .get_resource::<RoomState>()
            .map(|room| room.in_space)
            .unwrap_or(false);
        let launch = world
            .get_resource::<GravityConfig>()
            .map(|config| config.launch_speed(in_space))
            .unwrap_or_else(|| GravityConfig::new().launch_speed(in_space));
        speed.y = change.new_value.down_sign() * launch;
    } else {
        speed.y *= -change.momentum_multiplier;
    }
    trace!("{:?}: speed after flip {:?}", entity, speed);
    (accessor.set)(world, entity, speed);
}

fn flip_dash_direction(world: &mut World, entity: Entity) {
    if let Some(mut dash) = world.get_mut::<DashDirection>(entity) {
        dash.0.y = -dash.0.y;
    }
}

fn apply_visuals(world: &mut World, entity: Entity, value: GravityType) {
    let visuals = active_config::<VisualController>(world);
    let inverted = value == GravityType::Inverted;
    if let Some(mut scale) = world.get_mut::<Scale>(entity) {
        scale.set_flipped(inverted && visuals.flip_sprite);
    }
    if let Some(mut light) = world.get_mut::<LightOffset>(entity) {
        light.set_flipped(inverted && visuals.flip_light);
    }
}

/// Bring the visuals of every gravity entity in line with the active
/// [`VisualController`]. Entities with a custom visual hook are skipped.
pub fn refresh_visuals(world: &mut World) {
    let mut query = world.query::<(Entity, &GravityComponent)>();
    let targets: Vec<(Entity, GravityType)> = query
        .iter(world)
        .filter(|(_, gravity)| gravity.hooks.update_visuals.is_none())
        .map(|(entity, gravity)| (entity, gravity.current()))
        .collect();
    for (entity, value) in targets {
        apply_visuals(world, entity, value);
    }
}

fn mirror_flag(world: &mut World, entity: Entity, value: GravityType) {
    let Some(flag) = world
        .get::<GravityComponent>(entity)
        .and_then(|g| g.flag.clone())
    else {
        return;
    };
    if let Some(mut session) = world.get_resource_mut::<SessionStore>() {
        session.set_flag_value(&flag, value == GravityType::Inverted);
    }
}

/// Re-request gravity wherever an external flag disagrees with the stored
/// orientation. The flag wins.
pub fn sync_gravity_flags(world: &mut World) {
    let Some(session) = world.get_resource::<SessionStore>() else {
        return;
    };
    let session = session.clone();

    let mut query = world.query::<(Entity, &GravityComponent)>();
    let drifted: Vec<(Entity, GravityType)> = query
        .iter(world)
        .filter(|(_, gravity)| gravity.is_attached())
        .filter_map(|(entity, gravity)| {
            let flag = gravity.flag.as_deref()?;
            let wanted = if session.has_flag(flag) {
                GravityType::Inverted
            } else {
                GravityType::Normal
            };
            (wanted != gravity.current()).then_some((entity, wanted))
        })
        .collect();

    for (entity, wanted) in drifted {
        debug!("{:?}: gravity flag drifted, resyncing to {}", entity, wanted);
        request_gravity(world, entity, wanted);
    }
}
