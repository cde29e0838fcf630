//! Map loading and room transitions.
//!
//! [`load_map`] places every persistent controller and records room children
//! for all rooms up front. [`enter_room`] then swaps the room-scoped entities:
//!
//! 1. despawn everything tagged [`RoomScoped`]
//! 2. trigger [`RoomTransitionEvent`]
//! 3. make the new room current in [`RoomState`]
//! 4. run the transition hook of every persistent controller
//! 5. refresh gravity visuals for the new room's settings
//! 6. spawn the room's placed entities through the catalog spawners
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::indicator::GravityIndicator;
use crate::components::mapposition::MapPosition;
use crate::components::persistent::RoomScoped;
use crate::controllers::{
    ControllerCatalog, load_all_controllers, reset_all_controllers, run_all_transitioned,
};
use crate::events::room::RoomTransitionEvent;
use crate::resources::gravityconfig::GravityConfig;
use crate::resources::mapdata::{EntityData, MapData, RoomData};
use crate::resources::playergravity::PlayerGravity;
use crate::resources::room::{RoomState, current_room};
use crate::systems::field::FieldToggleGuard;
use crate::systems::gravity::{detach_gravity, refresh_visuals};
use crate::systems::session::reattach_player;

/// Replace the loaded map with `map`. No room is current afterwards.
pub fn load_map(world: &mut World, map: MapData) {
    clear_scene(world);
    load_all_controllers(world, &map);
    info!("Loaded map with {} rooms", map.rooms.len());
    world.insert_resource(map);
}

/// Make `name` the current room. Returns false if the map has no such room.
pub fn enter_room(world: &mut World, name: &str) -> bool {
    let Some(room) = world
        .get_resource::<MapData>()
        .and_then(|map| map.room(name))
        .cloned()
    else {
        warn!("enter_room: unknown room '{}'", name);
        return false;
    };

    let from = current_room(world).to_string();
    despawn_room_entities(world);
    world.trigger(RoomTransitionEvent {
        from: from.clone(),
        to: room.name.clone(),
    });

    {
        let mut state = world.get_resource_or_insert_with(RoomState::default);
        state.current = room.name.clone();
        state.in_space = room.in_space;
    }
    world.insert_resource(FieldToggleGuard::default());
    run_all_transitioned(world);
    refresh_visuals(world);
    spawn_room_entities(world, &room);

    info!("Entered room '{}' (from '{}')", room.name, from);
    true
}

/// Tear down the loaded scene: room entities and persistent controllers.
/// The player slot is cleared, then re-pointed at a surviving player.
pub fn clear_scene(world: &mut World) {
    despawn_room_entities(world);
    reset_all_controllers(world);
    if let Some(mut player) = world.get_resource_mut::<PlayerGravity>() {
        player.clear();
    }
    world.insert_resource(RoomState::default());
    reattach_player(world);
}

fn despawn_room_entities(world: &mut World) {
    let mut query = world.query_filtered::<Entity, With<RoomScoped>>();
    let entities: Vec<Entity> = query.iter(world).collect();
    for entity in entities {
        // Children go with their parent, so some may already be gone.
        if world.get_entity(entity).is_err() {
            continue;
        }
        detach_gravity(world, entity);
        world.despawn(entity);
    }
}

fn spawn_room_entities(world: &mut World, room: &RoomData) {
    let Some(catalog) = world.get_resource::<ControllerCatalog>().cloned() else {
        return;
    };
    for data in &room.entities {
        if catalog.is_controller(&data.name) {
            continue;
        }
        let Some(spawner) = catalog.spawner(&data.name) else {
            debug!("room '{}': no spawner for '{}'", room.name, data.name);
            continue;
        };
        if let Some(entity) = spawner(world, data) {
            if let Ok(mut entity) = world.get_entity_mut(entity) {
                entity.insert(RoomScoped {
                    room: room.name.clone(),
                });
            }
        }
    }
}

/// Room spawner for `gravityIndicator` placements.
pub fn spawn_indicator_from_data(world: &mut World, data: &EntityData) -> Option<Entity> {
    let preview_time = world
        .get_resource::<GravityConfig>()
        .map(|config| config.indicator_preview_time)
        .unwrap_or_else(|| GravityConfig::new().indicator_preview_time);
    Some(
        world
            .spawn((
                MapPosition::new(data.x, data.y),
                GravityIndicator {
                    upcoming: None,
                    preview_time,
                    beat_index: 0,
                },
            ))
            .id(),
    )
}
