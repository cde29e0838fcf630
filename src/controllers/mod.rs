//! Room-scoped controllers and their resolution.
//!
//! A controller is a placed map entity that configures one concern (sounds,
//! visuals, holdable behavior, beat sequencing, timed sequencing, alternate
//! mode).
//! For each controller type there is at most one **persistent** instance for
//! the whole map, spawned at map load and kept across rooms, plus any number
//! of **room children**: configuration-only placements that override the
//! persistent settings while their room is current.
//!
//! Resolution is a pure lookup over a [`ControllerRegistry<C>`] populated at
//! map load:
//!
//! 1. the child placed in the current room, if any
//! 2. otherwise the persistent instance
//! 3. otherwise `C::default()`
//!
//! [`ControllerCatalog`] keeps the type-erased entry points (load, room
//! transition, reset) for every registered controller type, together with the
//! spawners for plain room entities. The room systems drive everything
//! through it without knowing the concrete types.
//!
//! # Map data
//!
//! Controllers are recognized by entity name (`C::NAME`). The `persistent`
//! attribute selects the kind of instance; every other attribute is read by
//! `C::from_attributes`.

pub mod altmode;
pub mod behavior;
pub mod cassette;
pub mod sound;
pub mod timed;
pub mod visual;

use bevy_ecs::prelude::*;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::components::persistent::Persistent;
use crate::resources::mapdata::{EntityData, MapData};
use crate::resources::room::current_room;

/// Configuration carried by one controller type.
pub trait ControllerConfig: Clone + Default + Send + Sync + 'static {
    /// Entity name identifying this controller in map data.
    const NAME: &'static str;

    /// Build the configuration from a placed entity's attributes.
    fn from_attributes(data: &EntityData) -> Self;

    /// Called on the persistent instance after every room transition, once
    /// the new room is current.
    fn transitioned(_world: &mut World, _persistent: Entity) {}

    /// Called once after the persistent instance is spawned at map load.
    fn spawned(_world: &mut World, _persistent: Entity) {}
}

/// Configuration stored on a persistent controller entity.
#[derive(Component, Debug, Clone)]
pub struct Controller<C: ControllerConfig> {
    pub config: C,
}

/// Marker for persistent controller entities of any type.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PersistentController;

/// The controller instance whose settings currently apply.
#[derive(Debug, PartialEq)]
pub enum ActiveController<'a, C> {
    /// The child placed in the current room.
    RoomChild(&'a C),
    /// The persistent instance, no child in this room.
    Persistent(Entity),
    /// Nothing placed; default settings apply.
    Default,
}

/// Per-type lookup from room name to placed configuration.
#[derive(Resource, Debug)]
pub struct ControllerRegistry<C: ControllerConfig> {
    persistent: Option<Entity>,
    children: FxHashMap<String, C>,
}

impl<C: ControllerConfig> Default for ControllerRegistry<C> {
    fn default() -> Self {
        Self {
            persistent: None,
            children: FxHashMap::default(),
        }
    }
}

impl<C: ControllerConfig> ControllerRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persistent(&self) -> Option<Entity> {
        self.persistent
    }

    /// Register the persistent instance, returning the one it replaces.
    pub fn set_persistent(&mut self, entity: Entity) -> Option<Entity> {
        self.persistent.replace(entity)
    }

    /// Register the child for `room`, returning the one it replaces.
    pub fn add_child(&mut self, room: impl Into<String>, config: C) -> Option<C> {
        self.children.insert(room.into(), config)
    }

    pub fn child(&self, room: &str) -> Option<&C> {
        self.children.get(room)
    }

    pub fn clear(&mut self) {
        self.persistent = None;
        self.children.clear();
    }

    /// Which instance applies while `room` is current.
    pub fn resolve(&self, room: &str) -> ActiveController<'_, C> {
        if let Some(child) = self.children.get(room) {
            return ActiveController::RoomChild(child);
        }
        match self.persistent {
            Some(entity) => ActiveController::Persistent(entity),
            None => ActiveController::Default,
        }
    }
}

/// Spawns a plain room entity from its placement. Returns the root entity.
pub type EntitySpawner = fn(world: &mut World, data: &EntityData) -> Option<Entity>;

#[derive(Clone, Copy)]
struct CatalogEntry {
    name: &'static str,
    load: fn(&mut World, &MapData),
    transitioned: fn(&mut World),
    reset: fn(&mut World),
}

/// Registry of controller types and room entity spawners.
#[derive(Resource, Default, Clone)]
pub struct ControllerCatalog {
    entries: Vec<CatalogEntry>,
    spawners: FxHashMap<String, EntitySpawner>,
}

impl ControllerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spawner for entities named `name`.
    pub fn insert_spawner(&mut self, name: impl Into<String>, spawner: EntitySpawner) {
        self.spawners.insert(name.into(), spawner);
    }

    pub fn spawner(&self, name: &str) -> Option<EntitySpawner> {
        self.spawners.get(name).copied()
    }

    /// Whether `name` is a registered controller type.
    pub fn is_controller(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn controller_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}

/// Register controller type `C` so map loading and room transitions see it.
pub fn register_controller<C: ControllerConfig>(world: &mut World) {
    world.init_resource::<ControllerRegistry<C>>();
    let mut catalog = world.get_resource_or_insert_with(ControllerCatalog::default);
    if catalog.is_controller(C::NAME) {
        return;
    }
    catalog.entries.push(CatalogEntry {
        name: C::NAME,
        load: load_controllers::<C>,
        transitioned: run_transitioned::<C>,
        reset: reset_controllers::<C>,
    });
}

/// Settings of the active instance of `C` for the current room.
pub fn active_config<C: ControllerConfig>(world: &World) -> C {
    let Some(registry) = world.get_resource::<ControllerRegistry<C>>() else {
        return C::default();
    };
    match registry.resolve(current_room(world)) {
        ActiveController::RoomChild(config) => config.clone(),
        ActiveController::Persistent(entity) => world
            .get::<Controller<C>>(entity)
            .map(|controller| controller.config.clone())
            .unwrap_or_default(),
        ActiveController::Default => C::default(),
    }
}

/// The live persistent instance of `C`, if one was placed.
pub fn persistent_controller<C: ControllerConfig>(world: &World) -> Option<Entity> {
    let entity = world.get_resource::<ControllerRegistry<C>>()?.persistent()?;
    world.get::<Controller<C>>(entity).map(|_| entity)
}

/// Load every registered controller type from `map`.
pub fn load_all_controllers(world: &mut World, map: &MapData) {
    let entries = match world.get_resource::<ControllerCatalog>() {
        Some(catalog) => catalog.entries.clone(),
        None => return,
    };
    for entry in entries {
        (entry.reset)(world);
        (entry.load)(world, map);
    }
}

/// Fire the transition hook of every persistent controller.
pub fn run_all_transitioned(world: &mut World) {
    let entries = match world.get_resource::<ControllerCatalog>() {
        Some(catalog) => catalog.entries.clone(),
        None => return,
    };
    for entry in entries {
        (entry.transitioned)(world);
    }
}

/// Despawn all persistent controllers and forget all placements.
pub fn reset_all_controllers(world: &mut World) {
    let entries = match world.get_resource::<ControllerCatalog>() {
        Some(catalog) => catalog.entries.clone(),
        None => return,
    };
    for entry in entries {
        (entry.reset)(world);
    }
}

fn load_controllers<C: ControllerConfig>(world: &mut World, map: &MapData) {
    for room in &map.rooms {
        for data in room.entities.iter().filter(|data| data.name == C::NAME) {
            let config = C::from_attributes(data);
            if data.bool("persistent", false) {
                spawn_persistent(world, &room.name, config);
            } else {
                let previous = world
                    .resource_mut::<ControllerRegistry<C>>()
                    .add_child(room.name.clone(), config);
                if previous.is_some() {
                    warn!(
                        "{}: more than one controller placed in room '{}', using the last one",
                        C::NAME,
                        room.name
                    );
                }
            }
        }
    }
}

fn spawn_persistent<C: ControllerConfig>(world: &mut World, room: &str, config: C) {
    let entity = world
        .spawn((Controller { config }, PersistentController, Persistent))
        .id();
    let previous = world
        .resource_mut::<ControllerRegistry<C>>()
        .set_persistent(entity);
    if let Some(previous) = previous {
        warn!(
            "{}: duplicate persistent controller in room '{}', replacing {:?}",
            C::NAME,
            room,
            previous
        );
        if world.get_entity(previous).is_ok() {
            world.despawn(previous);
        }
    } else {
        info!("{}: persistent controller placed in room '{}'", C::NAME, room);
    }
    C::spawned(world, entity);
}

fn run_transitioned<C: ControllerConfig>(world: &mut World) {
    if let Some(entity) = persistent_controller::<C>(world) {
        debug!("{}: room transition", C::NAME);
        C::transitioned(world, entity);
    }
}

fn reset_controllers<C: ControllerConfig>(world: &mut World) {
    let previous = world
        .get_resource::<ControllerRegistry<C>>()
        .and_then(|registry| registry.persistent());
    if let Some(entity) = previous {
        if world.get_entity(entity).is_ok() {
            world.despawn(entity);
        }
    }
    if let Some(mut registry) = world.get_resource_mut::<ControllerRegistry<C>>() {
        registry.clear();
    }
}
