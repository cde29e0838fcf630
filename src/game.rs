//! World setup and the per-frame schedule.
//!
//! [`setup`] inserts every resource the gravity systems read, registers the
//! controller types and room entity spawners, and initializes the message
//! queues. [`build_update_schedule`] returns the systems in the order they
//! must run each frame. The host advances time and input before running it:
//!
//! ```ignore
//! update_world_time(&mut world, dt);
//! world.resource_mut::<InputState>().update(jump_down);
//! schedule.run(&mut world);
//! ```
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;

use crate::components::gravity::GravityComponent;
use crate::controllers::altmode::AltModeController;
use crate::controllers::behavior::BehaviorController;
use crate::controllers::cassette::CassetteController;
use crate::controllers::sound::SoundController;
use crate::controllers::timed::TimedGravityController;
use crate::controllers::visual::VisualController;
use crate::controllers::{ControllerCatalog, register_controller};
use crate::events::audio::AudioCmd;
use crate::events::beat::BeatMessage;
use crate::resources::gravityconfig::GravityConfig;
use crate::resources::input::InputState;
use crate::resources::playergravity::PlayerGravity;
use crate::resources::room::RoomState;
use crate::resources::session::SessionStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::altmode::{AltModeState, alt_mode_system};
use crate::systems::audio::update_bevy_audio_cmds;
use crate::systems::cassette::cassette_system;
use crate::systems::field::{FieldToggleGuard, spawn_field_from_data};
use crate::systems::gravity::sync_gravity_flags;
use crate::systems::holdable::{holdable_gravity_system, spawn_holdable_from_data};
use crate::systems::room::spawn_indicator_from_data;
use crate::systems::timed::timed_sequence_system;
use crate::systems::trigger::spatial_trigger_system;

/// Prepare `world` with `config`. Existing session data is kept.
pub fn setup(world: &mut World, config: GravityConfig) {
    world.insert_resource(config);
    world.init_resource::<WorldTime>();
    world.init_resource::<InputState>();
    world.init_resource::<SessionStore>();
    world.init_resource::<PlayerGravity>();
    world.init_resource::<RoomState>();
    world.init_resource::<AltModeState>();
    world.init_resource::<FieldToggleGuard>();
    world.init_resource::<Messages<AudioCmd>>();
    world.init_resource::<Messages<BeatMessage>>();

    register_controller::<BehaviorController>(world);
    register_controller::<SoundController>(world);
    register_controller::<CassetteController>(world);
    register_controller::<TimedGravityController>(world);
    register_controller::<AltModeController>(world);
    register_controller::<VisualController>(world);

    let mut catalog = world.resource_mut::<ControllerCatalog>();
    catalog.insert_spawner("gravityField", spawn_field_from_data);
    catalog.insert_spawner("gravityHoldable", spawn_holdable_from_data);
    catalog.insert_spawner("gravityIndicator", spawn_indicator_from_data);
}

/// Per-frame gravity systems, in order.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            sync_gravity_flags,
            spatial_trigger_system::<GravityComponent>,
            holdable_gravity_system,
            cassette_system,
            timed_sequence_system,
            alt_mode_system,
            update_bevy_audio_cmds,
        )
            .chain(),
    );
    update
}
