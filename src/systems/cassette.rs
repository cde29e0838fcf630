//! Beat-synced gravity sequencing.
//!
//! Drains [`BeatMessage`]s every frame. Without a persistent
//! [`CassetteController`] the messages are dropped and nothing happens.
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use log::trace;

use crate::components::actor::MovementState;
use crate::components::gravity::GravityType;
use crate::components::indicator::GravityIndicator;
use crate::controllers::cassette::CassetteController;
use crate::controllers::{active_config, persistent_controller};
use crate::events::beat::BeatMessage;
use crate::resources::gravityconfig::GravityConfig;
use crate::resources::playergravity::player_gravity;
use crate::systems::gravity::set_gravity;

pub fn cassette_system(world: &mut World) {
    let beats: Vec<BeatMessage> = match world.get_resource_mut::<Messages<BeatMessage>>() {
        Some(mut messages) => messages.drain().collect(),
        None => return,
    };
    if beats.is_empty() || persistent_controller::<CassetteController>(world).is_none() {
        return;
    }
    let config = active_config::<CassetteController>(world);
    for beat in beats {
        match beat {
            BeatMessage::Precursor { index, tempo } => preview_beat(world, &config, index.saturating_add(1), tempo),
            BeatMessage::Activate { index } => activate_beat(world, &config, index),
        }
    }
}

/// Show the state of beat `index` on every indicator.
fn preview_beat(world: &mut World, config: &CassetteController, index: usize, tempo: f32) {
    let base = world
        .get_resource::<GravityConfig>()
        .map(|c| c.indicator_preview_time)
        .unwrap_or_else(|| GravityConfig::new().indicator_preview_time);
    let preview_time = if tempo > 0.0 { base / tempo } else { base };
    let upcoming = config.state_at(index);

    let mut indicators = world.query::<&mut GravityIndicator>();
    for mut indicator in indicators.iter_mut(world) {
        indicator.upcoming = upcoming;
        indicator.preview_time = preview_time;
        indicator.beat_index = index;
    }
}

fn activate_beat(world: &mut World, config: &CassetteController, index: usize) {
    let Some(state) = config.state_at(index) else {
        trace!("cassette beat {} is past the end of the sequence", index);
        return;
    };
    if state == GravityType::None {
        return;
    }
    let Some(player) = player_gravity(world) else {
        return;
    };
    let controllable = world
        .get::<MovementState>(player)
        .map(|m| m.is_controllable())
        .unwrap_or(true);
    if controllable {
        set_gravity(world, player, state, config.momentum_multiplier, config.instant_flip);
    }
}
