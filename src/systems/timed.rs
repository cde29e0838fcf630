//! Timed gravity sequencing.
//!
//! Counts down the step stored in the persistent controller's
//! [`TimedSequenceState`] and requests its gravity on the player when it
//! expires. Inert without a persistent [`TimedGravityController`].
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::MovementState;
use crate::components::gravity::GravityType;
use crate::controllers::timed::{TimedGravityController, TimedSequenceState};
use crate::controllers::{active_config, persistent_controller};
use crate::resources::playergravity::player_gravity;
use crate::resources::worldtime::WorldTime;
use crate::systems::gravity::set_gravity;

pub fn timed_sequence_system(world: &mut World) {
    let Some(controller) = persistent_controller::<TimedGravityController>(world) else {
        return;
    };
    let Some(mut state) = world.get::<TimedSequenceState>(controller).copied() else {
        return;
    };
    if state.finished {
        return;
    }
    let config = active_config::<TimedGravityController>(world);
    if config.sequence.is_empty() {
        return;
    }
    let delta = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .unwrap_or(0.0);

    state.remaining -= delta;
    // A full pass of zero delays fires each step once per frame at most.
    let mut fired = 0;
    while state.remaining <= 0.0 && !state.finished && fired < config.sequence.len() {
        let step = config.sequence[state.index % config.sequence.len()];
        fire_step(world, &config, step.gravity);
        fired += 1;

        state.index += 1;
        if state.index >= config.sequence.len() {
            if config.looping {
                state.index = 0;
            } else {
                state.finished = true;
                debug!("timed sequence finished");
                break;
            }
        }
        state.remaining += config.sequence[state.index].delay;
    }
    if state.remaining < 0.0 && fired >= config.sequence.len() {
        state.remaining = 0.0;
    }

    if let Some(mut stored) = world.get_mut::<TimedSequenceState>(controller) {
        *stored = state;
    }
}

fn fire_step(world: &mut World, config: &TimedGravityController, gravity: GravityType) {
    let Some(player) = player_gravity(world) else {
        return;
    };
    let controllable = world
        .get::<MovementState>(player)
        .map(|m| m.is_controllable())
        .unwrap_or(true);
    if controllable {
        set_gravity(world, player, gravity, config.momentum_multiplier, config.instant_flip);
    }
}
