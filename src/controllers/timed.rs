//! Timed gravity sequence settings and playback state.
//!
//! The sequence is a comma separated list of `gravity:delay` pairs. Each step
//! waits `delay` seconds, then requests `gravity` on the player:
//!
//! ```text
//! Inverted:1.5, Normal:1.5, Toggle:0.25
//! ```
//!
//! A pair with the wrong arity, an unknown gravity or a delay that is not a
//! non-negative number is dropped from the sequence with a warning.
use bevy_ecs::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::gravity::GravityType;
use crate::controllers::{ControllerConfig, active_config};
use crate::resources::mapdata::EntityData;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedStep {
    pub gravity: GravityType,
    pub delay: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedGravityController {
    pub sequence: Vec<TimedStep>,
    pub looping: bool,
    pub momentum_multiplier: f32,
    pub instant_flip: bool,
}

impl Default for TimedGravityController {
    fn default() -> Self {
        Self {
            sequence: Vec::new(),
            looping: true,
            momentum_multiplier: 1.0,
            instant_flip: false,
        }
    }
}

/// Parse `gravity:delay` pairs, skipping malformed ones.
pub fn parse_timed_sequence(raw: &str) -> Vec<TimedStep> {
    raw.split(',')
        .filter(|pair| !pair.trim().is_empty())
        .filter_map(|pair| match parse_step(pair) {
            Ok(step) => Some(step),
            Err(reason) => {
                warn!("timed sequence: dropping '{}': {}", pair.trim(), reason);
                None
            }
        })
        .collect()
}

fn parse_step(pair: &str) -> Result<TimedStep, String> {
    let parts: Vec<&str> = pair.split(':').collect();
    let [gravity, delay] = parts.as_slice() else {
        return Err(format!("expected gravity:delay, got {} fields", parts.len()));
    };
    let gravity = gravity.parse::<GravityType>()?;
    let delay = delay
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid delay: {}", e))?;
    if !delay.is_finite() || delay < 0.0 {
        return Err(format!("delay must be non-negative, got {}", delay));
    }
    Ok(TimedStep { gravity, delay })
}

impl ControllerConfig for TimedGravityController {
    const NAME: &'static str = "gravityTimedController";

    fn from_attributes(data: &EntityData) -> Self {
        let defaults = Self::default();
        Self {
            sequence: parse_timed_sequence(&data.string("sequence", "")),
            looping: data.bool("looping", defaults.looping),
            momentum_multiplier: data.float("momentum_multiplier", defaults.momentum_multiplier),
            instant_flip: data.bool("instant_flip", defaults.instant_flip),
        }
    }

    fn transitioned(world: &mut World, persistent: Entity) {
        restart_sequence(world, persistent);
    }

    fn spawned(world: &mut World, persistent: Entity) {
        restart_sequence(world, persistent);
    }
}

/// Playback position, stored on the persistent controller.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedSequenceState {
    pub index: usize,
    /// Seconds until the step at `index` fires.
    pub remaining: f32,
    pub finished: bool,
}

impl TimedSequenceState {
    pub fn start(sequence: &[TimedStep]) -> Self {
        Self {
            index: 0,
            remaining: sequence.first().map(|step| step.delay).unwrap_or(0.0),
            finished: sequence.is_empty(),
        }
    }
}

/// Rewind the sequence for the room that just became current.
pub fn restart_sequence(world: &mut World, persistent: Entity) {
    let config = active_config::<TimedGravityController>(world);
    if let Ok(mut entity) = world.get_entity_mut(persistent) {
        entity.insert(TimedSequenceState::start(&config.sequence));
    }
}
