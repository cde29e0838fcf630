//! Flip sounds for the player.
//!
//! [`play_flip_sound`] is installed as a player listener at setup. It plays
//! the sound configured on the active [`SoundController`] for the resulting
//! orientation; toggles use their own sound when one is set.
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;

use crate::controllers::{ControllerConfig, active_config};
use crate::components::gravity::GravityType;
use crate::events::audio::AudioCmd;
use crate::events::gravity::GravityChangeEvent;
use crate::resources::mapdata::EntityData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundController {
    pub normal_sound: String,
    pub inverted_sound: String,
    /// Played for toggles instead of the per-orientation sound. Empty to disable.
    pub toggle_sound: String,
}

impl Default for SoundController {
    fn default() -> Self {
        Self {
            normal_sound: "gravity_normal".to_string(),
            inverted_sound: "gravity_inverted".to_string(),
            toggle_sound: String::new(),
        }
    }
}

impl SoundController {
    /// Sound id for `change`, if any.
    pub fn sound_for(&self, change: &GravityChangeEvent) -> Option<&str> {
        let id = if change.was_toggled && !self.toggle_sound.is_empty() {
            &self.toggle_sound
        } else {
            match change.new_value {
                GravityType::Inverted => &self.inverted_sound,
                _ => &self.normal_sound,
            }
        };
        (!id.is_empty()).then_some(id.as_str())
    }
}

impl ControllerConfig for SoundController {
    const NAME: &'static str = "gravitySoundController";

    fn from_attributes(data: &EntityData) -> Self {
        let defaults = Self::default();
        Self {
            normal_sound: data.string("normal_sound", &defaults.normal_sound),
            inverted_sound: data.string("inverted_sound", &defaults.inverted_sound),
            toggle_sound: data.string("toggle_sound", &defaults.toggle_sound),
        }
    }
}

/// Player listener writing an [`AudioCmd`] for every actual flip.
pub fn play_flip_sound(
    world: &mut World,
    _listener: Entity,
    _source: Entity,
    change: GravityChangeEvent,
) {
    if !change.changed() {
        return;
    }
    let config = active_config::<SoundController>(world);
    let Some(id) = config.sound_for(&change) else {
        return;
    };
    if let Some(mut messages) = world.get_resource_mut::<Messages<AudioCmd>>() {
        messages.write(AudioCmd::play_fx(id));
    }
}
