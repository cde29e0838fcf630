//! Audio command queue upkeep.
//!
//! Gravity features write [`AudioCmd`] messages; the host reads them with a
//! `MessageReader<AudioCmd>` or drains them through [`drain_audio_cmds`].
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;

use crate::events::audio::AudioCmd;

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Take every pending audio command out of the queue.
pub fn drain_audio_cmds(world: &mut World) -> Vec<AudioCmd> {
    world
        .get_resource_mut::<Messages<AudioCmd>>()
        .map(|mut msgs| msgs.drain().collect())
        .unwrap_or_default()
}
