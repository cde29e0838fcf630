//! Audio requests raised by gravity features.
//!
//! The subsystem never plays sounds itself. It writes [`AudioCmd`] messages
//! that the host's audio bridge drains once per frame.
use bevy_ecs::message::Message;

/// Commands sent *to* the host audio layer.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    PlayFx { id: String },
}

impl AudioCmd {
    pub fn play_fx(id: impl Into<String>) -> Self {
        AudioCmd::PlayFx { id: id.into() }
    }
}
