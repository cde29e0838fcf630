//! Beat signals from the host's rhythm source.
//!
//! A precursor follows each beat so indicators can preview the next one.
//! The activation message marks the beat itself.
use bevy_ecs::message::Message;

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum BeatMessage {
    /// Precursor following beat `index`; indicators preview beat `index + 1`.
    /// `tempo` scales preview timing.
    Precursor { index: usize, tempo: f32 },
    /// The beat `index` is happening now.
    Activate { index: usize },
}
