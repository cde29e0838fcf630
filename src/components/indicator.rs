//! Display of the upcoming cassette gravity.

use bevy_ecs::prelude::Component;

use crate::components::gravity::GravityType;

/// Indicator showing which gravity the next beat will apply.
///
/// Updated by the cassette sequencer on every beat precursor; the renderer
/// animates the preview over `preview_time` seconds.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct GravityIndicator {
    pub upcoming: Option<GravityType>,
    pub preview_time: f32,
    pub beat_index: usize,
}
