//! Holdable and field behavior settings.
use log::warn;

use crate::components::gravity::GravityType;
use crate::controllers::ControllerConfig;
use crate::resources::mapdata::EntityData;

const DEFAULT_HOLDABLE_RESET_TIME: f32 = 2.0;

/// Settings consumed by holdable adapters and gravity fields.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorController {
    /// Seconds an unheld object waits before returning to `holdable_reset_type`.
    /// Zero or less disables the reset.
    pub holdable_reset_time: f32,
    pub holdable_reset_type: GravityType,
    /// Allow only one field Toggle per object per frame.
    pub exclusive_field_toggles: bool,
}

impl Default for BehaviorController {
    fn default() -> Self {
        Self {
            holdable_reset_time: DEFAULT_HOLDABLE_RESET_TIME,
            holdable_reset_type: GravityType::Normal,
            exclusive_field_toggles: true,
        }
    }
}

impl ControllerConfig for BehaviorController {
    const NAME: &'static str = "gravityBehaviorController";

    fn from_attributes(data: &EntityData) -> Self {
        let defaults = Self::default();
        let mut reset_type = data.gravity_type("holdable_reset_type", defaults.holdable_reset_type);
        if !reset_type.is_persisted() {
            warn!(
                "{}: holdable_reset_type must be Normal or Inverted, got {}",
                data.name,
                reset_type
            );
            reset_type = defaults.holdable_reset_type;
        }
        Self {
            holdable_reset_time: data.float("holdable_reset_time", defaults.holdable_reset_time),
            holdable_reset_type: reset_type,
            exclusive_field_toggles: data
                .bool("exclusive_field_toggles", defaults.exclusive_field_toggles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_values_are_not_reset_types() {
        let data = EntityData::new(BehaviorController::NAME)
            .with_attr("holdable_reset_type", "Toggle")
            .with_attr("holdable_reset_time", 4.5);
        let config = BehaviorController::from_attributes(&data);
        assert_eq!(config.holdable_reset_type, GravityType::Normal);
        assert_eq!(config.holdable_reset_time, 4.5);
        assert!(config.exclusive_field_toggles);
    }
}
