//! Beat-synced gravity sequence settings.
//!
//! The sequence is a comma separated list of gravity tokens, one per beat:
//!
//! ```text
//! Normal, Inverted, None, Toggle
//! 0, 1, -1, 2
//! ```
//!
//! Tokens that do not parse become [`GravityType::None`], so the beat they
//! occupy does nothing and the following beats keep their positions.
use log::warn;

use crate::components::gravity::GravityType;
use crate::controllers::ControllerConfig;
use crate::resources::mapdata::EntityData;

#[derive(Debug, Clone, PartialEq)]
pub struct CassetteController {
    pub sequence: Vec<GravityType>,
    pub momentum_multiplier: f32,
    pub instant_flip: bool,
}

impl Default for CassetteController {
    fn default() -> Self {
        Self {
            sequence: Vec::new(),
            momentum_multiplier: 1.0,
            instant_flip: false,
        }
    }
}

impl CassetteController {
    /// Gravity requested on beat `index`. `None` when out of range.
    pub fn state_at(&self, index: usize) -> Option<GravityType> {
        self.sequence.get(index).copied()
    }
}

/// Parse a beat sequence, degrading malformed tokens to `None`.
pub fn parse_cassette_sequence(raw: &str) -> Vec<GravityType> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|token| match token.parse::<GravityType>() {
            Ok(gravity) => gravity,
            Err(err) => {
                warn!("cassette sequence: {}, beat skipped", err);
                GravityType::None
            }
        })
        .collect()
}

impl ControllerConfig for CassetteController {
    const NAME: &'static str = "gravityCassetteController";

    fn from_attributes(data: &EntityData) -> Self {
        let defaults = Self::default();
        Self {
            sequence: parse_cassette_sequence(&data.string("sequence", "")),
            momentum_multiplier: data.float("momentum_multiplier", defaults.momentum_multiplier),
            instant_flip: data.bool("instant_flip", defaults.instant_flip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!(
            parse_cassette_sequence("Normal, 1,toggle,-1"),
            vec![
                GravityType::Normal,
                GravityType::Inverted,
                GravityType::Toggle,
                GravityType::None
            ]
        );
    }

    #[test]
    fn malformed_tokens_keep_their_slot() {
        assert_eq!(
            parse_cassette_sequence("Inverted,sideways,5,Normal"),
            vec![
                GravityType::Inverted,
                GravityType::None,
                GravityType::None,
                GravityType::Normal
            ]
        );
        assert!(parse_cassette_sequence("  ").is_empty());
    }
}
