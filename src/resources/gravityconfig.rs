//! Gravity configuration resource.
//!
//! Tuning values that are not placed per room: launch speeds, the alternate
//! mode buffer window, indicator timing. Loaded from an INI file with safe
//! defaults for anything missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [gravity]
//! instant_launch_speed = 160
//! space_launch_multiplier = 0.6
//!
//! [alt_mode]
//! force_enable = false
//! buffer_time = 0.08
//!
//! [indicator]
//! preview_time = 0.5
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_INSTANT_LAUNCH_SPEED: f32 = 160.0;
const DEFAULT_SPACE_LAUNCH_MULTIPLIER: f32 = 0.6;
const DEFAULT_FORCE_ALT_MODE: bool = false;
const DEFAULT_ALT_MODE_BUFFER_TIME: f32 = 0.08;
const DEFAULT_INDICATOR_PREVIEW_TIME: f32 = 0.5;
const DEFAULT_CONFIG_PATH: &str = "./gravity.ini";

/// Gravity configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GravityConfig {
    /// Vertical speed an instant flip snaps to, toward the new gravity.
    pub instant_launch_speed: f32,
    /// Multiplier applied to the launch speed in rooms flagged as space.
    pub space_launch_multiplier: f32,
    /// Enable the alternate control mode even without a placed controller.
    pub force_alt_mode: bool,
    /// Seconds a captured jump press stays eligible to flip.
    pub alt_mode_buffer_time: f32,
    /// Preview duration for indicators at tempo 1.0.
    pub indicator_preview_time: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            instant_launch_speed: DEFAULT_INSTANT_LAUNCH_SPEED,
            space_launch_multiplier: DEFAULT_SPACE_LAUNCH_MULTIPLIER,
            force_alt_mode: DEFAULT_FORCE_ALT_MODE,
            alt_mode_buffer_time: DEFAULT_ALT_MODE_BUFFER_TIME,
            indicator_preview_time: DEFAULT_INDICATOR_PREVIEW_TIME,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [gravity] section
        if let Some(speed) = config.getfloat("gravity", "instant_launch_speed").ok().flatten() {
            self.instant_launch_speed = speed as f32;
        }
        if let Some(mult) = config
            .getfloat("gravity", "space_launch_multiplier")
            .ok()
            .flatten()
        {
            self.space_launch_multiplier = mult as f32;
        }

        // [alt_mode] section
        if let Some(force) = config.getbool("alt_mode", "force_enable").ok().flatten() {
            self.force_alt_mode = force;
        }
        if let Some(buffer) = config.getfloat("alt_mode", "buffer_time").ok().flatten() {
            self.alt_mode_buffer_time = (buffer as f32).max(0.0);
        }

        // [indicator] section
        if let Some(preview) = config.getfloat("indicator", "preview_time").ok().flatten() {
            self.indicator_preview_time = (preview as f32).max(0.0);
        }

        info!(
            "Loaded gravity config: launch={} space_mult={} force_alt={} buffer={} preview={}",
            self.instant_launch_speed,
            self.space_launch_multiplier,
            self.force_alt_mode,
            self.alt_mode_buffer_time,
            self.indicator_preview_time
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "gravity",
            "instant_launch_speed",
            Some(self.instant_launch_speed.to_string()),
        );
        config.set(
            "gravity",
            "space_launch_multiplier",
            Some(self.space_launch_multiplier.to_string()),
        );
        config.set("alt_mode", "force_enable", Some(self.force_alt_mode.to_string()));
        config.set(
            "alt_mode",
            "buffer_time",
            Some(self.alt_mode_buffer_time.to_string()),
        );
        config.set(
            "indicator",
            "preview_time",
            Some(self.indicator_preview_time.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved gravity config to {:?}", self.config_path);

        Ok(())
    }

    /// Launch speed for an instant flip, honoring the space multiplier.
    pub fn launch_speed(&self, in_space: bool) -> f32 {
        if in_space {
            self.instant_launch_speed * self.space_launch_multiplier
        } else {
            self.instant_launch_speed
        }
    }
}
