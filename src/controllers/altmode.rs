//! Alternate control mode settings.
//!
//! In the alternate mode a jump press flips gravity instead of jumping on
//! the surfaces mapped to [`SurfaceAction::Flip`]. The per-frame state machine
//! lives in [`crate::systems::altmode`]; this module holds the configuration,
//! the session flag and the activity query.
use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::controllers::{ControllerConfig, active_config, persistent_controller};
use crate::resources::gravityconfig::GravityConfig;
use crate::resources::mapdata::EntityData;
use crate::resources::session::SessionStore;
use crate::systems::altmode::update_dash_lock;

/// Whether a room enables the alternate mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AltModeSetting {
    /// Keep whatever the session currently says.
    Unchanged,
    #[default]
    Enabled,
    Disabled,
}

/// What a jump press does on a given kind of footing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceAction {
    /// Nothing happens; the press is swallowed.
    None,
    /// Regular jump handling.
    #[default]
    Jump,
    /// Instant gravity toggle.
    Flip,
}

impl fmt::Display for SurfaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceAction::None => "None",
            SurfaceAction::Jump => "Jump",
            SurfaceAction::Flip => "Flip",
        };
        f.write_str(name)
    }
}

impl FromStr for SurfaceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(SurfaceAction::None),
            "jump" | "1" => Ok(SurfaceAction::Jump),
            "flip" | "2" => Ok(SurfaceAction::Flip),
            other => Err(format!("invalid surface action '{}'", other)),
        }
    }
}

impl FromStr for AltModeSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unchanged" | "0" => Ok(AltModeSetting::Unchanged),
            "enabled" | "1" => Ok(AltModeSetting::Enabled),
            "disabled" | "2" => Ok(AltModeSetting::Disabled),
            other => Err(format!("invalid alternate mode setting '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AltModeController {
    pub setting: AltModeSetting,
    /// Sound played on an alternate-mode flip. Empty to disable.
    pub flip_sound: String,
    /// Dashes are unavailable while the mode is active.
    pub disable_dash: bool,
    pub solid_ground: SurfaceAction,
    pub other_platforms: SurfaceAction,
    pub airborne_with_jumps: SurfaceAction,
}

impl Default for AltModeController {
    fn default() -> Self {
        Self {
            setting: AltModeSetting::Enabled,
            flip_sound: "gravity_alt_flip".to_string(),
            disable_dash: false,
            solid_ground: SurfaceAction::Flip,
            other_platforms: SurfaceAction::Flip,
            airborne_with_jumps: SurfaceAction::Jump,
        }
    }
}

impl ControllerConfig for AltModeController {
    const NAME: &'static str = "gravityAltModeController";

    fn from_attributes(data: &EntityData) -> Self {
        let defaults = Self::default();
        Self {
            setting: data.parse("setting", defaults.setting),
            flip_sound: data.string("flip_sound", &defaults.flip_sound),
            disable_dash: data.bool("disable_dash", defaults.disable_dash),
            solid_ground: data.parse("solid_ground", defaults.solid_ground),
            other_platforms: data.parse("other_platforms", defaults.other_platforms),
            airborne_with_jumps: data.parse("airborne_with_jumps", defaults.airborne_with_jumps),
        }
    }

    fn transitioned(world: &mut World, _persistent: Entity) {
        let config = active_config::<AltModeController>(world);
        match config.setting {
            AltModeSetting::Unchanged => {}
            AltModeSetting::Enabled => set_alt_mode(world, true),
            AltModeSetting::Disabled => set_alt_mode(world, false),
        }
        update_dash_lock(world);
    }
}

/// Whether jump presses are currently routed to gravity flips.
pub fn is_alt_mode_active(world: &World) -> bool {
    let forced = world
        .get_resource::<GravityConfig>()
        .map(|config| config.force_alt_mode)
        .unwrap_or(false);
    if forced {
        return true;
    }
    persistent_controller::<AltModeController>(world).is_some()
        && world
            .get_resource::<SessionStore>()
            .map(|session| session.alt_mode_enabled())
            .unwrap_or(false)
}

/// Persist the alternate mode choice in the session.
pub fn set_alt_mode(world: &mut World, enabled: bool) {
    let mut session = world.get_resource_or_insert_with(SessionStore::default);
    if session.alt_mode_enabled() != enabled {
        debug!("alternate mode {}", if enabled { "enabled" } else { "disabled" });
        session.set_alt_mode_enabled(enabled);
    }
}
