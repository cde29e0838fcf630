//! Per-run session storage.
//!
//! The [`SessionStore`] resource is the key-value store that survives room
//! transitions and is written to save files. Gravity components mirror their
//! state into flags here, and cross-room settings (alternate mode, respawn
//! gravity) are kept under well-known keys.
//!
//! The store serializes with `serde`, so a snapshot can be taken and restored
//! wholesale (see [`crate::systems::session`]).

use std::path::Path;

use bevy_ecs::prelude::Resource;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::gravity::GravityType;

/// Flag set while the alternate (flip-on-jump) control mode is enabled.
pub const ALT_MODE_FLAG: &str = "gravityflip_alt_mode";
/// Integer key holding the gravity code applied on respawn.
pub const INITIAL_GRAVITY_KEY: &str = "gravityflip_initial_gravity";
/// Flag mirroring the player's orientation; set while inverted.
pub const PLAYER_GRAVITY_FLAG: &str = "gravityflip_player_inverted";

/// Errors returned while reading or writing save files.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session key-value storage.
///
/// Flags are presence-only: a key being present means "true".
#[derive(Debug, Clone, Default, PartialEq, Resource, Serialize, Deserialize)]
pub struct SessionStore {
    #[serde(default)]
    pub flags: FxHashSet<String>,
    #[serde(default)]
    pub integers: FxHashMap<String, i32>,
    #[serde(default)]
    pub strings: FxHashMap<String, String>,
}

impl SessionStore {
    /// Mark a flag as present/true.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    /// Remove a flag (make it false/absent).
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    /// Set or clear a flag from a boolean.
    pub fn set_flag_value(&mut self, key: &str, value: bool) {
        if value {
            self.flags.insert(key.to_string());
        } else {
            self.flags.remove(key);
        }
    }
    /// Check whether a flag is present/true.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
    /// Set an integer value.
    pub fn set_integer(&mut self, key: impl Into<String>, value: i32) {
        self.integers.insert(key.into(), value);
    }
    /// Get an integer value by key.
    pub fn get_integer(&self, key: &str) -> Option<i32> {
        self.integers.get(key).copied()
    }
    /// Set a string value.
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }
    /// Get a string value by key.
    pub fn get_string(&self, key: &str) -> Option<&String> {
        self.strings.get(key)
    }

    /// Gravity applied to the player on respawn. Defaults to Normal.
    pub fn initial_gravity(&self) -> GravityType {
        self.get_integer(INITIAL_GRAVITY_KEY)
            .and_then(|code| GravityType::from_code(code as i64))
            .filter(|g| g.is_persisted())
            .unwrap_or(GravityType::Normal)
    }

    /// Store the respawn gravity. Request values are ignored.
    pub fn set_initial_gravity(&mut self, gravity: GravityType) {
        let code = match gravity {
            GravityType::Normal => 0,
            GravityType::Inverted => 1,
            _ => return,
        };
        self.set_integer(INITIAL_GRAVITY_KEY, code);
    }

    pub fn alt_mode_enabled(&self) -> bool {
        self.has_flag(ALT_MODE_FLAG)
    }

    pub fn set_alt_mode_enabled(&mut self, enabled: bool) {
        self.set_flag_value(ALT_MODE_FLAG, enabled);
    }

    /// Write the store as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
