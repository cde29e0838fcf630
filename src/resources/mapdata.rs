//! Room and map metadata.
//!
//! A map is a list of rooms, each with a list of placed entities. Every
//! placement is a flat attribute bag; the typed accessors on [`EntityData`]
//! never fail, they log and fall back to the supplied default so one bad
//! attribute cannot abort a whole room.
//!
//! ```json
//! {
//!   "rooms": [
//!     {
//!       "name": "a-00",
//!       "entities": [
//!         { "name": "gravityBehaviorController",
//!           "attributes": { "persistent": true, "holdable_reset_time": 3.0 } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::str::FromStr;

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::components::gravity::GravityType;

/// Errors returned while loading map files.
#[derive(Debug, Error)]
pub enum MapError {
    /// I/O error reading the map file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One placed entity.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntityData {
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub attributes: FxHashMap<String, Value>,
}

impl EntityData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder used by tests and tools to fill the attribute bag.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.attributes.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => self.fallback(key, default),
            },
            Some(_) => self.fallback(key, default),
        }
    }

    pub fn float(&self, key: &str, default: f32) -> f32 {
        match self.attributes.get(key) {
            None => default,
            Some(Value::Number(n)) => n.as_f64().map(|v| v as f32).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().parse::<f32>() {
                Ok(v) => v,
                Err(_) => self.fallback(key, default),
            },
            Some(_) => self.fallback(key, default),
        }
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        match self.attributes.get(key) {
            None => default,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => v,
                None => self.fallback(key, default),
            },
            Some(Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(v) => v,
                Err(_) => self.fallback(key, default),
            },
            Some(_) => self.fallback(key, default),
        }
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        match self.attributes.get(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(_) => self.fallback(key, default.to_string()),
        }
    }

    /// Parse an enumerant stored as a string or integer code.
    pub fn parse<T: FromStr>(&self, key: &str, default: T) -> T {
        let raw = match self.attributes.get(key) {
            None => return default,
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return self.fallback(key, default),
        };
        match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => self.fallback(key, default),
        }
    }

    pub fn gravity_type(&self, key: &str, default: GravityType) -> GravityType {
        self.parse(key, default)
    }

    fn fallback<T>(&self, key: &str, default: T) -> T {
        warn!(
            "{}: attribute '{}' has an invalid value {:?}, using default",
            self.name,
            key,
            self.attributes.get(key)
        );
        default
    }
}

/// One room of the map.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RoomData {
    pub name: String,
    /// Reduced-gravity room; instant flips launch slower.
    #[serde(default)]
    pub in_space: bool,
    #[serde(default)]
    pub entities: Vec<EntityData>,
}

impl RoomData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_entity(mut self, entity: EntityData) -> Self {
        self.entities.push(entity);
        self
    }
}

/// The loaded map, kept as a resource so rooms can be spawned on entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Resource)]
pub struct MapData {
    #[serde(default)]
    pub rooms: Vec<RoomData>,
}

impl MapData {
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn room(&self, name: &str) -> Option<&RoomData> {
        self.rooms.iter().find(|room| room.name == name)
    }

    pub fn with_room(mut self, room: RoomData) -> Self {
        self.rooms.push(room);
        self
    }
}
