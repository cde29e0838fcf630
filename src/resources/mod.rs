//! ECS resources made available to systems.
//!
//! Overview
//! - `gravityconfig` – launch speeds, alternate mode buffer, indicator timing
//! - `input` – per-frame jump state with edge detection and consumption
//! - `mapdata` – rooms and placed entities loaded from JSON
//! - `playergravity` – the current player gravity slot
//! - `room` – the current room
//! - `session` – key-value session store persisted in saves
//! - `worldtime` – simulation time and delta
pub mod gravityconfig;
pub mod input;
pub mod mapdata;
pub mod playergravity;
pub mod room;
pub mod session;
pub mod worldtime;
