//! Gravity systems.
//!
//! Most of these are exclusive (`&mut World`) so a gravity request can apply
//! its effects and notify listeners before returning.
//!
//! Submodules overview
//! - [`altmode`] – flip-on-jump buffer window and dash lock
//! - [`audio`] – audio command queue upkeep
//! - [`cassette`] – beat-synced gravity sequencing
//! - [`collision`] – AABB overlap queries
//! - [`field`] – gravity fields and the per-frame toggle guard
//! - [`gravity`] – gravity requests, attach/detach and listener fan-out
//! - [`holdable`] – carried objects follow their carrier and reset when idle
//! - [`room`] – map loading and room transitions
//! - [`session`] – player lifecycle and session save/restore
//! - [`time`] – update simulation time and delta
//! - [`timed`] – timed gravity sequencing
//! - [`trigger`] – spatial trigger membership and callbacks

pub mod altmode;
pub mod audio;
pub mod cassette;
pub mod collision;
pub mod field;
pub mod gravity;
pub mod holdable;
pub mod room;
pub mod session;
pub mod time;
pub mod timed;
pub mod trigger;
