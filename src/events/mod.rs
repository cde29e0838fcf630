//! Event and message types exchanged by gravity systems.
//!
//! Submodules:
//! - [`audio`] – sound requests for the host audio layer
//! - [`beat`] – precursor/activation messages from the rhythm source
//! - [`gravity`] – the change description and its observer event
//! - [`room`] – room transition notification
pub mod audio;
pub mod beat;
pub mod gravity;
pub mod room;
