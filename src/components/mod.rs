//! ECS components for entities.
//!
//! Submodules overview:
//! - [`actor`] – actor/player markers, ground contact, jump and dash inventory
//! - [`boxcollider`] – axis-aligned rectangular collider and pickup collider
//! - [`field`] – zone requesting a gravity change on entering actors
//! - [`gravity`] – gravity state, request values and per-entity hooks
//! - [`group`] – tag component for grouping entities by name
//! - [`holdable`] – carryable objects and their gravity adapter
//! - [`indicator`] – display of the upcoming beat gravity
//! - [`listener`] – observers of gravity changes with target filters
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`persistent`] – persistent and room-scoped lifetime markers
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`scale`] – sprite scale and light offset flipped with gravity
//! - [`trigger`] – generic overlap tracking with enter/stay/leave callbacks

pub mod actor;
pub mod boxcollider;
pub mod field;
pub mod gravity;
pub mod group;
pub mod holdable;
pub mod indicator;
pub mod listener;
pub mod mapposition;
pub mod persistent;
pub mod rigidbody;
pub mod scale;
pub mod trigger;
