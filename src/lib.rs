//! Gravity flip library.
//!
//! Runtime gravity inversion for a 2D platformer, built on `bevy_ecs`. This
//! module exposes the components, resources, systems, events and controllers
//! for use by the host game, integration tests and the headless demo binary.

pub mod components;
pub mod controllers;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
