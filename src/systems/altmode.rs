//! Alternate mode: flip on jump.
//!
//! While the mode is active a jump press opens a short buffer window. The
//! player's footing is classified every frame through the active
//! [`AltModeController`] mapping:
//!
//! - solid ground uses `solid_ground`
//! - any other platform uses `other_platforms`
//! - airborne with extra jumps left uses `airborne_with_jumps`
//! - airborne without extra jumps does nothing
//!
//! A `Jump` classification hands the press to normal jump handling and closes
//! the window. Otherwise, while the window is open, the press is consumed;
//! on a `Flip` classification with a flippable movement state the player
//! toggles gravity instantly (spending an extra jump when airborne) and the
//! window closes. The window then runs down with world time, so a press that
//! never meets usable footing expires without a flip.

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::{Dashes, ExtraJumps, GroundContact, MovementState};
use crate::components::gravity::GravityType;
use crate::controllers::altmode::{AltModeController, SurfaceAction, is_alt_mode_active};
use crate::controllers::active_config;
use crate::events::audio::AudioCmd;
use crate::resources::gravityconfig::GravityConfig;
use crate::resources::input::InputState;
use crate::resources::playergravity::player_gravity;
use crate::resources::worldtime::WorldTime;
use crate::systems::gravity::set_gravity;

/// Cross-frame state of the alternate mode.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct AltModeState {
    /// Seconds the buffered jump press stays eligible. Zero when closed.
    pub buffer_remaining: f32,
    /// Dashes are currently withheld by the mode.
    pub dash_disabled: bool,
}

impl AltModeState {
    pub fn buffer_open(&self) -> bool {
        self.buffer_remaining > 0.0
    }

    fn close_buffer(&mut self) {
        self.buffer_remaining = 0.0;
    }
}

/// Classify the footing of `player` for a jump press.
pub fn classify_surface(world: &World, player: Entity, config: &AltModeController) -> SurfaceAction {
    let contact = world.get::<GroundContact>(player).copied().unwrap_or_default();
    if contact.on_solid {
        return config.solid_ground;
    }
    if contact.on_platform {
        return config.other_platforms;
    }
    let extra_jumps = world
        .get::<ExtraJumps>(player)
        .map(|jumps| jumps.available)
        .unwrap_or(0);
    if extra_jumps > 0 {
        config.airborne_with_jumps
    } else {
        SurfaceAction::None
    }
}

/// Per-frame alternate mode update.
pub fn alt_mode_system(world: &mut World) {
    world.init_resource::<AltModeState>();
    update_dash_lock(world);

    if !is_alt_mode_active(world) {
        world.resource_mut::<AltModeState>().close_buffer();
        return;
    }
    let Some(player) = player_gravity(world) else {
        world.resource_mut::<AltModeState>().close_buffer();
        return;
    };

    let config = active_config::<AltModeController>(world);
    let buffer_time = world
        .get_resource::<GravityConfig>()
        .map(|c| c.alt_mode_buffer_time)
        .unwrap_or_else(|| GravityConfig::new().alt_mode_buffer_time);
    let delta = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .unwrap_or(0.0);

    let pressed = world
        .get_resource::<InputState>()
        .map(|input| input.jump.pressed_unconsumed())
        .unwrap_or(false);
    if pressed {
        world.resource_mut::<AltModeState>().buffer_remaining = buffer_time;
    }

    let action = classify_surface(world, player, &config);
    if action == SurfaceAction::Jump {
        world.resource_mut::<AltModeState>().close_buffer();
        return;
    }

    if world.resource::<AltModeState>().buffer_open() {
        if let Some(mut input) = world.get_resource_mut::<InputState>() {
            input.jump.consume();
        }
        let movement = world
            .get::<MovementState>(player)
            .copied()
            .unwrap_or_default();
        if action == SurfaceAction::Flip && movement.allows_flip() {
            flip(world, player, &config);
            world.resource_mut::<AltModeState>().close_buffer();
            return;
        }
    }

    let mut state = world.resource_mut::<AltModeState>();
    state.buffer_remaining = (state.buffer_remaining - delta).max(0.0);
}

fn flip(world: &mut World, player: Entity, config: &AltModeController) {
    let grounded = world
        .get::<GroundContact>(player)
        .map(|contact| contact.is_grounded())
        .unwrap_or(false);
    if !grounded {
        if let Some(mut jumps) = world.get_mut::<ExtraJumps>(player) {
            jumps.consume_one();
        }
    }
    debug!("{:?}: alternate mode flip", player);
    if set_gravity(world, player, GravityType::Toggle, 1.0, true) && !config.flip_sound.is_empty() {
        if let Some(mut messages) = world.get_resource_mut::<Messages<AudioCmd>>() {
            messages.write(AudioCmd::play_fx(config.flip_sound.clone()));
        }
    }
}

/// Withhold or restore the player's dashes when the combination of
/// "mode active" and "dash disabled" changes.
pub fn update_dash_lock(world: &mut World) {
    let wanted = is_alt_mode_active(world) && active_config::<AltModeController>(world).disable_dash;
    let mut state = world.get_resource_or_insert_with(AltModeState::default);
    if state.dash_disabled == wanted {
        return;
    }
    state.dash_disabled = wanted;

    let Some(player) = player_gravity(world) else {
        return;
    };
    if let Some(mut dashes) = world.get_mut::<Dashes>(player) {
        if wanted {
            dashes.empty();
        } else {
            dashes.refill();
        }
    }
    debug!("dashes {}", if wanted { "disabled" } else { "restored" });
}
