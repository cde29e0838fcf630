//! Per-frame input intents.
//!
//! The host samples its input devices and feeds the raw "jump held" state in
//! through [`InputState::update`] before running the schedule. Systems read
//! edges from here and may consume a press so that normal jump handling
//! ignores it.
use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean button state with edge detection.
pub struct BoolState {
    /// Whether the button is currently held.
    pub active: bool,
    /// Whether the button was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the button was just released this frame.
    pub just_released: bool,
    /// A system already used this frame's press.
    pub consumed: bool,
}

impl BoolState {
    /// Advance one frame with the raw held state.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
        if self.just_pressed {
            self.consumed = false;
        }
    }

    /// Mark the current press as used. Idempotent.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// A fresh press nobody has consumed yet.
    pub fn pressed_unconsumed(&self) -> bool {
        self.just_pressed && !self.consumed
    }
}

/// Resource capturing the per-frame input state relevant to gravity.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    pub jump: BoolState,
}

impl InputState {
    /// Feed this frame's raw button states.
    pub fn update(&mut self, jump_down: bool) {
        self.jump.update(jump_down);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_is_one_frame() {
        let mut input = InputState::default();
        input.update(true);
        assert!(input.jump.just_pressed);
        input.update(true);
        assert!(!input.jump.just_pressed);
        assert!(input.jump.active);
        input.update(false);
        assert!(input.jump.just_released);
    }

    #[test]
    fn consume_clears_on_next_press() {
        let mut input = InputState::default();
        input.update(true);
        input.jump.consume();
        assert!(!input.jump.pressed_unconsumed());
        input.update(false);
        input.update(true);
        assert!(input.jump.pressed_unconsumed());
    }
}
