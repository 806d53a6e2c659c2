//! Player intent
//!
//! Two kinds of input reach the simulation. Movement and crouch are held
//! (level-triggered) and sampled every frame. Jump is a one-shot request that
//! is latched on press and consumed by the next frame whether or not it
//! produced a jump.

use serde::{Deserialize, Serialize};

/// A single player action, from a key, a touch button or a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Crouch,
    Jump,
}

impl Action {
    /// Map an on-screen control name (`data-action` attribute)
    pub fn from_control(name: &str) -> Option<Self> {
        match name {
            "move-left" => Some(Action::MoveLeft),
            "move-right" => Some(Action::MoveRight),
            "crouch" => Some(Action::Crouch),
            "jump" => Some(Action::Jump),
            _ => None,
        }
    }
}

/// Level-triggered actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldActions {
    pub left: bool,
    pub right: bool,
    pub crouch: bool,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub crouch: bool,
    /// A jump was requested since the previous frame
    pub jump: bool,
}

impl TickInput {
    /// Held right
    pub fn right() -> Self {
        Self {
            right: true,
            ..Default::default()
        }
    }

    /// Held left
    pub fn left() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }

    /// One-shot jump with nothing held
    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Default::default()
        }
    }

    /// -1, 0 or +1. Left wins if both are held.
    pub fn direction(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

/// Accumulates host events between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HeldActions,
    jump_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release an action
    pub fn set(&mut self, action: Action, active: bool) {
        match action {
            Action::MoveLeft => self.held.left = active,
            Action::MoveRight => self.held.right = active,
            Action::Crouch => self.held.crouch = active,
            // Release is meaningless for a one-shot
            Action::Jump => {
                if active {
                    self.jump_requested = true;
                }
            }
        }
    }

    /// Drop everything held (focus loss, pointer cancel)
    pub fn release_all(&mut self) {
        self.held = HeldActions::default();
        self.jump_requested = false;
    }

    /// Snapshot for the next frame, consuming the jump request
    pub fn take_tick_input(&mut self) -> TickInput {
        let jump = std::mem::take(&mut self.jump_requested);
        TickInput {
            left: self.held.left,
            right: self.held.right,
            crouch: self.held.crouch,
            jump,
        }
    }
}
