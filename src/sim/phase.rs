//! Run phase and the orientation overlay
//!
//! The respawn grace window is not a phase of its own; it lives in the hero's
//! control-lock and invulnerability timers.

use serde::{Deserialize, Serialize};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level built, waiting for the start signal
    #[default]
    AwaitingStart,
    /// Active gameplay
    Playing,
    /// Out of lives; terminal until restart
    GameOver,
}

/// Phase plus the orthogonal orientation block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseMachine {
    phase: GamePhase,
    orientation_blocked: bool,
}

impl PhaseMachine {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn orientation_blocked(&self) -> bool {
        self.orientation_blocked
    }

    /// True when physics and input must not run this frame
    pub fn is_gated(&self) -> bool {
        self.orientation_blocked || self.phase != GamePhase::Playing
    }

    /// AwaitingStart -> Playing. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::AwaitingStart {
            log::warn!("Start ignored in phase {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Playing;
        log::info!("Run started");
        true
    }

    /// Playing -> GameOver
    pub fn enter_game_over(&mut self) {
        if self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            log::info!("Game over");
        }
    }

    /// Any phase -> AwaitingStart (level reset)
    pub fn reset(&mut self) {
        self.phase = GamePhase::AwaitingStart;
    }

    /// Returns true if the flag changed
    pub fn set_orientation_blocked(&mut self, blocked: bool) -> bool {
        if self.orientation_blocked == blocked {
            return false;
        }
        self.orientation_blocked = blocked;
        log::info!(
            "Orientation {}",
            if blocked { "blocked" } else { "unblocked" }
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_gated() {
        let machine = PhaseMachine::default();
        assert_eq!(machine.phase(), GamePhase::AwaitingStart);
        assert!(machine.is_gated());
    }

    #[test]
    fn test_full_cycle() {
        let mut machine = PhaseMachine::default();
        assert!(machine.start());
        assert!(!machine.is_gated());

        machine.enter_game_over();
        assert!(machine.is_game_over());
        assert!(machine.is_gated());
        // Cannot start straight out of game over
        assert!(!machine.start());

        machine.reset();
        assert_eq!(machine.phase(), GamePhase::AwaitingStart);
        assert!(machine.start());
    }

    #[test]
    fn test_orientation_overlay_is_orthogonal() {
        let mut machine = PhaseMachine::default();
        machine.start();
        assert!(machine.set_orientation_blocked(true));
        assert!(machine.is_gated());
        assert_eq!(machine.phase(), GamePhase::Playing);
        assert!(!machine.set_orientation_blocked(true));
        machine.set_orientation_blocked(false);
        assert!(!machine.is_gated());
    }
}
