//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (host timestamps to frame deltas)
//! - Input events (key codes to actions)
//! - Orientation (portrait touch screens pause play)

use crate::consts::MAX_FRAME_DT;
use crate::input::Action;
use crate::sim::Viewport;

/// Map a `KeyboardEvent.code` to an action
pub fn action_for_key(code: &str) -> Option<Action> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Action::MoveLeft),
        "ArrowRight" | "KeyD" => Some(Action::MoveRight),
        "ArrowDown" | "KeyS" => Some(Action::Crouch),
        "ArrowUp" | "Space" | "KeyW" => Some(Action::Jump),
        _ => None,
    }
}

/// Keys whose browser default (scrolling) must be suppressed
pub fn key_prevents_default(code: &str) -> bool {
    action_for_key(code).is_some()
}

/// Portrait on a coarse pointer (phone held upright) blocks play
pub fn orientation_blocks(coarse_pointer: bool, viewport: Viewport) -> bool {
    coarse_pointer && viewport.height > viewport.width
}

/// Turns host frame timestamps (milliseconds) into clamped deltas (seconds)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Delta since the previous timestamp. The first frame, a clock going
    /// backwards, or a garbage timestamp all yield 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            log::warn!("Ignoring non-finite frame timestamp");
            return 0.0;
        }
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0.0;
        };
        let dt = ((now_ms - last) / 1000.0) as f32;
        if dt <= 0.0 { 0.0 } else { dt.min(self.max_dt) }
    }

    /// Forget the last timestamp (tab hidden, restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
