//! Browser bridge
//!
//! The page owns the canvas, the DOM controls and the `requestAnimationFrame`
//! loop. It forwards raw events here and draws whatever `frame` returns.

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::input::{Action, InputState};
use crate::platform::{FrameClock, action_for_key, key_prevents_default, orientation_blocks};
use crate::sim::{LayoutPolicy, Simulation, Viewport};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Ledge Runner starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    sim: Simulation,
    input: InputState,
    clock: FrameClock,
    policy: LayoutPolicy,
    coarse_pointer: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty for the built-in balance
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: u32, tuning_json: &str) -> WebGame {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json_or_default(tuning_json)
        };
        let clock = FrameClock::new(tuning.max_frame_dt);
        let policy = LayoutPolicy::Procedural { seed };
        let sim = Simulation::new(tuning, Viewport::new(width, height), &policy);
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            sim,
            input: InputState::new(),
            clock,
            policy,
            coarse_pointer: false,
        }
    }

    /// Returns true if the event was consumed
    pub fn key_down(&mut self, event: &KeyboardEvent) -> bool {
        self.key(event, true)
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) -> bool {
        self.key(event, false)
    }

    /// On-screen control by `data-action` name
    pub fn set_action(&mut self, name: &str, active: bool) -> bool {
        match Action::from_control(name) {
            Some(action) => {
                self.input.set(action, active);
                true
            }
            None => {
                log::warn!("Unknown control: {}", name);
                false
            }
        }
    }

    /// Window lost focus or the tab was hidden
    pub fn release_all(&mut self) {
        self.input.release_all();
        self.clock.reset();
    }

    /// Advance one animation frame and return the frame view as JSON
    pub fn frame(&mut self, timestamp_ms: f64) -> String {
        let dt = self.clock.tick(timestamp_ms);
        let input = self.input.take_tick_input();
        self.sim.advance(&input, dt);
        match serde_json::to_string(&self.sim.frame_view()) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize frame: {}", e);
                String::new()
            }
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let viewport = Viewport::new(width, height);
        if !self.sim.resize(viewport) {
            return false;
        }
        self.sim
            .set_orientation_blocked(orientation_blocks(self.coarse_pointer, viewport));
        true
    }

    /// `(pointer: coarse)` media query result
    pub fn set_coarse_pointer(&mut self, coarse: bool) {
        self.coarse_pointer = coarse;
        self.sim
            .set_orientation_blocked(orientation_blocks(coarse, self.sim.viewport));
    }

    pub fn start(&mut self) -> bool {
        self.clock.reset();
        self.sim.start()
    }

    /// New layout from a time-derived seed, lives and coins restored
    pub fn restart(&mut self) -> bool {
        let seed = js_sys::Date::now() as u64 as u32;
        self.policy = LayoutPolicy::Procedural { seed };
        log::info!("Restarting with seed: {}", seed);
        self.input.release_all();
        self.clock.reset();
        self.sim.restart(&self.policy)
    }

    pub fn is_game_over(&self) -> bool {
        self.sim.is_game_over()
    }

    pub fn lives(&self) -> u8 {
        self.sim.progress.lives
    }

    pub fn coins_collected(&self) -> u32 {
        self.sim.progress.coins_collected
    }
}

impl WebGame {
    fn key(&mut self, event: &KeyboardEvent, pressed: bool) -> bool {
        let code = event.code();
        if key_prevents_default(&code) {
            event.prevent_default();
        }
        // Auto-repeat must not re-arm the one-shot jump
        if pressed && event.repeat() {
            return action_for_key(&code).is_some();
        }
        match action_for_key(&code) {
            Some(action) => {
                self.input.set(action, pressed);
                true
            }
            None => false,
        }
    }
}
