//! Ledge Runner - side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Simulation (movement, collisions, camera, lives)
//! - `input`: Held actions and one-shot jump requests
//! - `platform`: Browser/native glue (keys, orientation, frame clock)
//! - `tuning`: Data-driven physics and layout balance
//! - `web`: wasm-bindgen bridge for the browser host

pub mod input;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Action, InputState, TickInput};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Longest frame the clock driver will hand to the simulation
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Hero movement (pixels, seconds)
    pub const HERO_SPEED: f32 = 220.0;
    pub const HERO_CROUCH_SPEED: f32 = 120.0;
    /// Negative = upward
    pub const JUMP_VELOCITY: f32 = -520.0;
    pub const GRAVITY: f32 = 1500.0;
    pub const MAX_JUMPS: u8 = 2;

    /// Hero body
    pub const STAND_HEIGHT: f32 = 118.0;
    pub const CROUCH_HEIGHT: f32 = 78.0;
    /// Width / height of the run sprite's collision box
    pub const HERO_ASPECT: f32 = 62.0 / 118.0;
    pub const HERO_START_X: f32 = 120.0;

    /// Respawn grace windows (seconds)
    pub const RESPAWN_CONTROL_LOCK: f32 = 0.6;
    pub const RESPAWN_INVULNERABILITY: f32 = 2.0;
    pub const BLINK_INTERVAL: f32 = 0.1;
    pub const MAX_LIVES: u8 = 3;

    /// Fallback respawn point when no platform was ever stood on
    pub const FALLBACK_SPAWN_X: f32 = 80.0;
    pub const FALLBACK_SPAWN_HEIGHT_FRACTION: f32 = 0.25;

    /// Fall-death line sits this fraction of a viewport below the world
    pub const FALL_MARGIN: f32 = 0.5;

    /// Camera dead zone (fractions of the viewport)
    pub const CAMERA_MARGIN_X: f32 = 0.3;
    pub const CAMERA_MARGIN_Y: f32 = 0.35;

    /// Run cycle
    pub const ANIM_FRAME_DURATION: f32 = 0.055;
    pub const ANIM_FRAME_COUNT: u32 = 11;
    /// Minimum |vx| that counts as running
    pub const RUN_SPEED_THRESHOLD: f32 = 1.0;

    /// Level layout
    pub const WORLD_SEED: u32 = 1337;
    pub const WORLD_SCREENS: f32 = 3.0;
    pub const FLOOR_OFFSET: f32 = 40.0;
    pub const PLATFORM_THICKNESS: f32 = 24.0;
    pub const MAX_EXTRA_PLATFORMS: u32 = 6;
    pub const COIN_SIZE: f32 = 22.0;
    pub const COIN_PADDING: f32 = 6.0;
}

/// Clamp that tolerates an inverted range by collapsing to `lo`
#[inline]
pub fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi.max(lo)).max(lo)
}
