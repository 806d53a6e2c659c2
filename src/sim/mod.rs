//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta only, no clocks
//! - Seeded layout RNG only
//! - Stable iteration order (platform and coin indices)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod layout;
pub mod phase;
pub mod rng;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Rect, SweepResult, sweep_platforms, touching_coins};
pub use layout::{LayoutPolicy, Level, TerrainSegment, build_level};
pub use phase::{GamePhase, PhaseMachine};
pub use rng::LayoutRng;
pub use state::{
    Coin, FrameView, GameEvent, Hero, Platform, PlatformKind, Progress, Simulation, Viewport, World,
};
pub use tick::advance;
