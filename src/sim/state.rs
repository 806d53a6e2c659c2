//! Game state and core simulation types
//!
//! `Simulation` owns everything one run needs: the hero, the level, the camera,
//! counters and the event queue. Nothing lives in statics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::layout::{self, LayoutPolicy, Level};
use super::phase::{GamePhase, PhaseMachine};
use crate::tuning::Tuning;

/// Host drawing surface size, in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite and strictly positive on both axes
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// World bounds used for clamping and the fall line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

/// What a platform is, beyond its rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Full-width floor (degenerate layouts)
    Ground,
    /// Floating ledge
    Ledge { skip_coins: bool },
    /// Segment from the terrain strip
    Terrain { skip_coins: bool },
}

impl PlatformKind {
    pub fn carries_coin(&self) -> bool {
        match self {
            PlatformKind::Ground => true,
            PlatformKind::Ledge { skip_coins } | PlatformKind::Terrain { skip_coins } => {
                !skip_coins
            }
        }
    }
}

/// Axis-aligned solid rectangle. Never mutated after layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A pickup hovering over a platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub collected: bool,
    /// Spin angle (radians), cosmetic
    pub spin: f32,
    /// Bob phase (seconds), cosmetic
    pub bob: f32,
}

impl Coin {
    /// Centred over `platform`, floating `padding` above its top
    pub fn above(platform: &Platform, size: f32, padding: f32) -> Self {
        Self {
            x: platform.center_x() - size / 2.0,
            y: platform.y - size - padding,
            size,
            collected: false,
            spin: 0.0,
            bob: 0.0,
        }
    }

    /// Advance spin and bob
    pub fn animate(&mut self, dt: f32) {
        if self.collected {
            return;
        }
        self.spin = (self.spin + dt * std::f32::consts::TAU).rem_euclid(std::f32::consts::TAU);
        self.bob += dt;
    }
}

/// The player's body and bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// -1 left, +1 right
    pub facing: f32,
    /// Landed on a platform this frame
    pub grounded: bool,
    pub crouching: bool,
    pub jump_count: u8,
    /// Seconds of ignored input left; infinite after game over
    pub control_lock: f32,
    /// Seconds of fall-death immunity left
    pub invulnerability: f32,
    pub blink_timer: f32,
    /// Index into the platform list of the last landing
    pub last_safe_platform: Option<usize>,
    /// Left edge at the last landing; respawns return here
    pub last_safe_x: f32,
    /// Top of the supporting surface, if any
    pub ground_y: Option<f32>,
    pub anim_frame: u32,
    pub anim_timer: f32,
    /// Run cycle active (drives the footstep loop)
    pub running: bool,
}

impl Hero {
    /// Standing on the ground, feet at `feet_y`
    pub fn standing_at(x: f32, feet_y: f32, tuning: &Tuning) -> Self {
        let height = tuning.stand_height;
        Self {
            pos: Vec2::new(x, feet_y - height),
            vel: Vec2::ZERO,
            width: tuning.width_for_height(height),
            height,
            facing: 1.0,
            grounded: true,
            crouching: false,
            jump_count: 0,
            control_lock: 0.0,
            invulnerability: 0.0,
            blink_timer: 0.0,
            last_safe_platform: None,
            last_safe_x: x,
            ground_y: Some(feet_y),
            anim_frame: 0,
            anim_timer: 0.0,
            running: false,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    /// Renderer hint: hide the sprite on alternate blink intervals
    pub fn blink_visible(&self, interval: f32) -> bool {
        if !self.is_invulnerable() || interval <= 0.0 {
            return true;
        }
        ((self.blink_timer / interval) as u32).is_multiple_of(2)
    }

    /// Keep the body inside `[0, world_width - width]`
    pub fn clamp_x(&mut self, world_width: f32) {
        self.pos.x = crate::clamp_span(self.pos.x, 0.0, world_width - self.width);
    }

    /// Switch body height keeping the feet where they are
    pub fn resize_keeping_feet(&mut self, height: f32, tuning: &Tuning) {
        let bottom = self.bottom();
        self.height = height;
        self.width = tuning.width_for_height(height);
        self.pos.y = bottom - height;
    }
}

/// Counters shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub coins_collected: u32,
    pub lives: u8,
}

/// Things the host reacts to (sound, HUD, effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Airborne -> grounded
    Landed,
    /// Head hit a platform underside
    Bonked,
    CoinCollected { index: usize },
    LifeLost { lives_left: u8 },
    Respawned,
    GameOver,
    RunningChanged { running: bool },
}

/// The whole simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub world: World,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub hero: Hero,
    pub camera: Camera,
    pub progress: Progress,
    pub phase: PhaseMachine,
    /// Events from the most recent `advance`
    pub(crate) events: Vec<GameEvent>,
    /// Frames advanced since the level was built
    pub frame: u64,
}

impl Simulation {
    /// Build a level and park the hero on the spawn anchor, awaiting start.
    /// Tuning that fails validation is replaced by the defaults.
    pub fn new(tuning: Tuning, viewport: Viewport, policy: &LayoutPolicy) -> Self {
        let tuning = tuning.validated_or_default();
        let level = layout::build_level(policy, viewport, &tuning);
        Self::with_level(tuning, viewport, level)
    }

    /// Use a prebuilt level (tests, hand-made stages)
    pub fn with_level(tuning: Tuning, viewport: Viewport, level: Level) -> Self {
        let tuning = tuning.validated_or_default();
        let camera = Camera::new(viewport, &tuning);
        let hero = Hero::standing_at(tuning.start_x, 0.0, &tuning);
        let mut sim = Self {
            progress: Progress {
                coins_collected: 0,
                lives: tuning.max_lives,
            },
            tuning,
            viewport,
            world: level.world,
            platforms: Vec::new(),
            coins: Vec::new(),
            hero,
            camera,
            phase: PhaseMachine::default(),
            events: Vec::new(),
            frame: 0,
        };
        sim.install_level(level);
        sim
    }

    /// Replace the level wholesale and reset the run. Call between frames.
    pub fn build_level(&mut self, policy: &LayoutPolicy, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            log::warn!("Ignoring level build for invalid viewport {viewport:?}");
            return false;
        }
        self.viewport = viewport;
        let level = layout::build_level(policy, viewport, &self.tuning);
        self.install_level(level);
        true
    }

    fn install_level(&mut self, level: Level) {
        self.world = level.world;
        self.platforms = level.platforms;
        self.coins = level.coins;

        let spawn_x = match self.platforms.get(level.spawn) {
            Some(anchor) => {
                let width = self.tuning.width_for_height(self.tuning.stand_height);
                crate::clamp_span(self.tuning.start_x, anchor.x, anchor.right() - width)
            }
            None => self.tuning.start_x,
        };
        let feet_y = self
            .platforms
            .get(level.spawn)
            .map(|p| p.y)
            .unwrap_or(self.world.height * crate::consts::FALLBACK_SPAWN_HEIGHT_FRACTION);

        self.hero = Hero::standing_at(spawn_x, feet_y, &self.tuning);
        if !self.platforms.is_empty() {
            self.hero.last_safe_platform = Some(level.spawn);
        }
        self.hero.clamp_x(self.world.width);

        self.progress = Progress {
            coins_collected: 0,
            lives: self.tuning.max_lives,
        };
        self.phase.reset();
        self.events.clear();
        self.frame = 0;

        self.camera.resize(self.viewport);
        self.camera.snap_to(self.hero.center(), self.world);

        log::info!(
            "Level ready: {} platforms, {} coins, world {}x{}",
            self.platforms.len(),
            self.coins.len(),
            self.world.width,
            self.world.height
        );
    }

    /// AwaitingStart -> Playing
    pub fn start(&mut self) -> bool {
        self.phase.start()
    }

    /// Rebuild the level, restore lives and coins, wait for start
    pub fn restart(&mut self, policy: &LayoutPolicy) -> bool {
        log::info!("Restarting run");
        self.build_level(policy, self.viewport)
    }

    pub fn set_orientation_blocked(&mut self, blocked: bool) {
        if self.phase.set_orientation_blocked(blocked) && blocked {
            self.hero.vel = Vec2::ZERO;
        }
    }

    /// Host surface changed size. World coordinates are never rescaled.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            log::warn!("Ignoring resize to {viewport:?}");
            return false;
        }
        self.viewport = viewport;
        self.world.width = self.world.width.max(viewport.width);
        self.world.height = self.world.height.max(viewport.height);
        self.hero.clamp_x(self.world.width);
        self.camera.resize(viewport);
        self.camera.clamp_to(self.world);
        log::debug!(
            "Resized to {}x{}, world {}x{}",
            viewport.width,
            viewport.height,
            self.world.width,
            self.world.height
        );
        true
    }

    /// Hero bottom beyond this line costs a life
    pub fn fall_threshold(&self) -> f32 {
        self.world.height + self.viewport.height * self.tuning.fall_margin
    }

    /// Platform the next respawn will use
    pub fn respawn_point(&self) -> Option<&Platform> {
        self.hero
            .last_safe_platform
            .and_then(|index| self.platforms.get(index))
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Read-only snapshot for renderers
    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            frame: self.frame,
            phase: self.phase.phase(),
            orientation_blocked: self.phase.orientation_blocked(),
            hero: &self.hero,
            hero_visible: self.hero.blink_visible(self.tuning.blink_interval),
            camera: &self.camera,
            world: self.world,
            progress: self.progress,
            platforms: &self.platforms,
            coins: &self.coins,
            events: &self.events,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub phase: GamePhase,
    pub orientation_blocked: bool,
    pub hero: &'a Hero,
    pub hero_visible: bool,
    pub camera: &'a Camera,
    pub world: World,
    pub progress: Progress,
    pub platforms: &'a [Platform],
    pub coins: &'a [Coin],
    pub events: &'a [GameEvent],
}
