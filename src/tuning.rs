//! Data-driven game balance
//!
//! Physics, hero geometry, grace windows and layout knobs. Loaded from JSON
//! by the host (or left at defaults) and validated before it reaches the
//! simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a tuning document was refused
#[derive(Debug, Error)]
pub enum TuningError {
    /// Not valid JSON, or fields of the wrong type
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed, but a value is out of range
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Level layout knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    /// Seed for procedural levels
    pub seed: u32,
    /// World width in viewport widths
    pub world_screens: f32,
    /// Distance from the bottom of the world to the ground line
    pub floor_offset: f32,
    pub platform_thickness: f32,
    /// Platforms placed after the two fixed anchors
    pub max_extra_platforms: u32,
    pub coin_size: f32,
    /// Gap between a coin and the platform top under it
    pub coin_padding: f32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            seed: WORLD_SEED,
            world_screens: WORLD_SCREENS,
            floor_offset: FLOOR_OFFSET,
            platform_thickness: PLATFORM_THICKNESS,
            max_extra_platforms: MAX_EXTRA_PLATFORMS,
            coin_size: COIN_SIZE,
            coin_padding: COIN_PADDING,
        }
    }
}

/// Everything the simulation reads as a constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    pub speed: f32,
    pub crouch_speed: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_velocity: f32,
    pub gravity: f32,
    pub max_jumps: u8,

    // === Hero body ===
    pub stand_height: f32,
    pub crouch_height: f32,
    /// Collision width as a fraction of height
    pub hero_aspect: f32,
    pub start_x: f32,

    // === Lives and grace ===
    pub max_lives: u8,
    pub respawn_control_lock: f32,
    pub respawn_invulnerability: f32,
    pub blink_interval: f32,
    /// Fall line below the world, in viewport heights
    pub fall_margin: f32,

    // === Camera ===
    pub camera_margin_x: f32,
    pub camera_margin_y: f32,

    // === Animation ===
    pub anim_frame_duration: f32,
    pub anim_frame_count: u32,

    // === Clock ===
    pub max_frame_dt: f32,

    pub layout: LayoutTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: HERO_SPEED,
            crouch_speed: HERO_CROUCH_SPEED,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            max_jumps: MAX_JUMPS,

            stand_height: STAND_HEIGHT,
            crouch_height: CROUCH_HEIGHT,
            hero_aspect: HERO_ASPECT,
            start_x: HERO_START_X,

            max_lives: MAX_LIVES,
            respawn_control_lock: RESPAWN_CONTROL_LOCK,
            respawn_invulnerability: RESPAWN_INVULNERABILITY,
            blink_interval: BLINK_INTERVAL,
            fall_margin: FALL_MARGIN,

            camera_margin_x: CAMERA_MARGIN_X,
            camera_margin_y: CAMERA_MARGIN_Y,

            anim_frame_duration: ANIM_FRAME_DURATION,
            anim_frame_count: ANIM_FRAME_COUNT,

            max_frame_dt: MAX_FRAME_DT,

            layout: LayoutTuning::default(),
        }
    }
}

/// How far the hero can get between two platforms with its full jump budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reach {
    /// Apex height of one jump from rest
    pub single_jump_height: f32,
    /// Airtime of one jump, launch to landing at the same height
    pub hang_time: f32,
    /// Largest vertical step the layout may place
    pub max_step_up: f32,
    /// Largest horizontal gap the layout may place
    pub max_gap: f32,
}

impl Tuning {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse, or fall back to defaults with a warning
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    /// Keep `self` if it validates, otherwise warn and use the defaults
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be finite and greater than zero",
                })
            }
        }

        fn fraction(field: &'static str, value: f32) -> Result<(), TuningError> {
            if (0.0..0.5).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be in [0, 0.5)",
                })
            }
        }

        positive("speed", self.speed)?;
        positive("crouch_speed", self.crouch_speed)?;
        positive("gravity", self.gravity)?;
        if !(self.jump_velocity.is_finite() && self.jump_velocity < 0.0) {
            return Err(TuningError::Invalid {
                field: "jump_velocity",
                reason: "must be finite and negative (upward)",
            });
        }
        if self.max_jumps == 0 {
            return Err(TuningError::Invalid {
                field: "max_jumps",
                reason: "must allow at least one jump",
            });
        }

        positive("stand_height", self.stand_height)?;
        positive("crouch_height", self.crouch_height)?;
        if self.crouch_height > self.stand_height {
            return Err(TuningError::Invalid {
                field: "crouch_height",
                reason: "must not exceed stand_height",
            });
        }
        positive("hero_aspect", self.hero_aspect)?;

        if self.max_lives == 0 {
            return Err(TuningError::Invalid {
                field: "max_lives",
                reason: "must be at least one",
            });
        }
        positive("respawn_control_lock", self.respawn_control_lock)?;
        positive("respawn_invulnerability", self.respawn_invulnerability)?;
        positive("blink_interval", self.blink_interval)?;
        positive("fall_margin", self.fall_margin)?;

        fraction("camera_margin_x", self.camera_margin_x)?;
        fraction("camera_margin_y", self.camera_margin_y)?;

        positive("anim_frame_duration", self.anim_frame_duration)?;
        if self.anim_frame_count == 0 {
            return Err(TuningError::Invalid {
                field: "anim_frame_count",
                reason: "must be at least one",
            });
        }
        positive("max_frame_dt", self.max_frame_dt)?;

        positive("layout.world_screens", self.layout.world_screens)?;
        positive("layout.platform_thickness", self.layout.platform_thickness)?;
        positive("layout.coin_size", self.layout.coin_size)?;
        if !(self.layout.floor_offset.is_finite() && self.layout.floor_offset >= 0.0) {
            return Err(TuningError::Invalid {
                field: "layout.floor_offset",
                reason: "must be finite and non-negative",
            });
        }
        if !(self.layout.coin_padding.is_finite() && self.layout.coin_padding >= 0.0) {
            return Err(TuningError::Invalid {
                field: "layout.coin_padding",
                reason: "must be finite and non-negative",
            });
        }

        Ok(())
    }

    /// Traversal limits derived from the jump physics
    pub fn reach(&self) -> Reach {
        let v = self.jump_velocity.abs();
        let single_jump_height = v * v / (2.0 * self.gravity);
        let hang_time = 2.0 * v / self.gravity;
        let jumps = self.max_jumps as f32;
        Reach {
            single_jump_height,
            hang_time,
            max_step_up: 0.85 * single_jump_height * jumps,
            max_gap: 0.8 * self.speed * jumps * hang_time,
        }
    }

    /// Collision width for a given body height
    #[inline]
    pub fn width_for_height(&self, height: f32) -> f32 {
        height * self.hero_aspect
    }
}
