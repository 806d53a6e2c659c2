//! Collision detection and response against static platforms
//!
//! Platforms are only solid from above (landing) and below (ceiling). Landing
//! uses a swept test on the hero's bottom edge: the previous bottom must be at
//! or above the platform top and the tentative bottom at or below it, so a
//! fast fall cannot skip a thin platform inside one frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Coin, Hero, Platform};

/// Float slack when comparing the previous bottom against a platform top.
/// A hero snapped onto a platform last frame must still count as above it.
pub const LANDING_TOLERANCE: f32 = 0.01;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

impl From<&Hero> for Rect {
    fn from(hero: &Hero) -> Self {
        Rect::new(hero.pos.x, hero.pos.y, hero.width, hero.height)
    }
}

impl From<&Coin> for Rect {
    fn from(coin: &Coin) -> Self {
        Rect::new(coin.x, coin.y, coin.size, coin.size)
    }
}

impl From<&Platform> for Rect {
    fn from(platform: &Platform) -> Self {
        Rect::new(platform.x, platform.y, platform.width, platform.height)
    }
}

/// Outcome of moving the hero against the platform list for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepResult {
    /// Corrected tentative top-left
    pub next: Vec2,
    /// Corrected vertical velocity
    pub vy: f32,
    /// First platform landed on, by index
    pub landed_on: Option<usize>,
    /// Head hit an underside
    pub bonked: bool,
}

/// True if `[x, x + width)` overlaps the platform horizontally
#[inline]
pub fn overlaps_horizontally(x: f32, width: f32, platform: &Platform) -> bool {
    x < platform.right() && x + width > platform.x
}

/// Resolve the move `pos -> next` for a body of `size` against `platforms`.
///
/// Platforms are visited in order. The first landing wins; once the hero has
/// landed, no later platform may push it back down through its ceiling branch.
pub fn sweep_platforms(
    pos: Vec2,
    next: Vec2,
    vy: f32,
    size: Vec2,
    platforms: &[Platform],
) -> SweepResult {
    let mut result = SweepResult {
        next,
        vy,
        landed_on: None,
        bonked: false,
    };
    let prev_bottom = pos.y + size.y;

    for (index, platform) in platforms.iter().enumerate() {
        if !overlaps_horizontally(result.next.x, size.x, platform) {
            continue;
        }

        if result.landed_on.is_none() {
            let next_bottom = result.next.y + size.y;
            if prev_bottom <= platform.y + LANDING_TOLERANCE && next_bottom >= platform.y {
                result.next.y = platform.y - size.y;
                result.vy = 0.0;
                result.landed_on = Some(index);
                continue;
            }

            let underside = platform.bottom();
            if pos.y >= underside && result.next.y <= underside {
                result.next.y = underside;
                result.vy = result.vy.max(0.0);
                result.bonked = true;
            }
        }
    }

    result
}

/// Indices of uncollected coins touching `body`
pub fn touching_coins<'a>(body: &'a Rect, coins: &'a [Coin]) -> impl Iterator<Item = usize> + 'a {
    coins
        .iter()
        .enumerate()
        .filter(move |(_, coin)| !coin.collected && body.intersects(&Rect::from(*coin)))
        .map(|(index, _)| index)
}
