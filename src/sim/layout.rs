//! Level layout
//!
//! Builds platforms, coins and world bounds for a fresh level, either from a
//! seeded procedural walk or from a fixed terrain strip. A pure function of
//! its inputs: rebuilding with the same policy gives the same level.

use serde::{Deserialize, Serialize};

use super::rng::LayoutRng;
use super::state::{Coin, Platform, PlatformKind, Viewport, World};
use crate::clamp_span;
use crate::tuning::Tuning;

/// First anchor ledge (x, rise above ground, width)
const FIRST_ANCHOR: (f32, f32, f32) = (80.0, 120.0, 320.0);
/// Second anchor ledge (x, width). Height is derived from the first.
const SECOND_ANCHOR: (f32, f32) = (520.0, 280.0);
const SECOND_ANCHOR_STEP: f32 = 100.0;
const SECOND_ANCHOR_RISE: (f32, f32) = (100.0, 220.0);

/// Vertical band (rise above ground) procedural ledges stay in
const LEDGE_BAND: (f32, f32) = (80.0, 240.0);
const GAP_RANGE: (f32, f32) = (120.0, 180.0);
const WIDTH_RANGE: (f32, f32) = (220.0, 340.0);
const MAX_HEIGHT_JITTER: f32 = 80.0;
/// Keep the last ledge this far from the right edge
const RIGHT_MARGIN: f32 = 120.0;

/// Upper bound on tiles from one blueprint
const MAX_TILES: usize = 4096;

/// One collision rectangle of the terrain strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub width: f32,
    /// Top surface height above the ground line
    pub rise: f32,
    pub height: f32,
    /// Empty space after this segment
    pub gap: f32,
    pub skip_coins: bool,
}

impl TerrainSegment {
    pub const fn new(width: f32, rise: f32, height: f32, gap: f32, skip_coins: bool) -> Self {
        Self {
            width,
            rise,
            height,
            gap,
            skip_coins,
        }
    }

    /// Collision segments of the forest terrain strip, left to right
    pub fn default_strip() -> Vec<TerrainSegment> {
        vec![
            TerrainSegment::new(420.0, 0.0, 40.0, 0.0, true),
            TerrainSegment::new(180.0, 60.0, 24.0, 130.0, false),
            TerrainSegment::new(260.0, 140.0, 24.0, 150.0, false),
            TerrainSegment::new(300.0, 40.0, 40.0, 0.0, true),
            TerrainSegment::new(200.0, 120.0, 24.0, 160.0, false),
            TerrainSegment::new(340.0, 0.0, 40.0, 120.0, false),
        ]
    }
}

/// How to lay out a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutPolicy {
    /// Seeded random walk of ledges
    Procedural { seed: u32 },
    /// Fixed strip, tiled to the world width
    Blueprint(Vec<TerrainSegment>),
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        LayoutPolicy::Procedural {
            seed: crate::consts::WORLD_SEED,
        }
    }
}

/// A freshly built level
#[derive(Debug, Clone)]
pub struct Level {
    pub world: World,
    /// Placement order, left to right
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    /// Index of the spawn anchor in `platforms`
    pub spawn: usize,
}

/// Build a level for `viewport`
pub fn build_level(policy: &LayoutPolicy, viewport: Viewport, tuning: &Tuning) -> Level {
    let viewport = if viewport.is_valid() {
        viewport
    } else {
        log::warn!("Laying out for invalid viewport {viewport:?}; using 1x1");
        Viewport::new(1.0, 1.0)
    };

    let world = World {
        width: viewport.width * tuning.layout.world_screens,
        height: viewport.height,
    };
    let ground_y = ground_line(world, tuning);

    let platforms = match policy {
        LayoutPolicy::Procedural { seed } => procedural(*seed, world, ground_y, tuning),
        LayoutPolicy::Blueprint(segments) => blueprint(segments, world, ground_y, tuning),
    };
    let platforms = if platforms.is_empty() {
        log::warn!(
            "No platforms fit a {}x{} world; adding a ground slab",
            world.width,
            world.height
        );
        vec![Platform::new(
            0.0,
            ground_y,
            world.width,
            tuning.layout.platform_thickness,
            PlatformKind::Ground,
        )]
    } else {
        platforms
    };

    let coins = platforms
        .iter()
        .filter(|p| p.kind.carries_coin())
        .map(|p| Coin::above(p, tuning.layout.coin_size, tuning.layout.coin_padding))
        .collect::<Vec<_>>();

    log::info!(
        "Built {} layout: {} platforms, {} coins",
        policy_name(policy),
        platforms.len(),
        coins.len()
    );

    Level {
        world,
        platforms,
        coins,
        spawn: 0,
    }
}

fn policy_name(policy: &LayoutPolicy) -> &'static str {
    match policy {
        LayoutPolicy::Procedural { .. } => "procedural",
        LayoutPolicy::Blueprint(_) => "blueprint",
    }
}

/// Y of the ground line. Never above mid-world, even for tiny viewports.
pub fn ground_line(world: World, tuning: &Tuning) -> f32 {
    (world.height - tuning.layout.floor_offset).max(world.height * 0.5)
}

fn procedural(seed: u32, world: World, ground_y: f32, tuning: &Tuning) -> Vec<Platform> {
    let thickness = tuning.layout.platform_thickness;
    let ledge = PlatformKind::Ledge { skip_coins: false };

    // Both anchors and the whole ledge band must fit
    if world.width < SECOND_ANCHOR.0 + SECOND_ANCHOR.1 || ground_y - LEDGE_BAND.1 < 0.0 {
        return Vec::new();
    }

    let reach = tuning.reach();
    let mut rng = LayoutRng::new(seed);
    let mut platforms = Vec::with_capacity(2 + tuning.layout.max_extra_platforms as usize);

    let (first_x, first_rise, first_width) = FIRST_ANCHOR;
    let first_y = ground_y - first_rise;
    platforms.push(Platform::new(first_x, first_y, first_width, thickness, ledge));

    let second_y = clamp_span(
        first_y - SECOND_ANCHOR_STEP,
        ground_y - SECOND_ANCHOR_RISE.1,
        ground_y - SECOND_ANCHOR_RISE.0,
    );
    platforms.push(Platform::new(
        SECOND_ANCHOR.0,
        second_y,
        SECOND_ANCHOR.1,
        thickness,
        ledge,
    ));

    let band_top = ground_y - LEDGE_BAND.1;
    let band_bottom = ground_y - LEDGE_BAND.0;

    for _ in 0..tuning.layout.max_extra_platforms {
        let Some(last) = platforms.last().copied() else {
            break;
        };

        let gap = rng.range(GAP_RANGE.0, GAP_RANGE.1).min(reach.max_gap);
        let width = rng.range(WIDTH_RANGE.0, WIDTH_RANGE.1);
        let jitter = rng.centered(MAX_HEIGHT_JITTER);

        let x = last.right() + gap;
        if x + width > world.width - RIGHT_MARGIN {
            break;
        }

        let y = clamp_span(last.y + jitter, band_top, band_bottom);
        let y = clamp_span(y, last.y - reach.max_step_up, last.y + reach.max_step_up);
        platforms.push(Platform::new(x, y, width, thickness, ledge));
    }

    platforms
}

fn blueprint(
    segments: &[TerrainSegment],
    world: World,
    ground_y: f32,
    tuning: &Tuning,
) -> Vec<Platform> {
    let usable: Vec<&TerrainSegment> = segments
        .iter()
        .filter(|s| {
            s.width.is_finite()
                && s.width > 0.0
                && s.height.is_finite()
                && s.height > 0.0
                && s.rise.is_finite()
                && s.gap.is_finite()
                && s.gap >= 0.0
        })
        .collect();
    if usable.len() != segments.len() {
        log::warn!(
            "Dropped {} malformed terrain segments",
            segments.len() - usable.len()
        );
    }
    if usable.is_empty() {
        return Vec::new();
    }

    let reach = tuning.reach();
    for pair in usable.windows(2) {
        let step = (pair[1].rise - pair[0].rise).abs();
        if pair[0].gap > reach.max_gap || step > reach.max_step_up {
            log::warn!(
                "Terrain step gap={} rise={} exceeds jump reach",
                pair[0].gap,
                step
            );
        }
    }

    let mut platforms = Vec::new();
    let mut cursor = 0.0f32;
    for segment in usable.iter().cycle().take(MAX_TILES) {
        let remaining = world.width - cursor;
        if remaining < 1.0 {
            break;
        }
        let width = segment.width.min(remaining);
        platforms.push(Platform::new(
            cursor,
            ground_y - segment.rise,
            width,
            segment.height,
            PlatformKind::Terrain {
                skip_coins: segment.skip_coins,
            },
        ));
        cursor += segment.width + segment.gap;
    }

    platforms
}
