//! Dead-zone follow camera
//!
//! The camera holds still while the hero's centre stays inside a box inset
//! by `margin_x`/`margin_y` of the viewport, then pans just far enough to put
//! the centre back on the box edge. No easing on position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Viewport, World};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Dead-zone inset, fraction of viewport width
    pub margin_x: f32,
    /// Dead-zone inset, fraction of viewport height
    pub margin_y: f32,
}

/// Pan one axis so `center` sits inside `[pos + margin, pos + span - margin]`
fn follow_axis(pos: f32, center: f32, span: f32, margin: f32) -> f32 {
    let low = pos + margin;
    let high = pos + span - margin;
    if center < low {
        center - margin
    } else if center > high {
        center + margin - span
    } else {
        pos
    }
}

/// Clamp into `[0, world - view]`, or 0 if the world fits in the view
fn clamp_axis(pos: f32, world: f32, view: f32) -> f32 {
    if world <= view {
        0.0
    } else {
        crate::clamp_span(pos, 0.0, world - view)
    }
}

impl Camera {
    pub fn new(viewport: Viewport, tuning: &Tuning) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: viewport.width,
            height: viewport.height,
            margin_x: tuning.camera_margin_x,
            margin_y: tuning.camera_margin_y,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
    }

    /// Track `center` through the dead zone, then clamp to the world
    pub fn follow(&mut self, center: Vec2, world: World) {
        let margin_x = self.width * self.margin_x;
        let margin_y = self.height * self.margin_y;
        self.x = follow_axis(self.x, center.x, self.width, margin_x);
        self.y = follow_axis(self.y, center.y, self.height, margin_y);
        self.clamp_to(world);
    }

    /// Centre on `center` (level start), then clamp
    pub fn snap_to(&mut self, center: Vec2, world: World) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
        self.clamp_to(world);
    }

    pub fn clamp_to(&mut self, world: World) {
        self.x = clamp_axis(self.x, world.width, self.width);
        self.y = clamp_axis(self.y, world.height, self.height);
    }
}
