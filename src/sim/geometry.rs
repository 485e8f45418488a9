//! Geometry helpers for the hit test and motion model

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned screen rectangle, as reported by a viewport query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square box of the given side length centered on a point
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Euclidean distance between two box centers
#[inline]
pub fn center_distance(a: &BoundingBox, b: &BoundingBox) -> f32 {
    a.center().distance(b.center())
}

/// Whether two circles overlap (strictly; touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Normalize a heading, keeping `fallback` when the vector is degenerate
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}
