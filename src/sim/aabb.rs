//! Axis-aligned rectangle geometry
//!
//! Every arena here is a rectangular playfield: actors, platforms, checkpoint
//! regions and boost pads are all axis-aligned boxes. An `Aabb` is stored as
//! min/max corners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from a center point and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point lies inside (inclusive on all edges)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Check if two boxes overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Minimal translation that separates `self` from `other`, if overlapping.
    ///
    /// The returned vector moves `self` out of `other` along the axis of least
    /// penetration.
    pub fn resolution(&self, other: &Aabb) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }

        let push_right = other.max.x - self.min.x;
        let push_left = self.max.x - other.min.x;
        let push_down = other.max.y - self.min.y;
        let push_up = self.max.y - other.min.y;

        let dx = if push_right < push_left {
            push_right
        } else {
            -push_left
        };
        let dy = if push_down < push_up { push_down } else { -push_up };

        if dx.abs() < dy.abs() {
            Some(Vec2::new(dx, 0.0))
        } else {
            Some(Vec2::new(0.0, dy))
        }
    }
}
