//! Axis-aligned rectangle geometry
//!
//! The only shape the core reasons about directly. Narrow-phase detection
//! against arbitrary shapes belongs to the external physics engine; by the
//! time a contact reaches dispatch, both fixtures are represented by their
//! axis-aligned bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (center + half extents)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Square rect from a full side length
    pub fn square(center: Vec2, size: f32) -> Self {
        Self {
            center,
            half: Vec2::splat(size / 2.0),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn width(&self) -> f32 {
        self.half.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half.y * 2.0
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Overlap depth along each axis; both components positive iff the rects
    /// overlap.
    pub fn overlap_depth(&self, other: &Rect) -> Vec2 {
        self.half + other.half - (self.center - other.center).abs()
    }

    /// Distance between centers
    pub fn center_delta(&self, other: &Rect) -> Vec2 {
        self.center - other.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_detection() {
        let a = Rect::square(Vec2::ZERO, 2.0);
        let b = Rect::square(Vec2::new(1.5, 0.0), 2.0);
        let c = Rect::square(Vec2::new(3.0, 0.0), 2.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_overlap_depth() {
        let a = Rect::square(Vec2::ZERO, 2.0);
        let b = Rect::square(Vec2::new(1.5, 0.5), 2.0);
        let depth = a.overlap_depth(&b);
        assert!((depth.x - 0.5).abs() < 1e-6);
        assert!((depth.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(2.0, 2.0)));
        assert!(!r.contains(Vec2::new(2.1, 1.0)));
    }
}
