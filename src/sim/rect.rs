//! Axis-aligned rectangles in screen space (y grows downward)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle spanning `min` (top-left) to `max` (bottom-right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// True when the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Shrink by `inset` on every side, keeping the same center
    pub fn inset(&self, inset: Vec2) -> Self {
        Self {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect,
    /// and a zero-height rectangle never intersects anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let r = Rect::from_center_size(Vec2::new(100.0, 200.0), Vec2::new(50.0, 30.0));
        assert_eq!(r.left(), 75.0);
        assert_eq!(r.right(), 125.0);
        assert_eq!(r.top(), 185.0);
        assert_eq!(r.bottom(), 215.0);
        assert_eq!(r.center(), Vec2::new(100.0, 200.0));
    }

    #[test]
    fn test_inset_keeps_center() {
        let r = Rect::new(0.0, 0.0, 50.0, 35.0);
        let hit = r.inset(Vec2::new(6.0, 5.0));
        assert_eq!(hit.width(), 38.0);
        assert_eq!(hit.height(), 25.0);
        assert_eq!(hit.center(), r.center());
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Sharing an edge is not an overlap
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        // Degenerate rectangle never overlaps
        assert!(!a.intersects(&Rect::new(2.0, 5.0, 4.0, 0.0)));
    }
}
