//! Axis-aligned bounding box collision
//!
//! Every sprite has exactly one box: its position (top-left) and the size
//! of its current frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap: boxes that only share an edge do not collide,
    /// and a zero-area box never collides.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0
        {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point test used for mouse clicks (right/bottom edges exclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }
}

/// Keys of every candidate whose box overlaps `target`, in iteration order
pub fn overlapping<K, I>(target: &Aabb, candidates: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, Aabb)>,
{
    candidates
        .into_iter()
        .filter(|(_, bounds)| target.overlaps(bounds))
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&boxed(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&boxed(-5.0, 2.0, 6.0, 2.0)));
        assert!(!a.overlaps(&boxed(20.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&boxed(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&boxed(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_zero_area_never_collides() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&boxed(5.0, 5.0, 0.0, 3.0)));
    }

    #[test]
    fn test_contains() {
        let b = boxed(80.0, 160.0, 250.0, 120.0);
        assert!(b.contains(Vec2::new(80.0, 160.0)));
        assert!(b.contains(Vec2::new(200.0, 200.0)));
        assert!(!b.contains(Vec2::new(330.0, 200.0)));
    }

    #[test]
    fn test_overlapping_keeps_order() {
        let player = boxed(0.0, 0.0, 50.0, 50.0);
        let hits = overlapping(
            &player,
            vec![
                (3u32, boxed(10.0, 10.0, 5.0, 5.0)),
                (7, boxed(100.0, 10.0, 5.0, 5.0)),
                (9, boxed(40.0, 40.0, 20.0, 20.0)),
            ],
        );
        assert_eq!(hits, vec![3, 9]);
    }
}
