//! Axis-aligned bounding box geometry
//!
//! Every entity on the catch playfield is a square, so overlap testing is
//! plain AABB intersection with strict inequalities: rectangles that only
//! share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, `pos` is the top-left corner (screen coords, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of side `side` with its top-left corner at `pos`
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(side),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// True if this rectangle lies fully inside `[0, width] x [0, height]`
    pub fn within(&self, width: f32, height: f32) -> bool {
        self.left() >= 0.0 && self.top() >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

/// Half-open AABB intersection test
///
/// Touching edges are not an overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
        assert!(!overlaps(&a, &corner));
    }

    #[test]
    fn test_containment_counts_as_overlap() {
        let outer = Rect::new(0.0, 0.0, 60.0, 60.0);
        let inner = Rect::new(15.0, 15.0, 30.0, 30.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_within_bounds() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).within(10.0, 10.0));
        assert!(!Rect::new(-0.5, 0.0, 10.0, 10.0).within(20.0, 20.0));
        assert!(!Rect::new(15.0, 0.0, 10.0, 10.0).within(20.0, 20.0));
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_shared_vertical_edge_never_overlaps(a in arb_rect(), w in 0.0f32..200.0) {
            let b = Rect::new(a.right(), a.top(), w, a.size.y);
            prop_assert!(!overlaps(&a, &b));
        }
    }
}
