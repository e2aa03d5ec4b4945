//! Axis-aligned rectangle overlap
//!
//! Every hittable thing in the game is an axis-aligned rect, so this is the
//! whole collision story. Strict inequalities on all four sides: rectangles
//! that merely share an edge do not count as touching.

use glam::Vec2;

/// True when the two rects overlap with positive area on both axes.
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_hit() {
        // Overlap by 1 unit on both axes
        assert!(rects_overlap(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn edge_touch_is_not_a_hit() {
        // Right edge of a meets left edge of b exactly
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
        // Corner touch only
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 10.0),
        ));
    }

    #[test]
    fn disjoint_rects_miss() {
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 10.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(40.0, 30.0),
        ));
    }

    #[test]
    fn containment_is_a_hit() {
        assert!(rects_overlap(
            Vec2::new(5.0, 5.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(20.0, 20.0),
        ));
    }
}
