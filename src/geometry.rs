//! Integer layout boxes and the resize-edge mask.

use bitflags::bitflags;

/// A box in layout coordinates. Position may be negative; a box with a
/// non-positive dimension is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Half-open containment test for a layout point.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_empty()
            && x >= self.x as f64
            && x < self.right() as f64
            && y >= self.y as f64
            && y < self.bottom() as f64
    }

    /// Squared distance from a point to the closest point of the box.
    pub fn distance_squared(&self, x: f64, y: f64) -> f64 {
        let (cx, cy) = self.closest_point(x, y);
        (cx - x).powi(2) + (cy - y).powi(2)
    }

    /// Clamp a point into the box, keeping it strictly inside the right and
    /// bottom edges.
    pub fn closest_point(&self, x: f64, y: f64) -> (f64, f64) {
        if self.is_empty() {
            return (self.x as f64, self.y as f64);
        }
        let max_x = self.right() as f64 - 1.0 / 256.0;
        let max_y = self.bottom() as f64 - 1.0 / 256.0;
        (x.clamp(self.x as f64, max_x), y.clamp(self.y as f64, max_y))
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

bitflags! {
    /// Edges grabbed by an interactive resize, or the edges a border part
    /// of the decoration resizes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResizeEdges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

impl ResizeEdges {
    /// True for the empty mask, a single edge, or two adjacent edges.
    pub fn is_valid(self) -> bool {
        !(self.contains(Self::TOP | Self::BOTTOM) || self.contains(Self::LEFT | Self::RIGHT))
    }
}

/// Position a box of `natural_size` along one axis so the cursor keeps the
/// same relative offset into it that it had into the current box.
///
/// The result never lies before `current_pos`, so a shrinking window cannot
/// appear to jump backwards past its current edge.
pub fn anchor_to_cursor(cursor: f64, current_pos: i32, current_size: i32, natural_size: i32) -> i32 {
    if current_size <= 0 {
        return current_pos;
    }
    let anchor_frac = (cursor - current_pos as f64) / current_size as f64;
    let pos_new = (cursor - natural_size as f64 * anchor_frac) as i32;
    pos_new.max(current_pos)
}

/// Apply [`anchor_to_cursor`] on both axes, moving `natural` (whose size is
/// already set) under the cursor relative to `current`.
pub fn anchor_box_to_cursor(natural: &mut Rect, current: &Rect, cursor_x: f64, cursor_y: f64) {
    if natural.is_empty() {
        return;
    }
    natural.x = anchor_to_cursor(cursor_x, current.x, current.width, natural.width);
    natural.y = anchor_to_cursor(cursor_y, current.y, current.height, natural.height);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_keeps_relative_offset() {
        // Cursor at 75% of a 400px box; natural width 200 keeps the cursor at 75%.
        assert_eq!(anchor_to_cursor(300.0, 0, 400, 200), 150);
    }

    #[test]
    fn anchor_clamps_backward_motion() {
        // A wider natural box would start left of the current edge.
        assert_eq!(anchor_to_cursor(300.0, 100, 400, 800), 100);
    }

    #[test]
    fn anchor_with_zero_width_is_stable() {
        assert_eq!(anchor_to_cursor(42.0, 7, 0, 100), 7);
    }

    #[test]
    fn anchor_box_skips_empty_natural() {
        let current = Rect::new(0, 0, 1000, 800);
        let mut natural = Rect::new(5, 5, 0, 0);
        anchor_box_to_cursor(&mut natural, &current, 500.0, 10.0);
        assert_eq!(natural, Rect::new(5, 5, 0, 0));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(14.9, 14.9));
        assert!(!r.contains(15.0, 12.0));
        assert!(!Rect::new(0, 0, 0, 10).contains(0.0, 0.0));
    }

    #[test]
    fn opposite_edges_are_invalid() {
        assert!(ResizeEdges::empty().is_valid());
        assert!((ResizeEdges::TOP | ResizeEdges::LEFT).is_valid());
        assert!(!(ResizeEdges::TOP | ResizeEdges::BOTTOM).is_valid());
        assert!(!(ResizeEdges::LEFT | ResizeEdges::RIGHT).is_valid());
    }
}
