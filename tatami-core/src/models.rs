mod client;
mod monitor;

pub use client::{apply_size_hints, Client, ClientArena, ClientId, SizeHints};
pub use monitor::Monitor;

/// A screen-space rectangle. X geometry is signed because monitors may sit
/// at negative offsets in the virtual screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Area of the intersection between this rect and another, 0 when they
    /// do not overlap. Drives the "monitor under this rectangle" lookup.
    #[must_use]
    pub fn intersect_area(&self, other: &Rect) -> i32 {
        let horizontal =
            0.max((self.x + self.w).min(other.x + other.w) - self.x.max(other.x));
        let vertical =
            0.max((self.y + self.h).min(other.y + other.h) - self.y.max(other.y));
        horizontal * vertical
    }

    #[must_use]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_area_of_disjoint_rects_is_zero() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(200, 200, 50, 50);
        assert_eq!(a.intersect_area(&b), 0, "disjoint rects must not overlap");
    }

    #[test]
    fn intersect_area_of_nested_rect_is_its_own_area() {
        let outer = Rect::new(0, 0, 1920, 1080);
        let inner = Rect::new(10, 10, 100, 50);
        assert_eq!(outer.intersect_area(&inner), 100 * 50);
    }

    #[test]
    fn intersect_area_of_partial_overlap() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersect_area(&b), 50 * 50);
    }
}
