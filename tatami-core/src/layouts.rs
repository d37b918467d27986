//! The layout engine: pure functions from a work area and the visible
//! tiled clients to target geometries. Nothing in here talks to X; the
//! manager applies the returned rects through `resize`.
use crate::models::Rect;
use serde::{Deserialize, Serialize};

mod monocle;
mod tile;

pub const LAYOUTS: [LayoutKind; 3] = [LayoutKind::Tile, LayoutKind::Monocle, LayoutKind::Floating];

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Tile,
    Monocle,
    Floating,
}

impl LayoutKind {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Tile => "[]=",
            Self::Monocle => "[M]",
            Self::Floating => "><>",
        }
    }

    /// Whether this layout imposes geometries at all. The floating layout
    /// leaves every client where it is.
    #[must_use]
    pub const fn arranges(self) -> bool {
        !matches!(self, Self::Floating)
    }

    /// Computes the target rects for the visible tiled clients, given each
    /// client's border width in layout order. `None` means the layout does
    /// not arrange.
    #[must_use]
    pub fn update(
        self,
        work_area: Rect,
        gap_px: i32,
        mfact: f32,
        masters_count: u32,
        border_widths: &[i32],
    ) -> Option<Vec<Rect>> {
        match self {
            Self::Tile => Some(tile::update(
                work_area,
                gap_px,
                mfact,
                masters_count,
                border_widths,
            )),
            Self::Monocle => Some(monocle::update(work_area, border_widths)),
            Self::Floating => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK: Rect = Rect::new(0, 20, 1920, 1060);

    fn overlap(a: &Rect, b: &Rect, border: i32) -> bool {
        let expand = |r: &Rect| Rect::new(r.x, r.y, r.w + 2 * border, r.h + 2 * border);
        expand(a).intersect_area(&expand(b)) > 0
    }

    #[test]
    fn single_client_fills_the_work_area() {
        let rects = LayoutKind::Tile.update(WORK, 0, 0.55, 1, &[1]).unwrap();
        assert_eq!(rects, vec![Rect::new(0, 20, 1918, 1058)]);
    }

    #[test]
    fn two_clients_split_at_the_master_factor() {
        let rects = LayoutKind::Tile.update(WORK, 0, 0.55, 1, &[1, 1]).unwrap();
        let master = rects[0];
        let stacked = rects[1];
        assert_eq!(master.x, 0);
        assert_eq!(master.w + 2, (1920.0 * 0.55) as i32, "master column is ww*mfact wide");
        assert_eq!(stacked.x, (1920.0 * 0.55) as i32);
        assert_eq!(stacked.h, 1058, "lone stack client takes the full column height");
        assert!(!overlap(&master, &stacked, 1), "tiled clients must not overlap");
    }

    #[test]
    fn extra_clients_share_the_stack_column_evenly() {
        let rects = LayoutKind::Tile.update(WORK, 0, 0.55, 1, &[1, 1, 1]).unwrap();
        let heights: Vec<i32> = rects[1..].iter().map(|r| r.h).collect();
        assert_eq!(heights.len(), 2);
        assert!(
            (heights[0] - heights[1]).abs() <= 2,
            "stack heights should differ by rounding only, got {heights:?}"
        );
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!overlap(a, b, 1), "tiled clients must not overlap");
            }
        }
    }

    #[test]
    fn gaps_surround_every_tile() {
        let gap = 10;
        let rects = LayoutKind::Tile.update(WORK, gap, 0.55, 1, &[1, 1]).unwrap();
        let master = rects[0];
        let stacked = rects[1];
        assert_eq!(master.x, WORK.x + gap);
        assert_eq!(master.y, WORK.y + gap);
        assert_eq!(stacked.y, WORK.y + gap);
        assert_eq!(
            stacked.x,
            master.x + master.w + 2 + gap,
            "uniform gap between the columns"
        );
        assert_eq!(stacked.x + stacked.w + 2 + gap, WORK.x + WORK.w);
    }

    #[test]
    fn zero_masters_sends_everyone_to_the_stack() {
        let rects = LayoutKind::Tile.update(WORK, 0, 0.55, 0, &[1, 1]).unwrap();
        assert!(rects.iter().all(|r| r.x == 0), "master column width must be 0");
        assert!(!overlap(&rects[0], &rects[1], 1));
    }

    #[test]
    fn more_masters_than_clients_uses_one_column() {
        let rects = LayoutKind::Tile.update(WORK, 0, 0.55, 3, &[1, 1]).unwrap();
        assert!(rects.iter().all(|r| r.x == 0));
        assert_eq!(rects[0].h + rects[1].h + 4, WORK.h, "masters split the full height");
    }

    #[test]
    fn layouts_do_nothing_without_clients() {
        assert_eq!(LayoutKind::Tile.update(WORK, 0, 0.55, 1, &[]), Some(vec![]));
        assert_eq!(LayoutKind::Monocle.update(WORK, 0, 0.55, 1, &[]), Some(vec![]));
    }

    #[test]
    fn monocle_stacks_everyone_on_the_full_work_area() {
        let rects = LayoutKind::Monocle.update(WORK, 0, 0.55, 1, &[1, 2]).unwrap();
        assert_eq!(rects[0], Rect::new(0, 20, 1918, 1058));
        assert_eq!(rects[1], Rect::new(0, 20, 1916, 1056), "each minus its own border");
    }

    #[test]
    fn floating_layout_never_arranges() {
        assert_eq!(LayoutKind::Floating.update(WORK, 0, 0.55, 1, &[1]), None);
        assert!(!LayoutKind::Floating.arranges());
    }
}
