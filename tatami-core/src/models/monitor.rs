//! One output monitor: its geometry, tag-sets, layout memory and client
//! lists.
use super::{ClientId, Rect};
use x11_dl::xlib;

#[derive(Debug, Clone)]
pub struct Monitor {
    pub num: i32,
    /// Full screen area of the output.
    pub screen: Rect,
    /// Screen area minus the bar strip.
    pub work: Rect,
    pub bar_window: xlib::Window,
    pub bar_y: i32,
    pub show_bar: bool,
    pub top_bar: bool,
    pub gap_px: i32,
    pub mfact: f32,
    pub masters_count: u32,
    /// Two tag-set slots so the previous view can be restored with a single
    /// XOR on the selector.
    pub tagset: [u32; 2],
    pub selected_tags: usize,
    /// Per-tag layout memory: which configured layout each tag slot uses.
    pub layout_per_tag: Vec<usize>,
    /// The tag slot whose layout is currently live.
    pub current_layout_slot: usize,
    pub layout_symbol: String,
    /// Insertion order; the head is the master position.
    pub clients: Vec<ClientId>,
    /// Most-recently-focused first.
    pub stack: Vec<ClientId>,
    pub selected: Option<ClientId>,
}

impl Monitor {
    #[must_use]
    pub fn new(
        num: i32,
        tag_count: usize,
        mfact: f32,
        masters_count: u32,
        show_bar: bool,
        top_bar: bool,
        gap_px: i32,
    ) -> Self {
        Self {
            num,
            screen: Rect::default(),
            work: Rect::default(),
            bar_window: 0,
            bar_y: 0,
            show_bar,
            top_bar,
            gap_px,
            mfact,
            masters_count,
            tagset: [1, 1],
            selected_tags: 0,
            layout_per_tag: vec![0; tag_count],
            current_layout_slot: 0,
            layout_symbol: String::new(),
            clients: Vec::new(),
            stack: Vec::new(),
            selected: None,
        }
    }

    /// The tag-set currently visible on this monitor.
    #[must_use]
    pub const fn current_tags(&self) -> u32 {
        self.tagset[self.selected_tags]
    }

    pub fn set_tags(&mut self, tags: u32) {
        self.tagset[self.selected_tags] = tags;
    }

    /// Flips to the other tag-set slot, restoring the previous view.
    pub fn swap_selected_tags(&mut self) {
        self.selected_tags ^= 1;
    }

    /// Index into the configured layout list for the live tag slot.
    #[must_use]
    pub fn current_layout_index(&self) -> usize {
        self.layout_per_tag[self.current_layout_slot]
    }

    pub fn set_layout(&mut self, layout_index: usize) {
        self.layout_per_tag[self.current_layout_slot] = layout_index;
    }

    /// Recomputes the work area and the bar strip position. A hidden bar
    /// parks at `-bar_height` so it never intersects the screen.
    pub fn update_bar_position(&mut self, bar_height: i32) {
        self.work.y = self.screen.y;
        self.work.h = self.screen.h;
        if self.show_bar {
            self.work.h -= bar_height;
            if self.top_bar {
                self.bar_y = self.work.y;
                self.work.y += bar_height;
            } else {
                self.bar_y = self.work.y + self.work.h;
            }
        } else {
            self.bar_y = -bar_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> Monitor {
        let mut m = Monitor::new(0, 9, 0.55, 1, true, true, 0);
        m.screen = Rect::new(0, 0, 1920, 1080);
        m.work = m.screen;
        m
    }

    #[test]
    fn swapping_tag_slots_twice_restores_the_view() {
        let mut m = monitor();
        m.set_tags(1 << 3);
        let before = m.current_tags();
        m.swap_selected_tags();
        m.set_tags(1 << 5);
        m.swap_selected_tags();
        assert_eq!(m.current_tags(), before, "slot swap must be involutive");
    }

    #[test]
    fn top_bar_pushes_the_work_area_down() {
        let mut m = monitor();
        m.update_bar_position(20);
        assert_eq!(m.bar_y, 0);
        assert_eq!(m.work.y, 20);
        assert_eq!(m.work.h, 1060);
    }

    #[test]
    fn bottom_bar_keeps_the_work_area_at_the_top() {
        let mut m = monitor();
        m.top_bar = false;
        m.update_bar_position(20);
        assert_eq!(m.work.y, 0);
        assert_eq!(m.work.h, 1060);
        assert_eq!(m.bar_y, 1060);
    }

    #[test]
    fn hidden_bar_gives_the_whole_screen_back() {
        let mut m = monitor();
        m.show_bar = false;
        m.update_bar_position(20);
        assert_eq!(m.work, m.screen);
        assert_eq!(m.bar_y, -20, "a hidden bar parks off screen");
    }

    #[test]
    fn per_tag_layout_memory_follows_the_live_slot() {
        let mut m = monitor();
        m.set_layout(1);
        assert_eq!(m.current_layout_index(), 1);
        m.current_layout_slot = 4;
        assert_eq!(m.current_layout_index(), 0, "other tags keep their layout");
        m.set_layout(2);
        m.current_layout_slot = 0;
        assert_eq!(m.current_layout_index(), 1);
    }
}
