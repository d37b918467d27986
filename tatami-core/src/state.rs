//! The window manager model: every managed client, every monitor, and the
//! pure operations over them. Nothing in this module talks to X, which is
//! what keeps the core testable without a display.
use crate::config::Config;
use crate::models::{ClientArena, ClientId, Monitor, Rect};

pub struct State {
    pub clients: ClientArena,
    pub monitors: Vec<Monitor>,
    pub selected_monitor: usize,
    pub screen_width: i32,
    pub screen_height: i32,
    pub bar_height: i32,
    pub status_text: String,
    pub numlock_mask: u32,
    pub running: bool,
    tag_count: usize,
}

impl State {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            clients: ClientArena::new(),
            monitors: Vec::new(),
            selected_monitor: 0,
            screen_width: 0,
            screen_height: 0,
            bar_height: 0,
            status_text: String::new(),
            numlock_mask: 0,
            running: false,
            tag_count: config.tags.len(),
        }
    }

    /// Bitmask covering every configured tag.
    #[must_use]
    pub const fn tag_mask(&self) -> u32 {
        (1 << self.tag_count) - 1
    }

    #[must_use]
    pub const fn tag_count(&self) -> usize {
        self.tag_count
    }

    #[must_use]
    pub fn selected_monitor(&self) -> &Monitor {
        &self.monitors[self.selected_monitor]
    }

    pub fn selected_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.selected_monitor]
    }

    #[must_use]
    pub fn selected_client(&self) -> Option<ClientId> {
        self.selected_monitor().selected
    }

    /// Whether the client is visible under its own monitor's tag-set.
    #[must_use]
    pub fn is_visible(&self, id: ClientId) -> bool {
        let Some(client) = self.clients.get(id) else {
            return false;
        };
        client.is_visible_on(self.monitors[client.monitor].current_tags())
    }

    // Registry operations. Attach pushes to the head so a new client takes
    // the master position and the top of the focus order.

    pub fn attach(&mut self, id: ClientId) {
        let monitor = self.clients.get(id).map_or(0, |c| c.monitor);
        self.monitors[monitor].clients.insert(0, id);
    }

    pub fn attach_stack(&mut self, id: ClientId) {
        let monitor = self.clients.get(id).map_or(0, |c| c.monitor);
        self.monitors[monitor].stack.insert(0, id);
    }

    pub fn detach(&mut self, id: ClientId) {
        let monitor = self.clients.get(id).map_or(0, |c| c.monitor);
        self.monitors[monitor].clients.retain(|&c| c != id);
    }

    /// Unlinks from the focus stack. When the detached client was selected,
    /// the first visible stack entry is promoted in its place.
    pub fn detach_stack(&mut self, id: ClientId) {
        let monitor = self.clients.get(id).map_or(0, |c| c.monitor);
        self.monitors[monitor].stack.retain(|&c| c != id);
        if self.monitors[monitor].selected == Some(id) {
            self.monitors[monitor].selected = self.first_visible_in_stack(monitor);
        }
    }

    #[must_use]
    pub fn first_visible_in_stack(&self, monitor: usize) -> Option<ClientId> {
        self.monitors[monitor]
            .stack
            .iter()
            .copied()
            .find(|&id| self.is_visible(id))
    }

    /// Visible, non-floating clients of a monitor in insertion order; the
    /// order the layout engine lays them out in.
    #[must_use]
    pub fn tiled_clients(&self, monitor: usize) -> Vec<ClientId> {
        self.monitors[monitor]
            .clients
            .iter()
            .copied()
            .filter(|&id| {
                self.is_visible(id)
                    && self.clients.get(id).is_some_and(|c| !c.is_floating)
            })
            .collect()
    }

    /// The candidate for `focus_stack(dir)`: the next/previous visible
    /// client in insertion order, wrapping around.
    #[must_use]
    pub fn focus_candidate(&self, direction: i32) -> Option<ClientId> {
        let monitor = self.selected_monitor();
        let selected = monitor.selected?;
        let visible: Vec<ClientId> = monitor
            .clients
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id))
            .collect();
        let position = visible.iter().position(|&id| id == selected)?;
        if visible.len() < 2 {
            return None;
        }
        let next = if direction > 0 {
            (position + 1) % visible.len()
        } else {
            (position + visible.len() - 1) % visible.len()
        };
        Some(visible[next])
    }

    #[must_use]
    pub fn window_to_client(&self, window: x11_dl::xlib::Window) -> Option<ClientId> {
        self.clients.find_window(window)
    }

    /// The monitor whose area overlaps the rect the most; falls back to the
    /// selected monitor.
    #[must_use]
    pub fn rect_to_monitor(&self, rect: Rect) -> usize {
        let mut best = self.selected_monitor;
        let mut area = 0;
        for (index, monitor) in self.monitors.iter().enumerate() {
            let overlap = monitor.screen.intersect_area(&rect);
            if overlap > area {
                area = overlap;
                best = index;
            }
        }
        best
    }

    /// Next (`dir > 0`) or previous monitor from the selected one, wrapping.
    #[must_use]
    pub fn direction_to_monitor(&self, direction: i32) -> usize {
        let count = self.monitors.len();
        if direction > 0 {
            (self.selected_monitor + 1) % count
        } else {
            (self.selected_monitor + count - 1) % count
        }
    }

    // Pure halves of the tag and layout commands. Each returns whether
    // anything changed so callers can skip the refocus/arrange round trip.

    /// Swaps the tag-set slot and views exactly `1 << index`. Also makes
    /// `index` the live layout slot, preserving the original's per-tag
    /// layout memory.
    pub fn view_tag(&mut self, index: usize) -> bool {
        let requested = (1 << index) & self.tag_mask();
        let monitor = self.selected_monitor_mut();
        if requested == monitor.tagset[monitor.selected_tags] {
            return false;
        }
        monitor.swap_selected_tags();
        if requested != 0 {
            monitor.set_tags(requested);
        }
        monitor.current_layout_slot = index;
        true
    }

    /// Swaps back to the previous view. The per-tag layout slot is left
    /// alone; only a real `view_tag` moves it.
    pub fn view_previous(&mut self) -> bool {
        let monitor = self.selected_monitor_mut();
        monitor.swap_selected_tags();
        monitor.tagset[0] != monitor.tagset[1]
    }

    /// Makes every tag visible, remembering the previous view in the other
    /// slot.
    pub fn view_all(&mut self) -> bool {
        let mask = self.tag_mask();
        let monitor = self.selected_monitor_mut();
        if monitor.current_tags() == mask {
            return false;
        }
        monitor.swap_selected_tags();
        monitor.set_tags(mask);
        true
    }

    /// XORs a tag into the current view, unless that would empty it.
    pub fn toggle_view_tag(&mut self, index: usize) -> bool {
        let mask = self.tag_mask();
        let monitor = self.selected_monitor_mut();
        let toggled = monitor.current_tags() ^ ((1 << index) & mask);
        if toggled == 0 {
            return false;
        }
        monitor.set_tags(toggled);
        true
    }

    /// Retags the selected client with exactly one tag.
    pub fn move_selected_to_tag(&mut self, index: usize) -> bool {
        let tags = (1 << index) & self.tag_mask();
        let Some(id) = self.selected_client() else {
            return false;
        };
        if tags == 0 {
            return false;
        }
        if let Some(client) = self.clients.get_mut(id) {
            client.tags = tags;
            return true;
        }
        false
    }

    /// XORs a tag on the selected client, unless that would leave it tagless.
    pub fn toggle_selected_tag(&mut self, index: usize) -> bool {
        let mask = self.tag_mask();
        let Some(id) = self.selected_client() else {
            return false;
        };
        if let Some(client) = self.clients.get_mut(id) {
            let toggled = client.tags ^ ((1 << index) & mask);
            if toggled != 0 {
                client.tags = toggled;
                return true;
            }
        }
        false
    }

    /// Factors below 1.0 adjust relative to the current value, anything
    /// else is absolute minus 1. The result is clamped to `[0.05, 0.95]`.
    pub fn set_master_factor(&mut self, factor: f32) -> bool {
        let monitor = self.selected_monitor_mut();
        let absolute = if factor < 1.0 { factor + monitor.mfact } else { factor - 1.0 };
        let clamped = absolute.clamp(0.05, 0.95);
        if (clamped - monitor.mfact).abs() < f32::EPSILON {
            return false;
        }
        monitor.mfact = clamped;
        true
    }

    /// Never drops below one master.
    pub fn change_masters_count(&mut self, delta: i32) {
        let monitor = self.selected_monitor_mut();
        monitor.masters_count = (monitor.masters_count as i32 + delta).max(1) as u32;
    }

    /// A zero delta resets the gaps, anything else adjusts them, floored
    /// at zero.
    pub fn change_gap(&mut self, delta: i32) {
        let monitor = self.selected_monitor_mut();
        if delta == 0 || monitor.gap_px + delta < 0 {
            monitor.gap_px = 0;
        } else {
            monitor.gap_px += delta;
        }
    }

    /// Re-homes a client onto another monitor, adopting that monitor's
    /// visible tags. Both list memberships move with it.
    pub fn move_client_to_monitor(&mut self, id: ClientId, target: usize) {
        self.detach(id);
        self.detach_stack(id);
        let tags = self.monitors[target].current_tags();
        if let Some(client) = self.clients.get_mut(id) {
            client.monitor = target;
            client.tags = tags;
        }
        self.attach(id);
        self.attach_stack(id);
    }

    /// Reconciles the monitor list against freshly reported screen
    /// geometries (already deduplicated). Grows by appending fresh
    /// monitors, shrinks by migrating every client of a vanishing tail
    /// monitor to the head monitor in stack order. Returns whether any
    /// geometry changed.
    pub fn reconcile_monitors(&mut self, screens: &[Rect], config: &Config) -> bool {
        let mut dirty = false;

        if self.monitors.len() <= screens.len() {
            let previous_count = self.monitors.len();
            for _ in self.monitors.len()..screens.len() {
                let num = self.monitors.len() as i32;
                self.monitors.push(self.new_monitor(num, config));
            }
            for (index, &screen) in screens.iter().enumerate() {
                let bar_height = self.bar_height;
                let monitor = &mut self.monitors[index];
                if index >= previous_count || monitor.screen != screen {
                    dirty = true;
                    monitor.num = index as i32;
                    monitor.screen = screen;
                    monitor.work = screen;
                    monitor.update_bar_position(bar_height);
                }
            }
        } else {
            while self.monitors.len() > screens.len() {
                let tail = self.monitors.len() - 1;
                // Preserve stack order while migrating: walk the dying
                // monitor's stack front to back.
                let migrating = self.monitors[tail].stack.clone();
                for id in migrating.iter().rev().copied() {
                    dirty = true;
                    self.detach(id);
                    self.detach_stack(id);
                    let tags = self.monitors[0].current_tags();
                    if let Some(client) = self.clients.get_mut(id) {
                        client.monitor = 0;
                        client.tags = tags;
                    }
                    self.attach(id);
                    self.attach_stack(id);
                }
                if self.selected_monitor == tail {
                    self.selected_monitor = 0;
                }
                self.monitors.pop();
            }
            for (index, &screen) in screens.iter().enumerate() {
                let bar_height = self.bar_height;
                let monitor = &mut self.monitors[index];
                if monitor.screen != screen {
                    dirty = true;
                    monitor.screen = screen;
                    monitor.work = screen;
                    monitor.update_bar_position(bar_height);
                }
            }
        }

        if dirty {
            self.selected_monitor = 0;
        }
        dirty
    }

    fn new_monitor(&self, num: i32, config: &Config) -> Monitor {
        let mut monitor = Monitor::new(
            num,
            self.tag_count,
            config.mfact,
            config.masters_count,
            config.show_bar,
            config.top_bar,
            config.gap_px,
        );
        monitor.layout_symbol = config.layouts[0].symbol().to_string();
        monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Client;

    fn state_with_monitors(count: usize) -> State {
        let config = Config::default();
        let mut state = State::new(&config);
        state.bar_height = 20;
        let screens: Vec<Rect> = (0..count)
            .map(|i| Rect::new(i as i32 * 1920, 0, 1920, 1080))
            .collect();
        state.reconcile_monitors(&screens, &config);
        state
    }

    fn add_client(state: &mut State, window: u64, monitor: usize) -> ClientId {
        let mut client = Client::new(window, Rect::new(0, 0, 100, 100), 1);
        client.monitor = monitor;
        client.tags = state.monitors[monitor].current_tags();
        let id = state.clients.insert(client);
        state.attach(id);
        state.attach_stack(id);
        state.monitors[monitor].selected = Some(id);
        id
    }

    #[test]
    fn every_client_lives_on_exactly_one_monitor() {
        let mut state = state_with_monitors(2);
        let a = add_client(&mut state, 1, 0);
        let b = add_client(&mut state, 2, 1);

        for id in [a, b] {
            let memberships = state
                .monitors
                .iter()
                .filter(|m| m.clients.contains(&id))
                .count();
            let stack_memberships = state
                .monitors
                .iter()
                .filter(|m| m.stack.contains(&id))
                .count();
            assert_eq!(memberships, 1, "insertion-list membership must be unique");
            assert_eq!(stack_memberships, 1, "stack membership must be unique");
        }

        state.move_client_to_monitor(a, 1);
        assert!(!state.monitors[0].clients.contains(&a));
        assert!(state.monitors[1].clients.contains(&a));
        assert!(state.monitors[1].stack.contains(&a));
        assert_eq!(
            state.clients.get(a).unwrap().tags,
            state.monitors[1].current_tags(),
            "a migrated client adopts the target monitor's tags"
        );
    }

    #[test]
    fn detaching_the_selected_client_promotes_the_next_visible() {
        let mut state = state_with_monitors(1);
        let first = add_client(&mut state, 1, 0);
        let second = add_client(&mut state, 2, 0);
        assert_eq!(state.selected_client(), Some(second));

        state.detach(second);
        state.detach_stack(second);
        assert_eq!(
            state.selected_client(),
            Some(first),
            "the top visible stack entry takes over the selection"
        );
    }

    #[test]
    fn view_twice_returns_to_the_original_tagset() {
        let mut state = state_with_monitors(1);
        let before = state.selected_monitor().current_tags();
        assert!(state.view_tag(1));
        assert_ne!(state.selected_monitor().current_tags(), before);
        assert!(state.view_tag(0));
        assert_eq!(state.selected_monitor().current_tags(), before);
    }

    #[test]
    fn viewing_the_current_tag_is_a_no_op() {
        let mut state = state_with_monitors(1);
        assert!(!state.view_tag(0), "tag 0 is already the view");
    }

    #[test]
    fn view_remembers_a_layout_per_tag() {
        let mut state = state_with_monitors(1);
        state.selected_monitor_mut().set_layout(1);
        state.view_tag(3);
        assert_eq!(state.selected_monitor().current_layout_index(), 0);
        state.view_tag(0);
        assert_eq!(state.selected_monitor().current_layout_index(), 1);
    }

    #[test]
    fn toggling_a_tag_twice_is_the_identity() {
        let mut state = state_with_monitors(1);
        let id = add_client(&mut state, 1, 0);
        let before = state.clients.get(id).unwrap().tags;
        assert!(state.toggle_selected_tag(3));
        assert!(state.toggle_selected_tag(3));
        assert_eq!(state.clients.get(id).unwrap().tags, before);
    }

    #[test]
    fn a_client_never_ends_up_tagless() {
        let mut state = state_with_monitors(1);
        let id = add_client(&mut state, 1, 0);
        assert!(
            !state.toggle_selected_tag(0),
            "clearing the only tag must be vetoed"
        );
        assert_ne!(state.clients.get(id).unwrap().tags, 0);
    }

    #[test]
    fn the_view_never_ends_up_empty() {
        let mut state = state_with_monitors(1);
        assert!(!state.toggle_view_tag(0), "emptying the view must be vetoed");
        assert_ne!(state.selected_monitor().current_tags(), 0);
    }

    #[test]
    fn master_factor_is_clamped() {
        let mut state = state_with_monitors(1);
        state.set_master_factor(-0.9);
        assert!((state.selected_monitor().mfact - 0.05).abs() < f32::EPSILON);
        state.set_master_factor(1.99);
        assert!((state.selected_monitor().mfact - 0.95).abs() < f32::EPSILON);
        state.set_master_factor(1.40);
        assert!((state.selected_monitor().mfact - 0.40).abs() < f32::EPSILON);
    }

    #[test]
    fn masters_count_never_drops_below_one() {
        let mut state = state_with_monitors(1);
        state.change_masters_count(-5);
        assert_eq!(state.selected_monitor().masters_count, 1);
        state.change_masters_count(2);
        assert_eq!(state.selected_monitor().masters_count, 3);
    }

    #[test]
    fn gap_adjustments_floor_at_zero_and_zero_resets() {
        let mut state = state_with_monitors(1);
        state.change_gap(7);
        assert_eq!(state.selected_monitor().gap_px, 12, "default gap plus delta");
        state.change_gap(-100);
        assert_eq!(state.selected_monitor().gap_px, 0);
        state.change_gap(4);
        state.change_gap(0);
        assert_eq!(state.selected_monitor().gap_px, 0, "zero resets");
    }

    #[test]
    fn promoting_a_client_makes_it_the_master() {
        let mut state = state_with_monitors(1);
        let a = add_client(&mut state, 1, 0);
        let b = add_client(&mut state, 2, 0);
        // Insertion order is [b, a]; promote a the way zoom does.
        state.detach(a);
        state.attach(a);
        assert_eq!(state.monitors[0].clients, vec![a, b]);
        assert_eq!(state.tiled_clients(0), vec![a, b], "a now owns the master spot");
    }

    #[test]
    fn focus_candidate_wraps_in_both_directions() {
        let mut state = state_with_monitors(1);
        let a = add_client(&mut state, 1, 0);
        let b = add_client(&mut state, 2, 0);
        let c = add_client(&mut state, 3, 0);
        // Insertion order is newest first: [c, b, a]; c is selected.
        assert_eq!(state.focus_candidate(1), Some(b));
        assert_eq!(state.focus_candidate(-1), Some(a), "backwards wraps to the tail");
        state.monitors[0].selected = Some(a);
        assert_eq!(state.focus_candidate(1), Some(c), "forwards wraps to the head");
    }

    #[test]
    fn focus_candidate_skips_hidden_clients() {
        let mut state = state_with_monitors(1);
        let a = add_client(&mut state, 1, 0);
        let b = add_client(&mut state, 2, 0);
        let c = add_client(&mut state, 3, 0);
        state.clients.get_mut(b).unwrap().tags = 1 << 5;
        assert!(!state.is_visible(b));
        state.monitors[0].selected = Some(c);
        assert_eq!(state.focus_candidate(1), Some(a), "hidden clients are skipped");
    }

    #[test]
    fn removing_a_monitor_migrates_clients_to_the_head_in_stack_order() {
        let config = Config::default();
        let mut state = state_with_monitors(2);
        let a = add_client(&mut state, 1, 1);
        let b = add_client(&mut state, 2, 1);
        let keeper = add_client(&mut state, 3, 0);
        assert_eq!(state.monitors[1].stack, vec![b, a]);

        let dirty =
            state.reconcile_monitors(&[Rect::new(0, 0, 1920, 1080)], &config);
        assert!(dirty);
        assert_eq!(state.monitors.len(), 1);
        assert_eq!(
            state.monitors[0].stack,
            vec![b, a, keeper],
            "migrated clients keep their relative stack order, above the survivors"
        );
        assert!(state.monitors[0].clients.contains(&a));
        assert!(state.monitors[0].clients.contains(&b));
        assert_eq!(state.clients.get(a).unwrap().monitor, 0);
    }

    #[test]
    fn growing_the_monitor_list_marks_dirty_and_assigns_geometry() {
        let config = Config::default();
        let mut state = State::new(&config);
        state.bar_height = 20;
        let dirty = state.reconcile_monitors(
            &[Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1280, 1024)],
            &config,
        );
        assert!(dirty);
        assert_eq!(state.monitors.len(), 2);
        assert_eq!(state.monitors[1].screen, Rect::new(1920, 0, 1280, 1024));
        assert_eq!(state.monitors[1].work.h, 1024 - 20, "bar strip is reserved");
        assert_ne!(state.monitors[0].tagset[0], 0, "a fresh monitor views tag 1");
    }

    #[test]
    fn unchanged_geometries_are_not_dirty() {
        let config = Config::default();
        let mut state = state_with_monitors(1);
        let dirty = state.reconcile_monitors(&[Rect::new(0, 0, 1920, 1080)], &config);
        assert!(!dirty, "same screens in, no re-arrange out");
    }

    #[test]
    fn rect_to_monitor_picks_the_largest_overlap() {
        let mut state = state_with_monitors(2);
        state.selected_monitor = 0;
        let mostly_on_second = Rect::new(1920 - 100, 0, 400, 300);
        assert_eq!(state.rect_to_monitor(mostly_on_second), 1);
        let nowhere = Rect::new(50000, 50000, 10, 10);
        assert_eq!(state.rect_to_monitor(nowhere), 0, "falls back to the selection");
    }

    #[test]
    fn direction_to_monitor_wraps() {
        let mut state = state_with_monitors(3);
        state.selected_monitor = 2;
        assert_eq!(state.direction_to_monitor(1), 0);
        state.selected_monitor = 0;
        assert_eq!(state.direction_to_monitor(-1), 2);
    }
}
