//! Managed client windows and the arena that owns them.
use super::Rect;
use x11_dl::xlib;

/// Longest client title we keep, in bytes.
const MAX_NAME_LEN: usize = 256;

/// Stable handle into the [`ClientArena`]. Handles stay valid until the
/// client is removed, no matter how many other clients come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(usize);

/// Size constraints parsed from `WM_NORMAL_HINTS` (ICCCM 4.1.2.3).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SizeHints {
    pub base_w: i32,
    pub base_h: i32,
    pub inc_w: i32,
    pub inc_h: i32,
    pub min_w: i32,
    pub min_h: i32,
    pub max_w: i32,
    pub max_h: i32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

impl SizeHints {
    /// Refreshes the hints from a raw `XSizeHints` reply. Base falls back
    /// to min, min falls back to base, exactly as dictated by ICCCM.
    pub fn update(&mut self, size: &xlib::XSizeHints) {
        if size.flags & xlib::PBaseSize != 0 {
            self.base_w = size.base_width;
            self.base_h = size.base_height;
        } else if size.flags & xlib::PMinSize != 0 {
            self.base_w = size.min_width;
            self.base_h = size.min_height;
        } else {
            self.base_w = 0;
            self.base_h = 0;
        }

        if size.flags & xlib::PResizeInc != 0 {
            self.inc_w = size.width_inc;
            self.inc_h = size.height_inc;
        } else {
            self.inc_w = 0;
            self.inc_h = 0;
        }

        if size.flags & xlib::PMaxSize != 0 {
            self.max_w = size.max_width;
            self.max_h = size.max_height;
        } else {
            self.max_w = 0;
            self.max_h = 0;
        }

        if size.flags & xlib::PMinSize != 0 {
            self.min_w = size.min_width;
            self.min_h = size.min_height;
        } else if size.flags & xlib::PBaseSize != 0 {
            self.min_w = size.base_width;
            self.min_h = size.base_height;
        } else {
            self.min_w = 0;
            self.min_h = 0;
        }

        if size.flags & xlib::PAspect != 0 {
            self.min_aspect = size.min_aspect.y as f32 / size.min_aspect.x as f32;
            self.max_aspect = size.max_aspect.x as f32 / size.max_aspect.y as f32;
        } else {
            self.min_aspect = 0.0;
            self.max_aspect = 0.0;
        }
    }

    /// A client whose min and max sizes coincide in both dimensions cannot
    /// be tiled meaningfully and is forced floating.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.max_w != 0
            && self.max_h != 0
            && self.max_w == self.min_w
            && self.max_h == self.min_h
    }
}

/// One managed top-level window.
#[derive(Debug, Clone)]
pub struct Client {
    pub window: xlib::Window,
    pub name: String,
    pub rect: Rect,
    pub old_rect: Rect,
    pub border_width: i32,
    pub old_border_width: i32,
    pub hints: SizeHints,
    pub tags: u32,
    pub is_floating: bool,
    pub is_urgent: bool,
    pub never_focus: bool,
    pub is_fullscreen: bool,
    pub old_floating: bool,
    /// Index of the owning monitor in `State::monitors`.
    pub monitor: usize,
}

impl Client {
    /// A freshly managed client. `old_border_width` is the border the
    /// window arrived with; it is restored when the client is unmanaged.
    #[must_use]
    pub fn new(window: xlib::Window, rect: Rect, old_border_width: i32) -> Self {
        Self {
            window,
            name: String::new(),
            rect,
            old_rect: rect,
            border_width: 0,
            old_border_width,
            hints: SizeHints::default(),
            tags: 0,
            is_floating: false,
            is_urgent: false,
            never_focus: false,
            is_fullscreen: false,
            old_floating: false,
            monitor: 0,
        }
    }

    /// Width including both borders.
    #[must_use]
    pub const fn total_width(&self) -> i32 {
        self.rect.w + 2 * self.border_width
    }

    /// Height including both borders.
    #[must_use]
    pub const fn total_height(&self) -> i32 {
        self.rect.h + 2 * self.border_width
    }

    #[must_use]
    pub const fn is_visible_on(&self, tags: u32) -> bool {
        self.tags & tags != 0
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.hints.is_fixed()
    }

    /// Replaces the geometry, remembering the previous one so fullscreen
    /// and floating toggles can restore it.
    pub fn apply_geometry(&mut self, rect: Rect) {
        self.old_rect = self.rect;
        self.rect = rect;
    }

    /// Stores the title, bounded to [`MAX_NAME_LEN`] bytes on a char
    /// boundary.
    pub fn set_name(&mut self, name: &str) {
        let mut end = name.len().min(MAX_NAME_LEN);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        self.name = name[..end].to_string();
    }
}

/// Snaps a requested geometry to something legal for the client.
///
/// Position is clamped into the monitor work area (or the whole screen
/// while the user is dragging), the size floor is the bar height, and when
/// `honor_hints` is set the ICCCM 4.1.2.3 dance is performed: base size
/// subtracted, aspect limits applied, increments rounded, base restored,
/// then clamped to min/max. Returns the adjusted rect and whether it
/// differs from the client's current geometry; callers skip the X round
/// trip when it does not.
///
/// Applying the result a second time yields the same rect.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn apply_size_hints(
    client: &Client,
    rect: Rect,
    interact: bool,
    honor_hints: bool,
    screen: (i32, i32),
    work_area: Rect,
    bar_height: i32,
) -> (Rect, bool) {
    let Rect { mut x, mut y, mut w, mut h } = rect;
    let border2 = 2 * client.border_width;

    w = w.max(1);
    h = h.max(1);
    if interact {
        let (sw, sh) = screen;
        if x > sw {
            x = sw - client.total_width();
        }
        if y > sh {
            y = sh - client.total_height();
        }
        if x + w + border2 < 0 {
            x = 0;
        }
        if y + h + border2 < 0 {
            y = 0;
        }
    } else {
        if x >= work_area.x + work_area.w {
            x = work_area.x + work_area.w - client.total_width();
        }
        if y >= work_area.y + work_area.h {
            y = work_area.y + work_area.h - client.total_height();
        }
        if x + w + border2 <= work_area.x {
            x = work_area.x;
        }
        if y + h + border2 <= work_area.y {
            y = work_area.y;
        }
    }
    h = h.max(bar_height);
    w = w.max(bar_height);

    if honor_hints {
        let hints = &client.hints;
        // See the last two sentences in ICCCM 4.1.2.3.
        let base_is_min = hints.base_w == hints.min_w && hints.base_h == hints.min_h;
        if !base_is_min {
            w -= hints.base_w;
            h -= hints.base_h;
        }

        if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
            if hints.max_aspect < w as f32 / h as f32 {
                w = (h as f32 * hints.max_aspect + 0.5) as i32;
            } else if hints.min_aspect < h as f32 / w as f32 {
                h = (w as f32 * hints.min_aspect + 0.5) as i32;
            }
        }

        // Increment calculation requires the base removed.
        if base_is_min {
            w -= hints.base_w;
            h -= hints.base_h;
        }
        if hints.inc_w > 0 {
            w -= w % hints.inc_w;
        }
        if hints.inc_h > 0 {
            h -= h % hints.inc_h;
        }

        w = (w + hints.base_w).max(hints.min_w);
        h = (h + hints.base_h).max(hints.min_h);
        if hints.max_w > 0 {
            w = w.min(hints.max_w);
        }
        if hints.max_h > 0 {
            h = h.min(hints.max_h);
        }
    }

    let adjusted = Rect::new(x, y, w, h);
    (adjusted, adjusted != client.rect)
}

/// Owns every managed [`Client`]. Slots are recycled through a free list so
/// a [`ClientId`] stays a plain index for the arena's whole lifetime.
#[derive(Debug, Default)]
pub struct ClientArena {
    slots: Vec<Option<Client>>,
    free: Vec<usize>,
}

impl ClientArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client: Client) -> ClientId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(client);
            ClientId(index)
        } else {
            self.slots.push(Some(client));
            ClientId(self.slots.len() - 1)
        }
    }

    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        let client = self.slots.get_mut(id.0)?.take();
        if client.is_some() {
            self.free.push(id.0);
        }
        client
    }

    #[must_use]
    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClientId, &Client)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|c| (ClientId(index), c)))
    }

    /// Looks up the client managing an X window.
    #[must_use]
    pub fn find_window(&self, window: xlib::Window) -> Option<ClientId> {
        self.iter().find(|(_, c)| c.window == window).map(|(id, _)| id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_hints(hints: SizeHints) -> Client {
        let mut client = Client::new(1, Rect::new(0, 0, 400, 300), 1);
        client.border_width = 1;
        client.hints = hints;
        client
    }

    const WORK: Rect = Rect::new(0, 20, 1920, 1060);
    const SCREEN: (i32, i32) = (1920, 1080);

    #[test]
    fn arena_reuses_slots_and_keeps_ids_stable() {
        let mut arena = ClientArena::new();
        let a = arena.insert(Client::new(10, Rect::default(), 1));
        let b = arena.insert(Client::new(11, Rect::default(), 1));
        assert_ne!(a, b);

        arena.remove(a);
        assert!(arena.get(a).is_none(), "removed slot must read as empty");
        assert_eq!(arena.get(b).map(|c| c.window), Some(11));

        let c = arena.insert(Client::new(12, Rect::default(), 1));
        assert_eq!(a, c, "freed slot should be recycled");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn find_window_resolves_only_live_clients() {
        let mut arena = ClientArena::new();
        let id = arena.insert(Client::new(42, Rect::default(), 1));
        assert_eq!(arena.find_window(42), Some(id));
        arena.remove(id);
        assert_eq!(arena.find_window(42), None);
    }

    #[test]
    fn min_equals_max_means_fixed() {
        let hints = SizeHints {
            min_w: 300,
            min_h: 200,
            max_w: 300,
            max_h: 200,
            ..SizeHints::default()
        };
        assert!(hints.is_fixed());

        let resizable = SizeHints {
            min_w: 300,
            min_h: 200,
            max_w: 800,
            max_h: 600,
            ..SizeHints::default()
        };
        assert!(!resizable.is_fixed());
    }

    #[test]
    fn size_hints_respect_increments_and_base() {
        let client = client_with_hints(SizeHints {
            base_w: 10,
            base_h: 20,
            inc_w: 7,
            inc_h: 13,
            min_w: 17,
            min_h: 33,
            ..SizeHints::default()
        });
        let (rect, _) = apply_size_hints(
            &client,
            Rect::new(0, 20, 401, 301),
            false,
            true,
            SCREEN,
            WORK,
            18,
        );
        assert_eq!((rect.w - 10) % 7, 0, "width must land on an increment");
        assert_eq!((rect.h - 20) % 13, 0, "height must land on an increment");
    }

    #[test]
    fn size_hints_clamp_to_min_and_max() {
        let client = client_with_hints(SizeHints {
            min_w: 500,
            min_h: 400,
            max_w: 600,
            max_h: 450,
            ..SizeHints::default()
        });

        let (small, _) =
            apply_size_hints(&client, Rect::new(0, 20, 100, 100), false, true, SCREEN, WORK, 18);
        assert_eq!((small.w, small.h), (500, 400));

        let (large, _) =
            apply_size_hints(&client, Rect::new(0, 20, 900, 900), false, true, SCREEN, WORK, 18);
        assert_eq!((large.w, large.h), (600, 450));
    }

    #[test]
    fn aspect_limits_shrink_the_long_side() {
        let client = client_with_hints(SizeHints {
            min_aspect: 1.0,
            max_aspect: 1.0,
            ..SizeHints::default()
        });
        let (rect, _) =
            apply_size_hints(&client, Rect::new(0, 20, 800, 400), false, true, SCREEN, WORK, 18);
        assert_eq!(rect.w, rect.h, "a 1:1 aspect limit must square the rect");
        assert_eq!(rect.w, 400, "the wide side shrinks, the short side stays");
    }

    #[test]
    fn apply_size_hints_is_idempotent() {
        let client = client_with_hints(SizeHints {
            base_w: 8,
            base_h: 8,
            inc_w: 11,
            inc_h: 9,
            min_w: 40,
            min_h: 30,
            max_w: 1000,
            max_h: 900,
            ..SizeHints::default()
        });
        let (first, _) = apply_size_hints(
            &client,
            Rect::new(33, 47, 641, 483),
            false,
            true,
            SCREEN,
            WORK,
            18,
        );
        let (second, _) = apply_size_hints(&client, first, false, true, SCREEN, WORK, 18);
        assert_eq!(first, second, "re-applying the hints must be a fixpoint");
    }

    #[test]
    fn position_is_clamped_into_the_work_area() {
        let client = client_with_hints(SizeHints::default());
        let (rect, _) = apply_size_hints(
            &client,
            Rect::new(5000, 5000, 400, 300),
            false,
            false,
            SCREEN,
            WORK,
            18,
        );
        assert!(rect.x < WORK.x + WORK.w, "client must stay inside the work area");
        assert!(rect.y < WORK.y + WORK.h);
    }

    #[test]
    fn interactive_moves_clamp_to_the_screen_instead() {
        let client = client_with_hints(SizeHints::default());
        let (rect, _) = apply_size_hints(
            &client,
            Rect::new(-5000, -5000, 400, 300),
            true,
            false,
            SCREEN,
            WORK,
            18,
        );
        assert_eq!((rect.x, rect.y), (0, 0));
    }

    #[test]
    fn size_floor_is_the_bar_height() {
        let client = client_with_hints(SizeHints::default());
        let (rect, _) =
            apply_size_hints(&client, Rect::new(0, 20, 2, 3), false, false, SCREEN, WORK, 18);
        assert_eq!((rect.w, rect.h), (18, 18));
    }

    #[test]
    fn unchanged_geometry_reports_no_difference() {
        let client = client_with_hints(SizeHints::default());
        let (_, changed) =
            apply_size_hints(&client, client.rect, false, false, SCREEN, WORK, 18);
        assert!(!changed, "same rect in, no X round trip out");
    }

    #[test]
    fn geometry_changes_remember_the_previous_rect() {
        let mut client = Client::new(1, Rect::new(10, 20, 300, 200), 1);
        let fullscreen = Rect::new(0, 0, 1920, 1080);
        client.apply_geometry(fullscreen);
        assert_eq!(client.rect, fullscreen);
        assert_eq!(
            client.old_rect,
            Rect::new(10, 20, 300, 200),
            "the pre-fullscreen rect must survive for the restore"
        );
    }

    #[test]
    fn set_name_truncates_on_char_boundary() {
        let mut client = Client::new(1, Rect::default(), 1);
        let long: String = "ß".repeat(200);
        client.set_name(&long);
        assert!(client.name.len() <= 256);
        assert!(client.name.chars().all(|c| c == 'ß'));
    }
}
