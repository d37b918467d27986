//! The manager owns everything: the model, the X facade, the draw context
//! and the resolved bindings. Event handlers and commands are implemented
//! on it across the `handlers` modules.
use crate::bar::{self, Schemes};
use crate::command::Command;
use crate::config::{ClickTarget, Config};
use crate::drw::Drw;
use crate::models::{ClientId, Rect};
use crate::state::State;
use crate::utils::child_process::{self, Children};
use crate::utils::xkeysym_lookup::{self, XKeysym};
use crate::xwrap::{XWrap, CLIENT_EVENT_MASK};
use crate::Result;
use std::os::raw::c_long;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use x11_dl::xlib;

pub(crate) struct KeyBinding {
    pub mod_mask: u32,
    pub keysym: XKeysym,
    pub command: Command,
}

pub(crate) struct MouseBinding {
    pub target: ClickTarget,
    pub mod_mask: u32,
    pub button: u32,
    pub command: Command,
}

pub struct Manager {
    pub config: Config,
    pub xwrap: XWrap,
    pub drw: Drw,
    pub state: State,
    pub schemes: Schemes,
    pub(crate) keybinds: Vec<KeyBinding>,
    pub(crate) mousebinds: Vec<MouseBinding>,
    /// The `(button, modifier)` pairs grabbed on every client window.
    pub(crate) client_button_grabs: Vec<(u32, u32)>,
    pub(crate) children: Children,
    pub(crate) child_flag: Arc<AtomicBool>,
    pub(crate) check_window: xlib::Window,
    /// Monitor the pointer was last seen on, for root motion tracking.
    pub(crate) motion_monitor: Option<usize>,
}

impl Manager {
    /// Opens the display and resolves the configured bindings. The config
    /// must already be validated, so binding resolution cannot fail here.
    ///
    /// # Errors
    ///
    /// Errors when no X server can be reached.
    pub fn new(config: Config) -> Result<Self> {
        let xwrap = XWrap::new()?;
        let drw = Drw::new(xwrap.display(), xwrap.screen(), xwrap.root(), 1, 1)?;
        let state = State::new(&config);

        let tag_count = config.tags.len();
        let keybinds = config
            .keybinds
            .iter()
            .filter_map(|kb| {
                let keysym = xkeysym_lookup::into_keysym(&kb.key)?;
                let command = kb.command(tag_count).ok()?;
                Some(KeyBinding {
                    mod_mask: xkeysym_lookup::into_mod_mask(&kb.modifier),
                    keysym,
                    command,
                })
            })
            .collect();
        let mousebinds: Vec<MouseBinding> = config
            .mousebinds
            .iter()
            .filter_map(|mb| {
                let command = mb.command(tag_count).ok()?;
                Some(MouseBinding {
                    target: mb.target,
                    mod_mask: xkeysym_lookup::into_mod_mask(&mb.modifier),
                    button: mb.button,
                    command,
                })
            })
            .collect();
        let client_button_grabs = mousebinds
            .iter()
            .filter(|mb| mb.target == ClickTarget::ClientWin)
            .map(|mb| (mb.button, mb.mod_mask))
            .collect();

        let child_flag = Arc::new(AtomicBool::new(false));
        child_process::register_child_hook(child_flag.clone());

        Ok(Self {
            config,
            xwrap,
            drw,
            state,
            schemes: Schemes {
                normal: 0,
                selected: 0,
            },
            keybinds,
            mousebinds,
            client_button_grabs,
            children: Children::new(),
            child_flag,
            check_window: 0,
            motion_monitor: None,
        })
    }

    /// Claims the WM role and brings up everything: fonts, bar, monitors,
    /// EWMH properties, root event mask and key grabs.
    ///
    /// # Errors
    ///
    /// Errors when no font loads or a configured color cannot be
    /// allocated.
    pub fn setup(&mut self) -> Result<()> {
        self.xwrap.become_window_manager();

        let (width, height) = self.xwrap.display_size();
        self.state.screen_width = width;
        self.state.screen_height = height;

        self.drw.fontset_create(&self.config.fonts)?;
        self.state.bar_height = bar::bar_height(&self.drw);
        self.drw.resize(width as u32, self.state.bar_height as u32);

        let colors = self.config.colors.clone();
        self.schemes = Schemes {
            normal: self.drw.scheme_create([
                colors.normal.fg.as_str(),
                colors.normal.bg.as_str(),
                colors.normal.border.as_str(),
            ])?,
            selected: self.drw.scheme_create([
                colors.selected.fg.as_str(),
                colors.selected.bg.as_str(),
                colors.selected.border.as_str(),
            ])?,
        };

        self.update_geometry();
        self.update_bars();
        self.update_status();

        self.check_window = self.xwrap.create_check_window();
        let supported: Vec<c_long> = self
            .xwrap
            .atoms
            .net_supported()
            .iter()
            .map(|&atom| atom as c_long)
            .collect();
        self.xwrap.replace_property_long(
            self.xwrap.root(),
            self.xwrap.atoms.NetSupported,
            xlib::XA_ATOM,
            &supported,
        );
        self.xwrap
            .delete_property(self.xwrap.root(), self.xwrap.atoms.NetClientList);

        self.xwrap.init_root();
        self.grab_keys();
        self.focus(None);
        self.xwrap.sync();
        Ok(())
    }

    /// Adopts the windows that were already mapped when we started:
    /// regular windows first, transients second so they can find their
    /// leaders.
    pub fn scan(&mut self) {
        let windows = self.xwrap.get_all_windows();
        for &window in &windows {
            let Some(attrs) = self.xwrap.get_window_attrs(window) else {
                continue;
            };
            if attrs.override_redirect != 0 || self.xwrap.get_transient_for(window).is_some() {
                continue;
            }
            if attrs.map_state == xlib::IsViewable
                || self.xwrap.get_wm_state(window) == Some(crate::xwrap::ICONIC_STATE)
            {
                self.manage(window, &attrs);
            }
        }
        for &window in &windows {
            let Some(attrs) = self.xwrap.get_window_attrs(window) else {
                continue;
            };
            if self.xwrap.get_transient_for(window).is_some()
                && (attrs.map_state == xlib::IsViewable
                    || self.xwrap.get_wm_state(window) == Some(crate::xwrap::ICONIC_STATE))
            {
                self.manage(window, &attrs);
            }
        }
    }

    /// Releases every client and X resource before exit.
    pub fn cleanup(&mut self) {
        self.state.view_all();
        loop {
            let next = self
                .state
                .monitors
                .iter()
                .find_map(|m| m.stack.first())
                .copied();
            match next {
                Some(id) => self.unmanage(id, false),
                None => break,
            }
        }
        self.xwrap.ungrab_keys();
        for index in 0..self.state.monitors.len() {
            let bar_window = self.state.monitors[index].bar_window;
            if bar_window != 0 {
                self.xwrap.unmap_window(bar_window);
                self.xwrap.destroy_window(bar_window);
            }
        }
        self.xwrap.destroy_window(self.check_window);
        self.xwrap.free_cursors();
        self.xwrap.sync();
        self.xwrap.focus_nothing();
    }

    // Monitors and bars.

    /// Re-reads the screen layout and reconciles the monitor list,
    /// destroying the bar windows of monitors that went away. Returns
    /// whether any geometry changed.
    pub fn update_geometry(&mut self) -> bool {
        let screens = self
            .xwrap
            .get_screens((self.state.screen_width, self.state.screen_height));
        let doomed: Vec<xlib::Window> = self
            .state
            .monitors
            .iter()
            .skip(screens.len())
            .map(|m| m.bar_window)
            .collect();
        let dirty = self.state.reconcile_monitors(&screens, &self.config);
        for window in doomed {
            if window != 0 {
                self.xwrap.unmap_window(window);
                self.xwrap.destroy_window(window);
            }
        }
        dirty
    }

    /// Creates bar windows for monitors that do not have one yet.
    pub fn update_bars(&mut self) {
        for index in 0..self.state.monitors.len() {
            if self.state.monitors[index].bar_window != 0 {
                continue;
            }
            let monitor = &self.state.monitors[index];
            let rect = Rect::new(
                monitor.work.x,
                monitor.bar_y,
                monitor.work.w,
                self.state.bar_height,
            );
            self.state.monitors[index].bar_window = self.xwrap.create_bar_window(rect);
        }
    }

    /// Pulls the status text from the root window name.
    pub fn update_status(&mut self) {
        self.state.status_text = self
            .xwrap
            .get_text_prop(self.xwrap.root(), xlib::XA_WM_NAME)
            .unwrap_or_else(|| concat!("tatami-", env!("CARGO_PKG_VERSION")).to_string());
        self.draw_bar(self.state.selected_monitor);
    }

    pub fn draw_bar(&mut self, monitor: usize) {
        bar::draw_bar(
            &mut self.drw,
            &self.state,
            &self.config.tags,
            monitor,
            self.schemes,
        );
    }

    pub fn draw_bars(&mut self) {
        for index in 0..self.state.monitors.len() {
            self.draw_bar(index);
        }
    }

    // Arranging.

    /// Recomputes client visibility and geometry. With a monitor this also
    /// restacks it; with `None` every monitor is re-arranged.
    pub fn arrange(&mut self, monitor: Option<usize>) {
        match monitor {
            Some(index) => {
                self.show_hide(index);
                self.arrange_monitor(index);
                self.restack(index);
            }
            None => {
                for index in 0..self.state.monitors.len() {
                    self.show_hide(index);
                    self.arrange_monitor(index);
                }
            }
        }
    }

    fn arrange_monitor(&mut self, monitor: usize) {
        let layout = self.config.layouts[self.state.monitors[monitor].current_layout_index()];
        self.state.monitors[monitor].layout_symbol = layout.symbol().to_string();

        let tiled = self.state.tiled_clients(monitor);
        let border_widths: Vec<i32> = tiled
            .iter()
            .filter_map(|&id| self.state.clients.get(id).map(|c| c.border_width))
            .collect();
        let m = &self.state.monitors[monitor];
        if let Some(rects) =
            layout.update(m.work, m.gap_px, m.mfact, m.masters_count, &border_widths)
        {
            for (&id, rect) in tiled.iter().zip(rects) {
                self.resize(id, rect, false);
            }
        }
    }

    /// Moves visible clients on screen top-down and hidden ones off screen
    /// bottom-up, as two explicit passes over the focus stack.
    fn show_hide(&mut self, monitor: usize) {
        let stack = self.state.monitors[monitor].stack.clone();
        let layout_arranges = self.config.layouts
            [self.state.monitors[monitor].current_layout_index()]
        .arranges();

        for &id in &stack {
            if !self.state.is_visible(id) {
                continue;
            }
            let Some(client) = self.state.clients.get(id) else {
                continue;
            };
            let (window, rect) = (client.window, client.rect);
            let free_floating =
                (!layout_arranges || client.is_floating) && !client.is_fullscreen;
            self.xwrap.move_window(window, rect.x, rect.y);
            if free_floating {
                self.resize(id, rect, false);
            }
        }
        for &id in stack.iter().rev() {
            if self.state.is_visible(id) {
                continue;
            }
            if let Some(client) = self.state.clients.get(id) {
                self.xwrap
                    .move_window(client.window, -2 * client.total_width(), client.rect.y);
            }
        }
    }

    /// Applies size hints to a requested geometry, then pushes it to the
    /// client if anything changed.
    pub fn resize(&mut self, id: ClientId, rect: Rect, interact: bool) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let monitor = &self.state.monitors[client.monitor];
        let honor_hints = self.config.resize_hints
            || client.is_floating
            || !self.config.layouts[monitor.current_layout_index()].arranges();
        let (adjusted, changed) = crate::models::apply_size_hints(
            client,
            rect,
            interact,
            honor_hints,
            (self.state.screen_width, self.state.screen_height),
            monitor.work,
            self.state.bar_height,
        );
        if changed {
            self.resize_client(id, adjusted);
        }
    }

    /// Applies a geometry unconditionally, remembering the previous one,
    /// and tells the client about it.
    pub fn resize_client(&mut self, id: ClientId, rect: Rect) {
        let Some(client) = self.state.clients.get_mut(id) else {
            return;
        };
        client.apply_geometry(rect);
        let client = self.state.clients.get(id).expect("client was just updated");
        self.xwrap
            .configure_window_geometry(client.window, rect, client.border_width);
        self.xwrap.send_configure_notify(client);
        self.xwrap.sync();
    }

    // Lookup helpers.

    /// The monitor a window belongs to: the pointer's monitor for the
    /// root, the owner for bars and clients, the selected monitor
    /// otherwise.
    pub fn window_to_monitor(&self, window: xlib::Window) -> usize {
        if window == self.xwrap.root() {
            if let Some((x, y)) = self.xwrap.get_root_pointer() {
                return self.state.rect_to_monitor(Rect::new(x, y, 1, 1));
            }
        }
        if let Some(index) = self
            .state
            .monitors
            .iter()
            .position(|m| m.bar_window == window)
        {
            return index;
        }
        if let Some(id) = self.state.window_to_client(window) {
            if let Some(client) = self.state.clients.get(id) {
                return client.monitor;
            }
        }
        self.state.selected_monitor
    }

    // Grabs.

    pub fn grab_keys(&mut self) {
        self.state.numlock_mask = self.xwrap.get_numlock_mask();
        self.xwrap.ungrab_keys();
        for bind in &self.keybinds {
            self.xwrap
                .grab_key(bind.keysym, bind.mod_mask, self.state.numlock_mask);
        }
    }

    pub fn grab_buttons(&mut self, id: ClientId, focused: bool) {
        self.state.numlock_mask = self.xwrap.get_numlock_mask();
        if let Some(client) = self.state.clients.get(id) {
            self.xwrap.grab_buttons(
                client.window,
                &self.client_button_grabs,
                self.state.numlock_mask,
                focused,
            );
        }
    }

    /// Rebuilds `_NET_CLIENT_LIST` from the model.
    pub fn update_client_list(&self) {
        let windows: Vec<xlib::Window> = self
            .state
            .monitors
            .iter()
            .flat_map(|m| m.clients.iter())
            .filter_map(|&id| self.state.clients.get(id).map(|c| c.window))
            .collect();
        self.xwrap.set_client_list(&windows);
    }

    /// Subscribes a new client to the events we track on it.
    pub(crate) fn subscribe_client_events(&self, window: xlib::Window) {
        self.xwrap.subscribe_to_event(window, CLIENT_EVENT_MASK);
    }
}
