//! Client lifecycle: manage/unmanage and the property updates that feed
//! the model, plus the structure-related event handlers.
use crate::models::{Client, ClientId, Rect};
use crate::xwrap::{NORMAL_STATE, WITHDRAWN_STATE};
use crate::Manager;
use std::os::raw::c_ulong;
use x11_dl::xlib;

impl Manager {
    /// Starts managing a window: builds the client record, seeds tags and
    /// monitor from the transient leader or the rules, clamps and centers
    /// the geometry, installs grabs and subscriptions, and maps it.
    pub fn manage(&mut self, window: xlib::Window, attrs: &xlib::XWindowAttributes) {
        let rect = Rect::new(attrs.x, attrs.y, attrs.width, attrs.height);
        let mut client = Client::new(window, rect, attrs.border_width);
        client.monitor = self.state.selected_monitor;
        let id = self.state.clients.insert(client);

        self.update_title(id);
        let transient_leader = self
            .xwrap
            .get_transient_for(window)
            .and_then(|leader| self.state.window_to_client(leader));
        if let Some(leader) = transient_leader {
            let (monitor, tags) = {
                let leader = self.state.clients.get(leader).expect("leader is managed");
                (leader.monitor, leader.tags)
            };
            let client = self.state.clients.get_mut(id).expect("client was inserted");
            client.monitor = monitor;
            client.tags = tags;
        } else {
            self.apply_rules(id);
        }

        {
            let monitor_index = self.state.clients.get(id).expect("inserted").monitor;
            let (screen, bar_y) = {
                let monitor = &self.state.monitors[monitor_index];
                (monitor.screen, monitor.bar_y)
            };
            let work = self.state.monitors[monitor_index].work;
            let bar_height = self.state.bar_height;
            let client = self.state.clients.get_mut(id).expect("inserted");

            if client.rect.x + client.total_width() > screen.x + screen.w {
                client.rect.x = screen.x + screen.w - client.total_width();
            }
            if client.rect.y + client.total_height() > screen.y + screen.h {
                client.rect.y = screen.y + screen.h - client.total_height();
            }
            client.rect.x = client.rect.x.max(screen.x);
            // Only fix the y offset when the client's center might cover
            // the bar.
            let covers_bar = bar_y == screen.y
                && client.rect.x + client.rect.w / 2 >= work.x
                && client.rect.x + client.rect.w / 2 < work.x + work.w;
            client.rect.y = client.rect.y.max(if covers_bar { bar_height } else { screen.y });
            client.border_width = self.config.border_px;
        }

        self.xwrap
            .set_window_border_width(window, self.config.border_px);
        self.xwrap
            .set_window_border_color(window, self.drw.border_pixel(self.schemes.normal));
        if let Some(client) = self.state.clients.get(id) {
            // Propagates the border width even when the size does not
            // change.
            self.xwrap.send_configure_notify(client);
        }
        self.update_window_type(id);
        self.update_size_hints(id);
        self.update_wm_hints(id);

        {
            let monitor_index = self.state.clients.get(id).expect("inserted").monitor;
            let screen = self.state.monitors[monitor_index].screen;
            let client = self.state.clients.get_mut(id).expect("inserted");
            client.rect.x = screen.x + (screen.w - client.total_width()) / 2;
            client.rect.y = screen.y + (screen.h - client.total_height()) / 2;
        }
        self.subscribe_client_events(window);
        self.grab_buttons(id, false);

        let (monitor_index, park_rect, is_floating) = {
            let client = self.state.clients.get_mut(id).expect("inserted");
            if !client.is_floating {
                client.is_floating = transient_leader.is_some() || client.is_fixed();
                client.old_floating = client.is_floating;
            }
            (client.monitor, client.rect, client.is_floating)
        };
        if is_floating {
            self.xwrap.raise_window(window);
        }

        self.state.attach(id);
        self.state.attach_stack(id);
        self.xwrap.append_client_list(window);
        // Some windows require a move before the first real arrange; park
        // them off screen until then.
        self.xwrap.move_resize_window(
            window,
            Rect::new(
                park_rect.x + 2 * self.state.screen_width,
                park_rect.y,
                park_rect.w,
                park_rect.h,
            ),
        );
        self.xwrap.set_client_state(window, NORMAL_STATE);

        if monitor_index == self.state.selected_monitor {
            if let Some(previous) = self.state.selected_monitor().selected {
                self.unfocus(previous, false);
            }
        }
        self.state.monitors[monitor_index].selected = Some(id);
        self.arrange(Some(monitor_index));
        self.xwrap.map_window(window);
        self.focus(None);
    }

    /// Stops managing a client. When the window still exists its border
    /// and `WM_STATE` are restored under a server grab with errors
    /// silenced, since it may vanish at any point in the sequence.
    pub fn unmanage(&mut self, id: ClientId, destroyed: bool) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let (window, old_border_width, monitor) =
            (client.window, client.old_border_width, client.monitor);

        self.state.detach(id);
        self.state.detach_stack(id);
        if !destroyed {
            let _server = self.xwrap.grab_server();
            let _quiet = self.xwrap.silence_errors();
            self.xwrap.set_window_border_width(window, old_border_width);
            self.xwrap.ungrab_buttons(window);
            self.xwrap.set_client_state(window, WITHDRAWN_STATE);
            self.xwrap.sync();
        }
        self.state.clients.remove(id);
        self.focus(None);
        self.update_client_list();
        self.arrange(Some(monitor));
    }

    /// Seeds floating state, tags and monitor from the first matching
    /// rules, then guarantees a non-empty tag set.
    pub fn apply_rules(&mut self, id: ClientId) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let (window, title) = (client.window, client.name.clone());
        let (class, instance) = self.xwrap.get_class_hint(window);

        let mut is_floating = false;
        let mut tags = 0u32;
        let mut monitor = None;
        for rule in &self.config.rules {
            if rule.matches(&class, &instance, &title) {
                is_floating |= rule.is_floating;
                if let Some(tag) = rule.tag {
                    tags |= 1 << tag;
                }
                if let Some(index) = rule.monitor {
                    if index < self.state.monitors.len() {
                        monitor = Some(index);
                    }
                }
            }
        }

        let mask = self.state.tag_mask();
        let monitor_index = monitor
            .unwrap_or_else(|| self.state.clients.get(id).expect("checked above").monitor);
        let fallback_tags = self.state.monitors[monitor_index].current_tags();
        let client = self.state.clients.get_mut(id).expect("checked above");
        client.is_floating = is_floating;
        client.monitor = monitor_index;
        client.tags = if tags & mask != 0 { tags & mask } else { fallback_tags };
    }

    /// Title from `_NET_WM_NAME`, falling back to `WM_NAME`, then to a
    /// fixed marker for broken clients.
    pub fn update_title(&mut self, id: ClientId) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let name = self
            .xwrap
            .get_text_prop(client.window, self.xwrap.atoms.NetWMName)
            .or_else(|| self.xwrap.get_text_prop(client.window, xlib::XA_WM_NAME))
            .unwrap_or_default();
        let client = self.state.clients.get_mut(id).expect("checked above");
        if name.is_empty() {
            client.set_name("broken");
        } else {
            client.set_name(&name);
        }
    }

    /// Re-reads `WM_NORMAL_HINTS`.
    pub fn update_size_hints(&mut self, id: ClientId) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let hints = self.xwrap.get_wm_normal_hints(client.window);
        let client = self.state.clients.get_mut(id).expect("checked above");
        match hints {
            Some(size) => client.hints.update(&size),
            None => client.hints = Default::default(),
        }
    }

    /// Honors `_NET_WM_STATE` fullscreen and the dialog window type.
    pub fn update_window_type(&mut self, id: ClientId) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let window = client.window;
        let state = self.xwrap.get_atom_prop(window, self.xwrap.atoms.NetWMState);
        let window_type = self
            .xwrap
            .get_atom_prop(window, self.xwrap.atoms.NetWMWindowType);
        if state == self.xwrap.atoms.NetWMFullscreen {
            self.set_fullscreen(id, true);
        }
        if window_type == self.xwrap.atoms.NetWMWindowTypeDialog {
            if let Some(client) = self.state.clients.get_mut(id) {
                client.is_floating = true;
            }
        }
    }

    /// Urgency and input model from `WM_HINTS`. Urgency on the selected
    /// client is cleared at the source instead of recorded.
    pub fn update_wm_hints(&mut self, id: ClientId) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let window = client.window;
        let Some(mut hints) = self.xwrap.get_wm_hints(window) else {
            return;
        };
        let selected = self.state.selected_monitor().selected == Some(id);
        if selected && hints.flags & xlib::XUrgencyHint != 0 {
            hints.flags &= !xlib::XUrgencyHint;
            self.xwrap.set_wm_hints(window, &mut hints);
        } else if let Some(client) = self.state.clients.get_mut(id) {
            client.is_urgent = hints.flags & xlib::XUrgencyHint != 0;
        }
        if let Some(client) = self.state.clients.get_mut(id) {
            client.never_focus = if hints.flags & xlib::InputHint != 0 {
                hints.input == 0
            } else {
                false
            };
        }
    }

    /// Records urgency in the model and mirrors it into `WM_HINTS`.
    pub fn set_urgent(&mut self, id: ClientId, urgent: bool) {
        let Some(client) = self.state.clients.get_mut(id) else {
            return;
        };
        client.is_urgent = urgent;
        let window = client.window;
        if let Some(mut hints) = self.xwrap.get_wm_hints(window) {
            hints.flags = if urgent {
                hints.flags | xlib::XUrgencyHint
            } else {
                hints.flags & !xlib::XUrgencyHint
            };
            self.xwrap.set_wm_hints(window, &mut hints);
        }
    }

    /// Fullscreen takes the whole monitor with no border and floats above
    /// the tiling; leaving restores every saved value.
    pub fn set_fullscreen(&mut self, id: ClientId, fullscreen: bool) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        let window = client.window;
        if fullscreen && !client.is_fullscreen {
            self.xwrap.set_net_fullscreen(window, true);
            let screen = self.state.monitors[client.monitor].screen;
            let client = self.state.clients.get_mut(id).expect("checked above");
            client.is_fullscreen = true;
            client.old_floating = client.is_floating;
            client.old_border_width = client.border_width;
            client.border_width = 0;
            client.is_floating = true;
            self.resize_client(id, screen);
            self.xwrap.raise_window(window);
        } else if !fullscreen && client.is_fullscreen {
            self.xwrap.set_net_fullscreen(window, false);
            let client = self.state.clients.get_mut(id).expect("checked above");
            client.is_fullscreen = false;
            client.is_floating = client.old_floating;
            client.border_width = client.old_border_width;
            let restored = client.old_rect;
            client.rect = restored;
            let monitor = client.monitor;
            self.resize_client(id, restored);
            self.arrange(Some(monitor));
        }
    }

    // Event handlers.

    pub(crate) fn on_map_request(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XMapRequestEvent::from(*event);
        let Some(attrs) = self.xwrap.get_window_attrs(ev.window) else {
            return;
        };
        if attrs.override_redirect != 0 {
            return;
        }
        if self.state.window_to_client(ev.window).is_none() {
            self.manage(ev.window, &attrs);
        }
    }

    pub(crate) fn on_destroy_notify(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XDestroyWindowEvent::from(*event);
        if let Some(id) = self.state.window_to_client(ev.window) {
            self.unmanage(id, true);
        }
    }

    /// A synthetic unmap is the ICCCM way for a client to withdraw itself;
    /// only the `WM_STATE` changes. A real unmap unmanages.
    pub(crate) fn on_unmap_notify(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XUnmapEvent::from(*event);
        if let Some(id) = self.state.window_to_client(ev.window) {
            if ev.send_event != 0 {
                if let Some(client) = self.state.clients.get(id) {
                    self.xwrap.set_client_state(client.window, WITHDRAWN_STATE);
                }
            } else {
                self.unmanage(id, false);
            }
        }
    }

    /// Floating and unarranged clients get what they asked for (translated
    /// to monitor coordinates and kept on screen); tiled clients only get
    /// a synthetic `ConfigureNotify` restating our geometry. Unknown
    /// windows pass through verbatim.
    pub(crate) fn on_configure_request(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XConfigureRequestEvent::from(*event);
        if let Some(id) = self.state.window_to_client(ev.window) {
            let floating_layout = !self.config.layouts
                [self.state.selected_monitor().current_layout_index()]
            .arranges();
            let client = self.state.clients.get(id).expect("looked up above");
            if ev.value_mask & c_ulong::from(xlib::CWBorderWidth) != 0 {
                let client = self.state.clients.get_mut(id).expect("looked up above");
                client.border_width = ev.border_width;
            } else if client.is_floating || floating_layout {
                let screen = self.state.monitors[client.monitor].screen;
                let client = self.state.clients.get_mut(id).expect("looked up above");
                if ev.value_mask & c_ulong::from(xlib::CWX) != 0 {
                    client.old_rect.x = client.rect.x;
                    client.rect.x = screen.x + ev.x;
                }
                if ev.value_mask & c_ulong::from(xlib::CWY) != 0 {
                    client.old_rect.y = client.rect.y;
                    client.rect.y = screen.y + ev.y;
                }
                if ev.value_mask & c_ulong::from(xlib::CWWidth) != 0 {
                    client.old_rect.w = client.rect.w;
                    client.rect.w = ev.width;
                }
                if ev.value_mask & c_ulong::from(xlib::CWHeight) != 0 {
                    client.old_rect.h = client.rect.h;
                    client.rect.h = ev.height;
                }
                if client.is_floating {
                    if client.rect.x + client.rect.w > screen.x + screen.w {
                        client.rect.x = screen.x + (screen.w / 2 - client.total_width() / 2);
                    }
                    if client.rect.y + client.rect.h > screen.y + screen.h {
                        client.rect.y = screen.y + (screen.h / 2 - client.total_height() / 2);
                    }
                }
                let moved_only = ev.value_mask
                    & (c_ulong::from(xlib::CWX) | c_ulong::from(xlib::CWY))
                    != 0
                    && ev.value_mask
                        & (c_ulong::from(xlib::CWWidth) | c_ulong::from(xlib::CWHeight))
                        == 0;
                if moved_only {
                    if let Some(client) = self.state.clients.get(id) {
                        self.xwrap.send_configure_notify(client);
                    }
                }
                if self.state.is_visible(id) {
                    if let Some(client) = self.state.clients.get(id) {
                        self.xwrap.move_resize_window(client.window, client.rect);
                    }
                }
            } else {
                self.xwrap.send_configure_notify(client);
            }
        } else {
            let mut changes = xlib::XWindowChanges {
                x: ev.x,
                y: ev.y,
                width: ev.width,
                height: ev.height,
                border_width: ev.border_width,
                sibling: ev.above,
                stack_mode: ev.detail,
            };
            self.xwrap
                .configure_window_raw(ev.window, ev.value_mask, &mut changes);
        }
        self.xwrap.sync();
    }

    /// The root geometry changed: re-read screens, resize the draw
    /// surface, re-home bars and fullscreen clients, re-arrange the
    /// world.
    pub(crate) fn on_configure_notify(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XConfigureEvent::from(*event);
        if ev.window != self.xwrap.root() {
            return;
        }
        let size_changed =
            self.state.screen_width != ev.width || self.state.screen_height != ev.height;
        self.state.screen_width = ev.width;
        self.state.screen_height = ev.height;
        if self.update_geometry() || size_changed {
            self.drw
                .resize(ev.width as u32, self.state.bar_height as u32);
            self.update_bars();
            for monitor in 0..self.state.monitors.len() {
                let fullscreen: Vec<ClientId> = self.state.monitors[monitor]
                    .clients
                    .iter()
                    .copied()
                    .filter(|&id| {
                        self.state.clients.get(id).is_some_and(|c| c.is_fullscreen)
                    })
                    .collect();
                let screen = self.state.monitors[monitor].screen;
                for id in fullscreen {
                    self.resize_client(id, screen);
                }
                let bar_rect = Rect::new(
                    self.state.monitors[monitor].work.x,
                    self.state.monitors[monitor].bar_y,
                    self.state.monitors[monitor].work.w,
                    self.state.bar_height,
                );
                self.xwrap
                    .move_resize_window(self.state.monitors[monitor].bar_window, bar_rect);
            }
            self.focus(None);
            self.arrange(None);
        }
    }
}
