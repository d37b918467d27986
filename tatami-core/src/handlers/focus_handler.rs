//! Focus and stacking: who holds the input focus and how the X stack is
//! ordered.
use crate::models::{ClientId, Rect};
use crate::Manager;
use x11_dl::xlib;

impl Manager {
    /// Focuses a client, or the first visible client on the focus stack
    /// when none (or a hidden one) is given. Handles unfocusing the
    /// previous client, monitor switching, urgency clearing, stack
    /// promotion, border colors and the X-side focus handshake.
    pub fn focus(&mut self, client: Option<ClientId>) {
        let mut target = client.filter(|&id| self.state.is_visible(id));
        if target.is_none() {
            target = self.state.first_visible_in_stack(self.state.selected_monitor);
        }

        let previous = self.state.selected_monitor().selected;
        if previous.is_some() && previous != target {
            self.unfocus(previous.expect("checked above"), false);
        }

        if let Some(id) = target {
            let (monitor, urgent) = {
                let client = self.state.clients.get(id).expect("focus target exists");
                (client.monitor, client.is_urgent)
            };
            if monitor != self.state.selected_monitor {
                self.state.selected_monitor = monitor;
            }
            if urgent {
                self.set_urgent(id, false);
            }
            // Promote to the head of the focus stack.
            self.state.detach_stack(id);
            self.state.attach_stack(id);
            self.grab_buttons(id, true);
            if let Some(client) = self.state.clients.get(id) {
                self.xwrap.set_window_border_color(
                    client.window,
                    self.drw.border_pixel(self.schemes.selected),
                );
            }
            self.set_focus(id);
        } else {
            self.xwrap.focus_nothing();
        }
        self.state.selected_monitor_mut().selected = target;
        self.draw_bars();
    }

    /// Takes focus away from a client: normal border, synchronous button
    /// grab so its next click reaches us, optionally reverting the input
    /// focus to the root.
    pub fn unfocus(&mut self, id: ClientId, revert_input_focus: bool) {
        self.grab_buttons(id, false);
        if let Some(client) = self.state.clients.get(id) {
            self.xwrap.set_window_border_color(
                client.window,
                self.drw.border_pixel(self.schemes.normal),
            );
        }
        if revert_input_focus {
            self.xwrap.focus_nothing();
        }
    }

    /// The X side of focusing: input focus (unless the client refuses it),
    /// `_NET_ACTIVE_WINDOW` and the `WM_TAKE_FOCUS` handshake.
    pub fn set_focus(&mut self, id: ClientId) {
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        if !client.never_focus {
            self.xwrap.set_input_focus(client.window);
            self.xwrap.set_active_window(client.window);
        }
        self.xwrap
            .send_protocol_event(client.window, self.xwrap.atoms.WMTakeFocus);
    }

    /// Orders the X stack: a floating (or unarranged) selected client on
    /// top, tiled clients below the bar in focus-stack order. The
    /// EnterNotify burst this produces is drained so it cannot steal
    /// focus.
    pub fn restack(&mut self, monitor: usize) {
        self.draw_bar(monitor);
        let Some(selected) = self.state.monitors[monitor].selected else {
            return;
        };

        let layout_arranges = self.config.layouts
            [self.state.monitors[monitor].current_layout_index()]
        .arranges();
        if let Some(client) = self.state.clients.get(selected) {
            if client.is_floating || !layout_arranges {
                self.xwrap.raise_window(client.window);
            }
        }
        if layout_arranges {
            let mut sibling = self.state.monitors[monitor].bar_window;
            let stack = self.state.monitors[monitor].stack.clone();
            for id in stack {
                let Some(client) = self.state.clients.get(id) else {
                    continue;
                };
                if !client.is_floating && self.state.is_visible(id) {
                    self.xwrap.stack_window_below(client.window, sibling);
                    sibling = client.window;
                }
            }
        }
        self.xwrap.sync();
        self.xwrap.drain_events(xlib::EnterWindowMask);
    }

    /// Sloppy focus: entering a window focuses it, and crossing onto
    /// another monitor switches the selection there.
    pub(crate) fn on_enter_notify(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XCrossingEvent::from(*event);
        if (ev.mode != xlib::NotifyNormal || ev.detail == xlib::NotifyInferior)
            && ev.window != self.xwrap.root()
        {
            return;
        }
        let client = self.state.window_to_client(ev.window);
        let monitor = client
            .and_then(|id| self.state.clients.get(id).map(|c| c.monitor))
            .unwrap_or_else(|| self.window_to_monitor(ev.window));
        if monitor != self.state.selected_monitor {
            if let Some(selected) = self.state.selected_monitor().selected {
                self.unfocus(selected, true);
            }
            self.state.selected_monitor = monitor;
        } else if client.is_none() || client == self.state.selected_monitor().selected {
            return;
        }
        self.focus(client);
    }

    /// Some clients grab focus on their own; push it back where it
    /// belongs.
    pub(crate) fn on_focus_in(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XFocusChangeEvent::from(*event);
        if let Some(selected) = self.state.selected_monitor().selected {
            let window = self.state.clients.get(selected).map(|c| c.window);
            if window != Some(ev.window) {
                self.set_focus(selected);
            }
        }
    }

    /// Pointer motion over the root: switch monitors when it crosses a
    /// boundary.
    pub(crate) fn on_motion_notify(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XMotionEvent::from(*event);
        if ev.window != self.xwrap.root() {
            return;
        }
        let monitor = self
            .state
            .rect_to_monitor(Rect::new(ev.x_root, ev.y_root, 1, 1));
        if Some(monitor) != self.motion_monitor && self.motion_monitor.is_some() {
            if let Some(selected) = self.state.selected_monitor().selected {
                self.unfocus(selected, true);
            }
            self.state.selected_monitor = monitor;
            self.focus(None);
        }
        self.motion_monitor = Some(monitor);
    }
}
