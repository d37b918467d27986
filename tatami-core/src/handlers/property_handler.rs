//! Property and client-message events: the channels clients use to talk
//! to us after mapping.
use crate::Manager;
use x11_dl::xlib;

impl Manager {
    /// Routes property updates: the root window name feeds the status
    /// text; client properties update title, size hints, urgency, window
    /// type, and a transient-for change can force floating.
    pub(crate) fn on_property_notify(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XPropertyEvent::from(*event);
        if ev.window == self.xwrap.root() && ev.atom == xlib::XA_WM_NAME {
            self.update_status();
            return;
        }
        if ev.state == xlib::PropertyDelete {
            return;
        }
        let Some(id) = self.state.window_to_client(ev.window) else {
            return;
        };

        match ev.atom {
            atom if atom == xlib::XA_WM_TRANSIENT_FOR => {
                let is_floating = self
                    .state
                    .clients
                    .get(id)
                    .is_some_and(|c| c.is_floating);
                if !is_floating {
                    let leader_is_managed = self
                        .xwrap
                        .get_transient_for(ev.window)
                        .and_then(|leader| self.state.window_to_client(leader))
                        .is_some();
                    if leader_is_managed {
                        let monitor = {
                            let client =
                                self.state.clients.get_mut(id).expect("looked up above");
                            client.is_floating = true;
                            client.monitor
                        };
                        self.arrange(Some(monitor));
                    }
                }
            }
            atom if atom == xlib::XA_WM_NORMAL_HINTS => self.update_size_hints(id),
            atom if atom == xlib::XA_WM_HINTS => {
                self.update_wm_hints(id);
                self.draw_bars();
            }
            _ => {}
        }

        if ev.atom == xlib::XA_WM_NAME || ev.atom == self.xwrap.atoms.NetWMName {
            self.update_title(id);
            let monitor = self.state.clients.get(id).map(|c| c.monitor);
            if let Some(monitor) = monitor {
                if self.state.monitors[monitor].selected == Some(id) {
                    self.draw_bar(monitor);
                }
            }
        }
        if ev.atom == self.xwrap.atoms.NetWMWindowType {
            self.update_window_type(id);
        }
    }

    /// Honors `_NET_WM_STATE` fullscreen requests and turns
    /// `_NET_ACTIVE_WINDOW` requests from unselected clients into an
    /// urgency mark.
    pub(crate) fn on_client_message(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XClientMessageEvent::from(*event);
        let Some(id) = self.state.window_to_client(ev.window) else {
            return;
        };

        if ev.message_type == self.xwrap.atoms.NetWMState {
            let first = ev.data.get_long(1) as xlib::Atom;
            let second = ev.data.get_long(2) as xlib::Atom;
            if first == self.xwrap.atoms.NetWMFullscreen
                || second == self.xwrap.atoms.NetWMFullscreen
            {
                const NET_WM_STATE_ADD: i64 = 1;
                const NET_WM_STATE_TOGGLE: i64 = 2;
                let action = i64::from(ev.data.get_long(0));
                let is_fullscreen = self
                    .state
                    .clients
                    .get(id)
                    .is_some_and(|c| c.is_fullscreen);
                let fullscreen = action == NET_WM_STATE_ADD
                    || (action == NET_WM_STATE_TOGGLE && !is_fullscreen);
                self.set_fullscreen(id, fullscreen);
            }
        } else if ev.message_type == self.xwrap.atoms.NetActiveWindow {
            let client = self.state.clients.get(id);
            let selected = self.state.selected_monitor().selected == Some(id);
            if !selected && client.is_some_and(|c| !c.is_urgent) {
                self.set_urgent(id, true);
            }
        }
    }
}
