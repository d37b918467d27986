//! The blocking event loop and its O(1) dispatch table, indexed by X event
//! type.
use crate::Manager;
use std::sync::atomic::Ordering;
use x11_dl::xlib;

type Handler = fn(&mut Manager, &xlib::XEvent);

/// `LASTEvent` from X.h.
const LAST_EVENT: usize = 36;

static HANDLERS: [Option<Handler>; LAST_EVENT] = {
    let mut table: [Option<Handler>; LAST_EVENT] = [None; LAST_EVENT];
    table[xlib::ButtonPress as usize] = Some(Manager::on_button_press);
    table[xlib::ClientMessage as usize] = Some(Manager::on_client_message);
    table[xlib::ConfigureRequest as usize] = Some(Manager::on_configure_request);
    table[xlib::ConfigureNotify as usize] = Some(Manager::on_configure_notify);
    table[xlib::DestroyNotify as usize] = Some(Manager::on_destroy_notify);
    table[xlib::EnterNotify as usize] = Some(Manager::on_enter_notify);
    table[xlib::Expose as usize] = Some(Manager::on_expose);
    table[xlib::FocusIn as usize] = Some(Manager::on_focus_in);
    table[xlib::KeyPress as usize] = Some(Manager::on_key_press);
    table[xlib::MappingNotify as usize] = Some(Manager::on_mapping_notify);
    table[xlib::MapRequest as usize] = Some(Manager::on_map_request);
    table[xlib::MotionNotify as usize] = Some(Manager::on_motion_notify);
    table[xlib::PropertyNotify as usize] = Some(Manager::on_property_notify);
    table[xlib::UnmapNotify as usize] = Some(Manager::on_unmap_notify);
    table
};

impl Manager {
    /// Blocks on the X connection and dispatches until `quit` clears the
    /// running flag.
    pub fn run(&mut self) {
        self.state.running = true;
        self.xwrap.sync();
        while self.state.running {
            let event = self.xwrap.next_event();
            self.dispatch(&event);
            if self.child_flag.swap(false, Ordering::SeqCst) {
                self.children.remove_finished_children();
            }
        }
    }

    /// Routes one event through the dispatch table. Also used by the
    /// mouse-drag sub-loops for the event types they service.
    pub(crate) fn dispatch(&mut self, event: &xlib::XEvent) {
        let event_type = event.get_type() as usize;
        if let Some(handler) = HANDLERS.get(event_type).copied().flatten() {
            handler(self, event);
        }
    }

    /// Bars redraw once the last exposure of a series has arrived.
    pub(crate) fn on_expose(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XExposeEvent::from(*event);
        if ev.count != 0 {
            return;
        }
        if let Some(index) = self
            .state
            .monitors
            .iter()
            .position(|m| m.bar_window == ev.window)
        {
            self.draw_bar(index);
        }
    }

    /// Keyboard mapping changed: reload it and re-grab our bindings.
    pub(crate) fn on_mapping_notify(&mut self, event: &xlib::XEvent) {
        let mut ev = xlib::XMappingEvent::from(*event);
        self.xwrap.refresh_keyboard_mapping(&mut ev);
        if ev.request == xlib::MappingKeyboard {
            self.grab_keys();
        }
    }
}
