//! Button clicks and the modal move/resize pointer drags.
use crate::bar::{self, BarClick};
use crate::command::Command;
use crate::config::ClickTarget;
use crate::models::Rect;
use crate::utils::xkeysym_lookup::clean_mask;
use crate::xwrap::MOUSEMASK;
use crate::Manager;
use x11_dl::xlib;

/// Motion events inside this window are dropped, capping drags at ~150 Hz.
const MOTION_INTERVAL_MS: xlib::Time = 1000 / 150;

impl Manager {
    /// Identifies what was clicked (bar segment, client, root), moves the
    /// selection there, then fires every matching button binding. Clicks
    /// on tag cells carry the clicked tag into the bound command.
    pub(crate) fn on_button_press(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XButtonEvent::from(*event);
        let mut click = ClickTarget::RootWin;
        let mut clicked_tag = None;

        let monitor = self.window_to_monitor(ev.window);
        if monitor != self.state.selected_monitor {
            if let Some(selected) = self.state.selected_monitor().selected {
                self.unfocus(selected, true);
            }
            self.state.selected_monitor = monitor;
            self.focus(None);
        }

        if ev.window == self.state.selected_monitor().bar_window {
            let lrpad = self.drw.font_height();
            let tag_widths: Vec<u32> = self
                .config
                .tags
                .iter()
                .map(|tag| self.drw.text_width(tag) + lrpad)
                .collect();
            let monitor = self.state.selected_monitor();
            let layout_width = self.drw.text_width(&monitor.layout_symbol) + lrpad;
            let status_width = self.drw.text_width(&self.state.status_text) + lrpad;
            click = match bar::resolve_click(
                &tag_widths,
                layout_width,
                status_width,
                monitor.work.w,
                ev.x,
            ) {
                BarClick::Tag(index) => {
                    clicked_tag = Some(index);
                    ClickTarget::TagBar
                }
                BarClick::LayoutSymbol => ClickTarget::LayoutSymbol,
                BarClick::Status => ClickTarget::StatusText,
                BarClick::Title => ClickTarget::WinTitle,
            };
        } else if let Some(id) = self.state.window_to_client(ev.window) {
            self.focus(Some(id));
            self.restack(self.state.selected_monitor);
            self.xwrap.replay_pointer();
            click = ClickTarget::ClientWin;
        }

        let numlock = self.state.numlock_mask;
        let commands: Vec<Command> = self
            .mousebinds
            .iter()
            .filter(|bind| {
                bind.target == click
                    && bind.button == ev.button
                    && clean_mask(bind.mod_mask, numlock) == clean_mask(ev.state, numlock)
            })
            .map(|bind| match (clicked_tag, &bind.command) {
                (Some(tag), Command::ViewTag(_)) => Command::ViewTag(tag),
                (Some(tag), Command::ToggleViewTag(_)) => Command::ToggleViewTag(tag),
                (Some(tag), Command::MoveToTag(_)) => Command::MoveToTag(tag),
                (Some(tag), Command::ToggleClientTag(_)) => Command::ToggleClientTag(tag),
                (_, command) => command.clone(),
            })
            .collect();
        for command in commands {
            self.run_command(&command);
        }
    }

    /// Modal move drag: motion is throttled, edges snap to the work area,
    /// and dragging a tiled client past the snap threshold floats it. The
    /// client re-homes to the monitor under it on release.
    pub(crate) fn move_mouse(&mut self) {
        let Some(id) = self.state.selected_client() else {
            return;
        };
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        // No moving fullscreen windows by mouse.
        if client.is_fullscreen {
            return;
        }
        let original = client.rect;
        self.restack(self.state.selected_monitor);
        if !self.xwrap.grab_pointer(self.xwrap.cursors.move_) {
            return;
        }
        let Some((start_x, start_y)) = self.xwrap.get_root_pointer() else {
            self.xwrap.ungrab_pointer();
            return;
        };

        let snap = self.config.snap;
        let mut last_time: xlib::Time = 0;
        loop {
            let event = self
                .xwrap
                .mask_event(MOUSEMASK | xlib::ExposureMask | xlib::SubstructureRedirectMask);
            match event.get_type() {
                xlib::ConfigureRequest | xlib::Expose | xlib::MapRequest => {
                    self.dispatch(&event);
                }
                xlib::MotionNotify => {
                    let ev = xlib::XMotionEvent::from(event);
                    if ev.time - last_time <= MOTION_INTERVAL_MS {
                        continue;
                    }
                    last_time = ev.time;

                    let Some(client) = self.state.clients.get(id) else {
                        break;
                    };
                    let (rect, total_w, total_h, is_floating) = (
                        client.rect,
                        client.total_width(),
                        client.total_height(),
                        client.is_floating,
                    );
                    let work = self.state.selected_monitor().work;
                    let mut nx = original.x + (ev.x - start_x);
                    let mut ny = original.y + (ev.y - start_y);
                    if (work.x - nx).abs() < snap {
                        nx = work.x;
                    } else if ((work.x + work.w) - (nx + total_w)).abs() < snap {
                        nx = work.x + work.w - total_w;
                    }
                    if (work.y - ny).abs() < snap {
                        ny = work.y;
                    } else if ((work.y + work.h) - (ny + total_h)).abs() < snap {
                        ny = work.y + work.h - total_h;
                    }

                    let arranges = self.config.layouts
                        [self.state.selected_monitor().current_layout_index()]
                    .arranges();
                    if !is_floating
                        && arranges
                        && ((nx - rect.x).abs() > snap || (ny - rect.y).abs() > snap)
                    {
                        self.run_command(&Command::ToggleFloating);
                    }
                    let floating_now = self
                        .state
                        .clients
                        .get(id)
                        .is_some_and(|c| c.is_floating);
                    if !arranges || floating_now {
                        self.resize(id, Rect::new(nx, ny, rect.w, rect.h), true);
                    }
                }
                xlib::ButtonRelease => break,
                _ => {}
            }
        }
        self.xwrap.ungrab_pointer();
        self.rehome_after_drag(id);
    }

    /// Modal resize drag, anchored at the top-left corner with the pointer
    /// warped to the bottom-right.
    pub(crate) fn resize_mouse(&mut self) {
        let Some(id) = self.state.selected_client() else {
            return;
        };
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        // No resizing fullscreen windows by mouse.
        if client.is_fullscreen {
            return;
        }
        let (window, original, border_width) =
            (client.window, client.rect, client.border_width);
        self.restack(self.state.selected_monitor);
        if !self.xwrap.grab_pointer(self.xwrap.cursors.resize) {
            return;
        }
        self.xwrap.warp_pointer(
            window,
            original.w + border_width - 1,
            original.h + border_width - 1,
        );

        let snap = self.config.snap;
        let mut last_time: xlib::Time = 0;
        loop {
            let event = self
                .xwrap
                .mask_event(MOUSEMASK | xlib::ExposureMask | xlib::SubstructureRedirectMask);
            match event.get_type() {
                xlib::ConfigureRequest | xlib::Expose | xlib::MapRequest => {
                    self.dispatch(&event);
                }
                xlib::MotionNotify => {
                    let ev = xlib::XMotionEvent::from(event);
                    if ev.time - last_time <= MOTION_INTERVAL_MS {
                        continue;
                    }
                    last_time = ev.time;

                    let Some(client) = self.state.clients.get(id) else {
                        break;
                    };
                    let (rect, is_floating, monitor_index) =
                        (client.rect, client.is_floating, client.monitor);
                    let nw = (ev.x - original.x - 2 * border_width + 1).max(1);
                    let nh = (ev.y - original.y - 2 * border_width + 1).max(1);

                    let client_work = self.state.monitors[monitor_index].work;
                    let work = self.state.selected_monitor().work;
                    let inside = client_work.x + nw >= work.x
                        && client_work.x + nw <= work.x + work.w
                        && client_work.y + nh >= work.y
                        && client_work.y + nh <= work.y + work.h;
                    let arranges = self.config.layouts
                        [self.state.selected_monitor().current_layout_index()]
                    .arranges();
                    if inside
                        && !is_floating
                        && arranges
                        && ((nw - rect.w).abs() > snap || (nh - rect.h).abs() > snap)
                    {
                        self.run_command(&Command::ToggleFloating);
                    }
                    let floating_now = self
                        .state
                        .clients
                        .get(id)
                        .is_some_and(|c| c.is_floating);
                    if !arranges || floating_now {
                        self.resize(id, Rect::new(rect.x, rect.y, nw, nh), true);
                    }
                }
                xlib::ButtonRelease => break,
                _ => {}
            }
        }
        if let Some(client) = self.state.clients.get(id) {
            self.xwrap.warp_pointer(
                client.window,
                client.rect.w + client.border_width - 1,
                client.rect.h + client.border_width - 1,
            );
        }
        self.xwrap.ungrab_pointer();
        self.xwrap.drain_events(xlib::EnterWindowMask);
        self.rehome_after_drag(id);
    }

    /// After a drag, the monitor under the client's final rectangle
    /// becomes its home and the selection follows.
    fn rehome_after_drag(&mut self, id: crate::models::ClientId) {
        let Some(rect) = self.state.clients.get(id).map(|c| c.rect) else {
            return;
        };
        let target = self.state.rect_to_monitor(rect);
        if target != self.state.selected_monitor {
            self.send_to_monitor(id, target);
            self.state.selected_monitor = target;
            self.focus(None);
        }
    }
}
