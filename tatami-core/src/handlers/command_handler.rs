//! Executes user commands, whether they arrive from a key, a button or
//! the drag handlers. Commands validate their own preconditions and turn
//! into silent no-ops when they do not apply.
use crate::command::Command;
use crate::models::ClientId;
use crate::utils::child_process;
use crate::utils::xkeysym_lookup::clean_mask;
use crate::Manager;
use x11_dl::xlib;

impl Manager {
    #[allow(clippy::too_many_lines)]
    pub fn run_command(&mut self, command: &Command) {
        match command {
            Command::ViewTag(index) => {
                if self.state.view_tag(*index) {
                    self.focus(None);
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::ViewAll => {
                if self.state.view_all() {
                    self.focus(None);
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::ViewPrevious => {
                if self.state.view_previous() {
                    self.focus(None);
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::ToggleViewTag(index) => {
                if self.state.toggle_view_tag(*index) {
                    self.focus(None);
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::MoveToTag(index) => {
                if self.state.move_selected_to_tag(*index) {
                    self.focus(None);
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::ToggleClientTag(index) => {
                if self.state.toggle_selected_tag(*index) {
                    self.focus(None);
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::FocusStack(direction) => self.focus_stack(*direction),
            Command::FocusMonitor(direction) => self.focus_monitor(*direction),
            Command::MoveToMonitor(direction) => {
                if self.state.monitors.len() < 2 {
                    return;
                }
                if let Some(id) = self.state.selected_client() {
                    let target = self.state.direction_to_monitor(*direction);
                    self.send_to_monitor(id, target);
                }
            }
            Command::Zoom => self.zoom(),
            Command::SetMasterFactor(factor) => {
                let arranges = self.config.layouts
                    [self.state.selected_monitor().current_layout_index()]
                .arranges();
                if arranges && self.state.set_master_factor(*factor) {
                    self.arrange(Some(self.state.selected_monitor));
                }
            }
            Command::IncMasterCount(delta) => {
                self.state.change_masters_count(*delta);
                self.arrange(Some(self.state.selected_monitor));
            }
            Command::SetLayout(kind) => {
                let Some(index) = self.config.layouts.iter().position(|l| l == kind) else {
                    return;
                };
                if index == self.state.selected_monitor().current_layout_index() {
                    return;
                }
                let monitor = self.state.selected_monitor_mut();
                monitor.set_layout(index);
                monitor.layout_symbol = kind.symbol().to_string();
                if self.state.selected_client().is_some() {
                    self.arrange(Some(self.state.selected_monitor));
                } else {
                    self.draw_bar(self.state.selected_monitor);
                }
            }
            Command::ToggleFloating => self.toggle_floating(),
            Command::ToggleBar => self.toggle_bar(),
            Command::ChangeGap(delta) => {
                self.state.change_gap(*delta);
                self.arrange(Some(self.state.selected_monitor));
            }
            Command::CloseClient => {
                let Some(id) = self.state.selected_client() else {
                    return;
                };
                let Some(window) = self.state.clients.get(id).map(|c| c.window) else {
                    return;
                };
                // Polite first; the hammer only for clients that do not
                // speak WM_DELETE_WINDOW.
                if !self
                    .xwrap
                    .send_protocol_event(window, self.xwrap.atoms.WMDelete)
                {
                    self.xwrap.kill_client(window);
                }
            }
            Command::MoveMouse => self.move_mouse(),
            Command::ResizeMouse => self.resize_mouse(),
            Command::Execute(command_line) => {
                let monitor = self.state.selected_monitor().num.to_string();
                let command_line = command_line.replace("{monitor}", &monitor);
                child_process::exec_shell(&command_line, &mut self.children);
            }
            Command::Quit => self.state.running = false,
        }
    }

    /// Moves focus to the next/previous visible client in insertion
    /// order, wrapping. Refused while a fullscreen client is focused and
    /// the lock is on.
    fn focus_stack(&mut self, direction: i32) {
        let Some(selected) = self.state.selected_client() else {
            return;
        };
        let locked = self.config.lock_fullscreen
            && self
                .state
                .clients
                .get(selected)
                .is_some_and(|c| c.is_fullscreen);
        if locked {
            return;
        }
        if let Some(next) = self.state.focus_candidate(direction) {
            self.focus(Some(next));
            self.restack(self.state.selected_monitor);
        }
    }

    fn focus_monitor(&mut self, direction: i32) {
        if self.state.monitors.len() < 2 {
            return;
        }
        let target = self.state.direction_to_monitor(direction);
        if target == self.state.selected_monitor {
            return;
        }
        if let Some(selected) = self.state.selected_client() {
            self.unfocus(selected, false);
        }
        self.state.selected_monitor = target;
        self.focus(None);
    }

    /// Re-homes a client to another monitor, focusing whatever takes its
    /// place.
    pub fn send_to_monitor(&mut self, id: ClientId, target: usize) {
        let Some(current) = self.state.clients.get(id).map(|c| c.monitor) else {
            return;
        };
        if current == target {
            return;
        }
        self.unfocus(id, true);
        self.state.move_client_to_monitor(id, target);
        self.focus(None);
        self.arrange(None);
    }

    /// Swaps the selected client with the master, or the master with the
    /// next tiled client. Meaningless for floating clients and layouts
    /// that do not arrange.
    fn zoom(&mut self) {
        let monitor = self.state.selected_monitor;
        let arranges =
            self.config.layouts[self.state.monitors[monitor].current_layout_index()].arranges();
        let selected = self.state.selected_client();
        let floating = selected
            .and_then(|id| self.state.clients.get(id))
            .is_some_and(|c| c.is_floating);
        if !arranges || floating {
            return;
        }

        let tiled = self.state.tiled_clients(monitor);
        let target = match selected {
            Some(id) if tiled.first() == Some(&id) => {
                let Some(&next) = tiled.get(1) else {
                    return;
                };
                next
            }
            Some(id) => id,
            None => return,
        };
        // Promote to the master position.
        self.state.detach(target);
        self.state.attach(target);
        self.focus(Some(target));
        self.arrange(Some(monitor));
    }

    fn toggle_floating(&mut self) {
        let Some(id) = self.state.selected_client() else {
            return;
        };
        let Some(client) = self.state.clients.get(id) else {
            return;
        };
        if client.is_fullscreen {
            return;
        }
        let rect = {
            let client = self.state.clients.get_mut(id).expect("checked above");
            client.is_floating = !client.is_floating || client.is_fixed();
            client.is_floating.then_some(client.rect)
        };
        if let Some(rect) = rect {
            self.resize(id, rect, false);
        }
        self.arrange(Some(self.state.selected_monitor));
    }

    fn toggle_bar(&mut self) {
        let bar_height = self.state.bar_height;
        let monitor = self.state.selected_monitor_mut();
        monitor.show_bar = !monitor.show_bar;
        monitor.update_bar_position(bar_height);
        let bar_rect = crate::models::Rect::new(
            monitor.work.x,
            monitor.bar_y,
            monitor.work.w,
            bar_height,
        );
        let bar_window = monitor.bar_window;
        self.xwrap.move_resize_window(bar_window, bar_rect);
        self.arrange(Some(self.state.selected_monitor));
    }

    /// Key events resolve through the binding table with lock modifiers
    /// stripped from both sides.
    pub(crate) fn on_key_press(&mut self, event: &xlib::XEvent) {
        let ev = xlib::XKeyEvent::from(*event);
        let keysym = self.xwrap.keycode_to_keysym(ev.keycode);
        let numlock = self.state.numlock_mask;
        let commands: Vec<Command> = self
            .keybinds
            .iter()
            .filter(|bind| {
                bind.keysym == keysym
                    && clean_mask(bind.mod_mask, numlock) == clean_mask(ev.state, numlock)
            })
            .map(|bind| bind.command.clone())
            .collect();
        for command in commands {
            self.run_command(&command);
        }
    }
}
