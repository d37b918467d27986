//! Xlib calls related to a window.
use crate::models::{Client, Rect};
use crate::XWrap;
use std::os::raw::{c_long, c_uint, c_ulong};
use x11_dl::xlib;

impl XWrap {
    /// Selects the events we want from a window.
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    pub fn subscribe_to_event(&self, window: xlib::Window, mask: c_long) {
        unsafe {
            (self.xlib.XSelectInput)(self.display, window, mask);
        }
    }

    /// Moves and resizes a window in one request.
    // `XMoveResizeWindow`: https://tronche.com/gui/x/xlib/window/XMoveResizeWindow.html
    pub fn move_resize_window(&self, window: xlib::Window, rect: Rect) {
        unsafe {
            (self.xlib.XMoveResizeWindow)(
                self.display,
                window,
                rect.x,
                rect.y,
                rect.w as c_uint,
                rect.h as c_uint,
            );
        }
    }

    /// Moves a window without touching its size.
    // `XMoveWindow`: https://tronche.com/gui/x/xlib/window/XMoveWindow.html
    pub fn move_window(&self, window: xlib::Window, x: i32, y: i32) {
        unsafe {
            (self.xlib.XMoveWindow)(self.display, window, x, y);
        }
    }

    /// Applies a geometry plus border width through `XConfigureWindow`.
    // `XConfigureWindow`: https://tronche.com/gui/x/xlib/window/XConfigureWindow.html
    pub fn configure_window_geometry(&self, window: xlib::Window, rect: Rect, border_width: i32) {
        let mut changes = xlib::XWindowChanges {
            x: rect.x,
            y: rect.y,
            width: rect.w,
            height: rect.h,
            border_width,
            sibling: 0,
            stack_mode: 0,
        };
        let mask = xlib::CWX | xlib::CWY | xlib::CWWidth | xlib::CWHeight | xlib::CWBorderWidth;
        unsafe {
            (self.xlib.XConfigureWindow)(
                self.display,
                window,
                c_uint::from(mask),
                &mut changes,
            );
        }
    }

    /// Sets only the border width of a window.
    pub fn set_window_border_width(&self, window: xlib::Window, border_width: i32) {
        let mut changes = xlib::XWindowChanges {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            border_width,
            sibling: 0,
            stack_mode: 0,
        };
        unsafe {
            (self.xlib.XConfigureWindow)(
                self.display,
                window,
                c_uint::from(xlib::CWBorderWidth),
                &mut changes,
            );
        }
    }

    /// Passes an unmanaged window's configure request through verbatim.
    pub fn configure_window_raw(
        &self,
        window: xlib::Window,
        value_mask: c_ulong,
        changes: &mut xlib::XWindowChanges,
    ) {
        unsafe {
            (self.xlib.XConfigureWindow)(self.display, window, value_mask as c_uint, changes);
        }
    }

    /// Stacks a window directly below a sibling.
    pub fn stack_window_below(&self, window: xlib::Window, sibling: xlib::Window) {
        let mut changes = xlib::XWindowChanges {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            border_width: 0,
            sibling,
            stack_mode: xlib::Below,
        };
        let mask = xlib::CWSibling | xlib::CWStackMode;
        unsafe {
            (self.xlib.XConfigureWindow)(self.display, window, c_uint::from(mask), &mut changes);
        }
    }

    /// Tells a client where the window manager put it, whether or not the
    /// geometry changed. ICCCM wants the synthetic `ConfigureNotify`.
    // `XSendEvent`: https://tronche.com/gui/x/xlib/event-handling/XSendEvent.html
    pub fn send_configure_notify(&self, client: &Client) {
        let mut event: xlib::XConfigureEvent = unsafe { std::mem::zeroed() };
        event.type_ = xlib::ConfigureNotify;
        event.display = self.display;
        event.event = client.window;
        event.window = client.window;
        event.x = client.rect.x;
        event.y = client.rect.y;
        event.width = client.rect.w;
        event.height = client.rect.h;
        event.border_width = client.border_width;
        event.above = 0;
        event.override_redirect = xlib::False;
        let mut xevent: xlib::XEvent = event.into();
        self.send_xevent(client.window, xlib::False, xlib::StructureNotifyMask, &mut xevent);
    }

    // `XMapWindow`: https://tronche.com/gui/x/xlib/window/XMapWindow.html
    pub fn map_window(&self, window: xlib::Window) {
        unsafe {
            (self.xlib.XMapWindow)(self.display, window);
        }
    }

    // `XUnmapWindow`: https://tronche.com/gui/x/xlib/window/XUnmapWindow.html
    pub fn unmap_window(&self, window: xlib::Window) {
        unsafe {
            (self.xlib.XUnmapWindow)(self.display, window);
        }
    }

    // `XRaiseWindow`: https://tronche.com/gui/x/xlib/window/XRaiseWindow.html
    pub fn raise_window(&self, window: xlib::Window) {
        unsafe {
            (self.xlib.XRaiseWindow)(self.display, window);
        }
    }

    // `XDestroyWindow`: https://tronche.com/gui/x/xlib/window/XDestroyWindow.html
    pub fn destroy_window(&self, window: xlib::Window) {
        unsafe {
            (self.xlib.XDestroyWindow)(self.display, window);
        }
    }

    /// Gives a window the input focus.
    // `XSetInputFocus`: https://tronche.com/gui/x/xlib/input/XSetInputFocus.html
    pub fn set_input_focus(&self, window: xlib::Window) {
        unsafe {
            (self.xlib.XSetInputFocus)(
                self.display,
                window,
                xlib::RevertToPointerRoot,
                xlib::CurrentTime,
            );
        }
    }

    /// Reverts the input focus to `PointerRoot` and clears
    /// `_NET_ACTIVE_WINDOW`; the "nothing is focused" state.
    pub fn focus_nothing(&self) {
        unsafe {
            (self.xlib.XSetInputFocus)(
                self.display,
                xlib::PointerRoot as xlib::Window,
                xlib::RevertToPointerRoot,
                xlib::CurrentTime,
            );
        }
        self.delete_property(self.root, self.atoms.NetActiveWindow);
    }

    /// Force-kills the client owning a window. Used only after it ignored
    /// `WM_DELETE_WINDOW`; the server stays grabbed and errors silenced
    /// for the whole sequence since the window may already be gone.
    // `XSetCloseDownMode`: https://tronche.com/gui/x/xlib/display/XSetCloseDownMode.html
    // `XKillClient`: https://tronche.com/gui/x/xlib/window-and-session-manager/XKillClient.html
    pub fn kill_client(&self, window: xlib::Window) {
        let _server = self.grab_server();
        let _quiet = self.silence_errors();
        unsafe {
            (self.xlib.XSetCloseDownMode)(self.display, xlib::DestroyAll);
            (self.xlib.XKillClient)(self.display, window);
        }
        self.sync();
    }

    /// Creates an override-redirect utility window (the per-monitor bar).
    // `XCreateWindow`: https://tronche.com/gui/x/xlib/window/XCreateWindow.html
    #[must_use]
    pub fn create_bar_window(&self, rect: Rect) -> xlib::Window {
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.override_redirect = xlib::True;
        attrs.background_pixmap = xlib::ParentRelative as xlib::Pixmap;
        attrs.event_mask = xlib::ButtonPressMask | xlib::ExposureMask;
        unsafe {
            let depth = (self.xlib.XDefaultDepth)(self.display, self.screen);
            let visual = (self.xlib.XDefaultVisual)(self.display, self.screen);
            let window = (self.xlib.XCreateWindow)(
                self.display,
                self.root,
                rect.x,
                rect.y,
                rect.w as c_uint,
                rect.h as c_uint,
                0,
                depth,
                xlib::CopyFromParent as c_uint,
                visual,
                xlib::CWOverrideRedirect | xlib::CWBackPixmap | xlib::CWEventMask,
                &mut attrs,
            );
            (self.xlib.XDefineCursor)(self.display, window, self.cursors.normal);
            let name = std::ffi::CString::new("tatami").unwrap_or_default();
            let mut class_hint = xlib::XClassHint {
                res_name: name.as_ptr().cast_mut(),
                res_class: name.as_ptr().cast_mut(),
            };
            (self.xlib.XSetClassHint)(self.display, window, &mut class_hint);
            (self.xlib.XMapRaised)(self.display, window);
            window
        }
    }

    /// Creates the 1x1 `_NET_SUPPORTING_WM_CHECK` window.
    // `XCreateSimpleWindow`: https://tronche.com/gui/x/xlib/window/XCreateSimpleWindow.html
    #[must_use]
    pub fn create_check_window(&self) -> xlib::Window {
        let window = unsafe {
            (self.xlib.XCreateSimpleWindow)(self.display, self.root, 0, 0, 1, 1, 0, 0, 0)
        };
        let data = [window as c_long];
        self.replace_property_long(window, self.atoms.NetWMCheck, xlib::XA_WINDOW, &data);
        self.replace_property_string(window, self.atoms.NetWMName, self.atoms.UTF8String, "tatami");
        self.replace_property_long(self.root, self.atoms.NetWMCheck, xlib::XA_WINDOW, &data);
        window
    }

    /// Warps the pointer to a position inside a window.
    // `XWarpPointer`: https://tronche.com/gui/x/xlib/input/XWarpPointer.html
    pub fn warp_pointer(&self, window: xlib::Window, x: i32, y: i32) {
        unsafe {
            (self.xlib.XWarpPointer)(self.display, 0, window, 0, 0, 0, 0, x, y);
        }
    }
}
