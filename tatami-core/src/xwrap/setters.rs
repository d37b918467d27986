//! `XWrap` setters: property and attribute writes.
use super::WindowStateConst;
use crate::XWrap;
use std::os::raw::{c_long, c_ulong};
use x11_dl::xlib;

impl XWrap {
    /// Appends to a long-valued window property.
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn append_property_long(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        r#type: xlib::Atom,
        data: &[c_long],
    ) {
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                property,
                r#type,
                32,
                xlib::PropModeAppend,
                data.as_ptr().cast::<u8>(),
                data.len() as i32,
            );
        }
    }

    /// Replaces a long-valued window property.
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn replace_property_long(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        r#type: xlib::Atom,
        data: &[c_long],
    ) {
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                property,
                r#type,
                32,
                xlib::PropModeReplace,
                data.as_ptr().cast::<u8>(),
                data.len() as i32,
            );
        }
    }

    /// Replaces a string-valued window property.
    pub fn replace_property_string(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        encoding: xlib::Atom,
        value: &str,
    ) {
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                property,
                encoding,
                8,
                xlib::PropModeReplace,
                value.as_ptr(),
                value.len() as i32,
            );
        }
    }

    /// Deletes a property from a window.
    // `XDeleteProperty`: https://tronche.com/gui/x/xlib/window-information/XDeleteProperty.html
    pub fn delete_property(&self, window: xlib::Window, property: xlib::Atom) {
        unsafe {
            (self.xlib.XDeleteProperty)(self.display, window, property);
        }
    }

    /// Sets the ICCCM `WM_STATE` of a window (Normal on manage, Withdrawn
    /// on unmanage).
    pub fn set_client_state(&self, window: xlib::Window, state: WindowStateConst) {
        let data = [state, 0];
        self.replace_property_long(window, self.atoms.WMState, self.atoms.WMState, &data);
    }

    /// Marks a window fullscreen (or not) in `_NET_WM_STATE`.
    pub fn set_net_fullscreen(&self, window: xlib::Window, fullscreen: bool) {
        if fullscreen {
            let data = [self.atoms.NetWMFullscreen as c_long];
            self.replace_property_long(window, self.atoms.NetWMState, xlib::XA_ATOM, &data);
        } else {
            self.replace_property_long(window, self.atoms.NetWMState, xlib::XA_ATOM, &[]);
        }
    }

    /// Sets a window's border color.
    // `XSetWindowBorder`: https://tronche.com/gui/x/xlib/window/XSetWindowBorder.html
    pub fn set_window_border_color(&self, window: xlib::Window, pixel: c_ulong) {
        unsafe {
            (self.xlib.XSetWindowBorder)(self.display, window, pixel);
        }
    }

    /// Writes the urgency flag back into a window's `WM_HINTS`.
    // `XSetWMHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XSetWMHints.html
    pub fn set_wm_hints(&self, window: xlib::Window, hints: &mut xlib::XWMHints) {
        unsafe {
            (self.xlib.XSetWMHints)(self.display, window, hints);
        }
    }

    /// Publishes `window` as the EWMH active window.
    pub fn set_active_window(&self, window: xlib::Window) {
        let data = [window as c_long];
        self.replace_property_long(self.root, self.atoms.NetActiveWindow, xlib::XA_WINDOW, &data);
    }

    /// Appends a window to `_NET_CLIENT_LIST`.
    pub fn append_client_list(&self, window: xlib::Window) {
        let data = [window as c_long];
        self.append_property_long(self.root, self.atoms.NetClientList, xlib::XA_WINDOW, &data);
    }

    /// Rewrites `_NET_CLIENT_LIST` from scratch with the given windows.
    pub fn set_client_list(&self, windows: &[xlib::Window]) {
        self.delete_property(self.root, self.atoms.NetClientList);
        for &window in windows {
            self.append_client_list(window);
        }
    }
}
