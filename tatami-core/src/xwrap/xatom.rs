use std::ffi::CString;
use x11_dl::xlib;

// Specifications can be found here:
// https://specifications.freedesktop.org/wm-spec/1.3/ar01s03.html

#[derive(Clone, Debug)]
#[allow(non_snake_case)]
pub struct XAtom {
    pub WMProtocols: xlib::Atom,
    pub WMDelete: xlib::Atom,
    pub WMState: xlib::Atom,
    pub WMTakeFocus: xlib::Atom,
    pub NetSupported: xlib::Atom,
    pub NetWMName: xlib::Atom,
    pub NetWMState: xlib::Atom,
    pub NetWMCheck: xlib::Atom,
    pub NetWMFullscreen: xlib::Atom,
    pub NetActiveWindow: xlib::Atom,
    pub NetWMWindowType: xlib::Atom,
    pub NetWMWindowTypeDialog: xlib::Atom,
    pub NetClientList: xlib::Atom,
    pub UTF8String: xlib::Atom,
}

impl XAtom {
    pub fn new(xlib: &xlib::Xlib, dpy: *mut xlib::Display) -> Self {
        Self {
            WMProtocols: from(xlib, dpy, "WM_PROTOCOLS"),
            WMDelete: from(xlib, dpy, "WM_DELETE_WINDOW"),
            WMState: from(xlib, dpy, "WM_STATE"),
            WMTakeFocus: from(xlib, dpy, "WM_TAKE_FOCUS"),
            NetSupported: from(xlib, dpy, "_NET_SUPPORTED"),
            NetWMName: from(xlib, dpy, "_NET_WM_NAME"),
            NetWMState: from(xlib, dpy, "_NET_WM_STATE"),
            NetWMCheck: from(xlib, dpy, "_NET_SUPPORTING_WM_CHECK"),
            NetWMFullscreen: from(xlib, dpy, "_NET_WM_STATE_FULLSCREEN"),
            NetActiveWindow: from(xlib, dpy, "_NET_ACTIVE_WINDOW"),
            NetWMWindowType: from(xlib, dpy, "_NET_WM_WINDOW_TYPE"),
            NetWMWindowTypeDialog: from(xlib, dpy, "_NET_WM_WINDOW_TYPE_DIALOG"),
            NetClientList: from(xlib, dpy, "_NET_CLIENT_LIST"),
            UTF8String: from(xlib, dpy, "UTF8_STRING"),
        }
    }

    /// The `_NET_SUPPORTED` subset we advertise on the root window.
    pub fn net_supported(&self) -> Vec<xlib::Atom> {
        vec![
            self.NetSupported,
            self.NetWMName,
            self.NetWMState,
            self.NetWMCheck,
            self.NetWMFullscreen,
            self.NetActiveWindow,
            self.NetWMWindowType,
            self.NetWMWindowTypeDialog,
            self.NetClientList,
        ]
    }
}

fn from(xlib: &xlib::Xlib, dpy: *mut xlib::Display, s: &str) -> xlib::Atom {
    unsafe {
        (xlib.XInternAtom)(
            dpy,
            CString::new(s).unwrap_or_default().into_raw(),
            xlib::False,
        )
    }
}
