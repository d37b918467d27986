//! The X error-handler stack. Xlib reports protocol errors through a
//! process-global callback, so the handlers live here as `extern "C"`
//! functions and the previous handler is parked in a static. The whole
//! core is single-threaded; nothing else touches these statics.
use crate::XWrap;
use std::os::raw::c_int;
use x11_dl::xlib;

// Protocol request codes from <X11/Xproto.h>; x11-dl does not export them.
const X_COPY_AREA: u8 = 62;
const X_POLY_SEGMENT: u8 = 66;
const X_POLY_FILL_RECTANGLE: u8 = 70;
const X_POLY_TEXT8: u8 = 74;
const X_SET_INPUT_FOCUS: u8 = 42;
const X_CONFIGURE_WINDOW: u8 = 12;
const X_GRAB_BUTTON: u8 = 28;
const X_GRAB_KEY: u8 = 33;

type XErrorHandler =
    Option<unsafe extern "C" fn(*mut xlib::Display, *mut xlib::XErrorEvent) -> c_int>;

static mut DEFAULT_HANDLER: XErrorHandler = None;

/// The regular handler. Certain request/error combinations are legitimate
/// race outcomes against clients destroying their windows asynchronously
/// and are ignored wholesale; everything else goes to Xlib's default
/// handler, which may terminate us.
pub extern "C" fn on_error(
    display: *mut xlib::Display,
    event: *mut xlib::XErrorEvent,
) -> c_int {
    let err = unsafe { *event };
    if err.error_code == xlib::BadWindow
        || (err.request_code == X_SET_INPUT_FOCUS && err.error_code == xlib::BadMatch)
        || (err.request_code == X_POLY_TEXT8 && err.error_code == xlib::BadDrawable)
        || (err.request_code == X_POLY_FILL_RECTANGLE && err.error_code == xlib::BadDrawable)
        || (err.request_code == X_POLY_SEGMENT && err.error_code == xlib::BadDrawable)
        || (err.request_code == X_CONFIGURE_WINDOW && err.error_code == xlib::BadMatch)
        || (err.request_code == X_GRAB_BUTTON && err.error_code == xlib::BadAccess)
        || (err.request_code == X_GRAB_KEY && err.error_code == xlib::BadAccess)
        || (err.request_code == X_COPY_AREA && err.error_code == xlib::BadDrawable)
    {
        return 0;
    }
    tracing::error!(
        "fatal X error: request code {}, error code {}",
        err.request_code,
        err.error_code
    );
    unsafe {
        match DEFAULT_HANDLER {
            Some(handler) => handler(display, event),
            None => 0,
        }
    }
}

/// Swallows everything. Swapped in around server-grabbed critical sections.
pub extern "C" fn on_error_dummy(
    _: *mut xlib::Display,
    _: *mut xlib::XErrorEvent,
) -> c_int {
    0
}

/// Startup handler: the only error we can receive while selecting
/// `SubstructureRedirect` is `BadAccess` from a competing window manager.
pub extern "C" fn on_startup_error(
    _: *mut xlib::Display,
    _: *mut xlib::XErrorEvent,
) -> c_int {
    eprintln!("tatami: another window manager is already running");
    std::process::exit(1);
}

/// Remembers Xlib's own handler so [`on_error`] can forward fatal errors
/// to it.
pub fn store_default_handler(handler: XErrorHandler) {
    unsafe {
        DEFAULT_HANDLER = handler;
    }
}

/// Scope guard that swaps in the silent handler, restoring the regular one
/// on every exit path.
pub struct ErrorSilencer<'a> {
    xwrap: &'a XWrap,
}

impl<'a> ErrorSilencer<'a> {
    pub fn new(xwrap: &'a XWrap) -> Self {
        xwrap.set_error_handler(Some(on_error_dummy));
        Self { xwrap }
    }
}

impl Drop for ErrorSilencer<'_> {
    fn drop(&mut self) {
        self.xwrap.set_error_handler(Some(on_error));
    }
}

/// Scope guard holding the exclusive server grab for dangerous sequences.
pub struct ServerGrab<'a> {
    xwrap: &'a XWrap,
}

impl<'a> ServerGrab<'a> {
    pub fn new(xwrap: &'a XWrap) -> Self {
        xwrap.grab_server_raw();
        Self { xwrap }
    }
}

impl Drop for ServerGrab<'_> {
    fn drop(&mut self) {
        self.xwrap.ungrab_server_raw();
    }
}
