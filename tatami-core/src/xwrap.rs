//! A wrapper around calls to xlib and X related functions. Everything
//! `unsafe` about talking to the X server lives behind this facade; the
//! rest of the core only sees typed operations.
// _x_ and _y_ style names mirror the protocol and are intentionally
// similar.
#![allow(clippy::similar_names)]
use crate::models::Rect;
use crate::{Result, TatamiError};
use std::os::raw::{c_int, c_long};
use std::ptr;
use x11_dl::xinerama;
use x11_dl::xlib;

mod getters;
mod keyboard;
mod mouse;
mod setters;
mod window;
mod xatom;
mod xcursor;
mod xerror;

pub use xatom::XAtom;
pub use xcursor::XCursor;
pub use xerror::{ErrorSilencer, ServerGrab};

pub type WindowStateConst = c_long;
pub const WITHDRAWN_STATE: WindowStateConst = 0;
pub const NORMAL_STATE: WindowStateConst = 1;
pub const ICONIC_STATE: WindowStateConst = 3;

pub const ROOT_EVENT_MASK: c_long = xlib::SubstructureRedirectMask
    | xlib::SubstructureNotifyMask
    | xlib::ButtonPressMask
    | xlib::PointerMotionMask
    | xlib::EnterWindowMask
    | xlib::LeaveWindowMask
    | xlib::StructureNotifyMask
    | xlib::PropertyChangeMask;

pub const CLIENT_EVENT_MASK: c_long = xlib::EnterWindowMask
    | xlib::FocusChangeMask
    | xlib::PropertyChangeMask
    | xlib::StructureNotifyMask;

pub const BUTTONMASK: c_long = xlib::ButtonPressMask | xlib::ButtonReleaseMask;
pub const MOUSEMASK: c_long = BUTTONMASK | xlib::PointerMotionMask;

/// Contains the Xserver connection and origins.
pub struct XWrap {
    pub(crate) xlib: xlib::Xlib,
    xinerama: Option<xinerama::Xlib>,
    display: *mut xlib::Display,
    root: xlib::Window,
    screen: c_int,
    pub atoms: XAtom,
    pub cursors: XCursor,
}

impl XWrap {
    /// Opens the display and interns the atom and cursor tables.
    ///
    /// # Errors
    ///
    /// Errors when no X server can be reached.
    // `XOpenDisplay`: https://tronche.com/gui/x/xlib/display/opening.html
    // `XDefaultScreen`: https://tronche.com/gui/x/xlib/display/display-macros.html#DefaultScreen
    // `XRootWindow`: https://tronche.com/gui/x/xlib/display/display-macros.html#RootWindow
    pub fn new() -> Result<Self> {
        let xlib = xlib::Xlib::open().map_err(|_| TatamiError::DisplayNotFound)?;
        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
        if display.is_null() {
            return Err(TatamiError::DisplayNotFound);
        }
        let screen = unsafe { (xlib.XDefaultScreen)(display) };
        let root = unsafe { (xlib.XRootWindow)(display, screen) };
        let atoms = XAtom::new(&xlib, display);
        let cursors = XCursor::new(&xlib, display);
        let xinerama = xinerama::Xlib::open().ok();
        Ok(Self {
            xlib,
            xinerama,
            display,
            root,
            screen,
            atoms,
            cursors,
        })
    }

    #[must_use]
    pub const fn root(&self) -> xlib::Window {
        self.root
    }

    /// The raw display pointer, for the draw context which shares the
    /// connection.
    #[must_use]
    pub const fn display(&self) -> *mut xlib::Display {
        self.display
    }

    #[must_use]
    pub const fn screen(&self) -> c_int {
        self.screen
    }

    /// Claims the substructure-redirect grant, dying if another window
    /// manager already holds it: selecting the mask is the only request in
    /// flight, so any error that comes back is the competing WM's
    /// `BadAccess`.
    // `XSetErrorHandler`: https://tronche.com/gui/x/xlib/event-handling/protocol-errors/XSetErrorHandler.html
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    pub fn become_window_manager(&self) {
        unsafe {
            let previous = (self.xlib.XSetErrorHandler)(Some(xerror::on_startup_error));
            xerror::store_default_handler(previous);
            (self.xlib.XSelectInput)(self.display, self.root, xlib::SubstructureRedirectMask);
            self.sync();
            (self.xlib.XSetErrorHandler)(Some(xerror::on_error));
            self.sync();
        }
    }

    /// Selects the root event mask and installs the normal cursor on the
    /// root window.
    // `XChangeWindowAttributes`: https://tronche.com/gui/x/xlib/window/XChangeWindowAttributes.html
    pub fn init_root(&self) {
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.cursor = self.cursors.normal;
        attrs.event_mask = ROOT_EVENT_MASK;
        unsafe {
            (self.xlib.XChangeWindowAttributes)(
                self.display,
                self.root,
                xlib::CWEventMask | xlib::CWCursor,
                &mut attrs,
            );
            (self.xlib.XSelectInput)(self.display, self.root, ROOT_EVENT_MASK);
        }
    }

    pub fn set_error_handler(
        &self,
        handler: Option<unsafe extern "C" fn(*mut xlib::Display, *mut xlib::XErrorEvent) -> c_int>,
    ) {
        unsafe {
            (self.xlib.XSetErrorHandler)(handler);
        }
    }

    /// Silences X errors until the guard drops.
    #[must_use]
    pub fn silence_errors(&self) -> ErrorSilencer<'_> {
        ErrorSilencer::new(self)
    }

    /// Grabs the server exclusively until the guard drops.
    // `XGrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XGrabServer.html
    #[must_use]
    pub fn grab_server(&self) -> ServerGrab<'_> {
        ServerGrab::new(self)
    }

    pub(crate) fn grab_server_raw(&self) {
        unsafe {
            (self.xlib.XGrabServer)(self.display);
        }
    }

    pub(crate) fn ungrab_server_raw(&self) {
        unsafe {
            (self.xlib.XUngrabServer)(self.display);
        }
    }

    /// Flush and sync the xserver.
    // `XSync`: https://tronche.com/gui/x/xlib/event-handling/XSync.html
    pub fn sync(&self) {
        unsafe { (self.xlib.XSync)(self.display, xlib::False) };
    }

    /// Flush the xserver.
    // `XFlush`: https://tronche.com/gui/x/xlib/event-handling/XFlush.html
    pub fn flush(&self) {
        unsafe { (self.xlib.XFlush)(self.display) };
    }

    /// Blocks until the next event arrives. The event loop's only
    /// suspension point.
    // `XNextEvent`: https://tronche.com/gui/x/xlib/event-handling/manipulating-event-queue/XNextEvent.html
    #[must_use]
    pub fn next_event(&self) -> xlib::XEvent {
        unsafe {
            let mut event: xlib::XEvent = std::mem::zeroed();
            (self.xlib.XNextEvent)(self.display, &mut event);
            event
        }
    }

    /// Blocks until the next event matching the mask arrives; the nested
    /// read used by the mouse-drag modes.
    // `XMaskEvent`: https://tronche.com/gui/x/xlib/event-handling/manipulating-event-queue/XMaskEvent.html
    #[must_use]
    pub fn mask_event(&self, mask: c_long) -> xlib::XEvent {
        unsafe {
            let mut event: xlib::XEvent = std::mem::zeroed();
            (self.xlib.XMaskEvent)(self.display, mask, &mut event);
            event
        }
    }

    /// Drains every queued event matching the mask. Used after restacks so
    /// the EnterNotify storm they cause cannot steal focus.
    // `XCheckMaskEvent`: https://tronche.com/gui/x/xlib/event-handling/manipulating-event-queue/XCheckMaskEvent.html
    pub fn drain_events(&self, mask: c_long) {
        let mut event: xlib::XEvent = unsafe { std::mem::zeroed() };
        while unsafe { (self.xlib.XCheckMaskEvent)(self.display, mask, &mut event) } > 0 {}
    }

    /// Sends an event to a window.
    // `XSendEvent`: https://tronche.com/gui/x/xlib/event-handling/XSendEvent.html
    pub fn send_xevent(
        &self,
        window: xlib::Window,
        propagate: c_int,
        mask: c_long,
        event: &mut xlib::XEvent,
    ) {
        unsafe {
            (self.xlib.XSendEvent)(self.display, window, propagate, mask, event);
        }
    }

    /// Sends a `WM_PROTOCOLS` client message if the window advertises the
    /// protocol. Returns whether it was sent.
    pub fn send_protocol_event(&self, window: xlib::Window, proto: xlib::Atom) -> bool {
        if !self.supports_protocol(window, proto) {
            return false;
        }
        let mut msg: xlib::XClientMessageEvent = unsafe { std::mem::zeroed() };
        msg.type_ = xlib::ClientMessage;
        msg.window = window;
        msg.message_type = self.atoms.WMProtocols;
        msg.format = 32;
        msg.data.set_long(0, proto as c_long);
        msg.data.set_long(1, xlib::CurrentTime as c_long);
        let mut event: xlib::XEvent = msg.into();
        self.send_xevent(window, 0, xlib::NoEventMask, &mut event);
        true
    }

    /// Whether a window lists an atom in its `WM_PROTOCOLS`.
    // `XGetWMProtocols`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMProtocols.html
    #[must_use]
    pub fn supports_protocol(&self, window: xlib::Window, proto: xlib::Atom) -> bool {
        unsafe {
            let mut array: *mut xlib::Atom = std::mem::zeroed();
            let mut length: c_int = 0;
            let status =
                (self.xlib.XGetWMProtocols)(self.display, window, &mut array, &mut length);
            if status == 0 || array.is_null() {
                return false;
            }
            let protocols = std::slice::from_raw_parts(array, length as usize);
            let supported = protocols.contains(&proto);
            (self.xlib.XFree)(array.cast());
            supported
        }
    }

    /// Screen geometries for every output, deduplicated: Xinerama reports
    /// cloned outputs as separate screens with identical geometry and
    /// those must become one monitor. Falls back to one screen covering
    /// the root when Xinerama is unavailable.
    // `XineramaQueryScreens`: https://linux.die.net/man/3/xineramaqueryscreens
    #[must_use]
    pub fn get_screens(&self, fallback: (i32, i32)) -> Vec<Rect> {
        if let Some(xinerama) = &self.xinerama {
            if unsafe { (xinerama.XineramaIsActive)(self.display) } > 0 {
                let mut count: c_int = 0;
                let info =
                    unsafe { (xinerama.XineramaQueryScreens)(self.display, &mut count) };
                if !info.is_null() {
                    let screens = unsafe { std::slice::from_raw_parts(info, count as usize) };
                    let mut unique: Vec<Rect> = Vec::with_capacity(screens.len());
                    for screen in screens {
                        let rect = Rect::new(
                            i32::from(screen.x_org),
                            i32::from(screen.y_org),
                            i32::from(screen.width),
                            i32::from(screen.height),
                        );
                        if !unique.contains(&rect) {
                            unique.push(rect);
                        }
                    }
                    unsafe { (self.xlib.XFree)(info.cast()) };
                    return unique;
                }
            }
        }
        vec![Rect::new(0, 0, fallback.0, fallback.1)]
    }

    /// The display dimensions as X reported them at connection time.
    // `XDisplayWidth`: https://tronche.com/gui/x/xlib/display/display-macros.html#DisplayWidth
    #[must_use]
    pub fn display_size(&self) -> (i32, i32) {
        unsafe {
            (
                (self.xlib.XDisplayWidth)(self.display, self.screen),
                (self.xlib.XDisplayHeight)(self.display, self.screen),
            )
        }
    }

    /// Lets a frozen, synchronously-grabbed click through to the client.
    // `XAllowEvents`: https://tronche.com/gui/x/xlib/input/XAllowEvents.html
    pub fn replay_pointer(&self) {
        unsafe {
            (self.xlib.XAllowEvents)(self.display, xlib::ReplayPointer, xlib::CurrentTime);
        }
    }

    /// Releases the cursor set; part of shutdown.
    // `XFreeCursor`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XFreeCursor.html
    pub fn free_cursors(&self) {
        unsafe {
            (self.xlib.XFreeCursor)(self.display, self.cursors.normal);
            (self.xlib.XFreeCursor)(self.display, self.cursors.resize);
            (self.xlib.XFreeCursor)(self.display, self.cursors.move_);
        }
    }

    /// Closes the connection.
    // `XCloseDisplay`: https://tronche.com/gui/x/xlib/display/XCloseDisplay.html
    pub fn close(&self) {
        unsafe {
            (self.xlib.XCloseDisplay)(self.display);
        }
    }
}
