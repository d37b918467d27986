//! Xlib calls related to the mouse.
use super::keyboard::lock_variants;
use super::{BUTTONMASK, MOUSEMASK};
use crate::XWrap;
use std::os::raw::{c_uint, c_ulong};
use x11_dl::xlib;

impl XWrap {
    /// Installs the button grabs for a client window. An unfocused client
    /// additionally gets a synchronous any-button grab so its next click
    /// is reported to us (for click-to-focus) before being replayed.
    // `XGrabButton`: https://tronche.com/gui/x/xlib/input/XGrabButton.html
    pub fn grab_buttons(
        &self,
        window: xlib::Window,
        bindings: &[(u32, u32)],
        numlock_mask: u32,
        focused: bool,
    ) {
        self.ungrab_buttons(window);
        if !focused {
            unsafe {
                (self.xlib.XGrabButton)(
                    self.display,
                    xlib::AnyButton as c_uint,
                    xlib::AnyModifier,
                    window,
                    xlib::False,
                    BUTTONMASK as c_uint,
                    xlib::GrabModeSync,
                    xlib::GrabModeSync,
                    0,
                    0,
                );
            }
        }
        for &(button, modifiers) in bindings {
            for extra in lock_variants(numlock_mask) {
                unsafe {
                    (self.xlib.XGrabButton)(
                        self.display,
                        button,
                        modifiers | extra,
                        window,
                        xlib::False,
                        BUTTONMASK as c_uint,
                        xlib::GrabModeAsync,
                        xlib::GrabModeSync,
                        0,
                        0,
                    );
                }
            }
        }
    }

    /// Drops every button grab on a window.
    // `XUngrabButton`: https://tronche.com/gui/x/xlib/input/XUngrabButton.html
    pub fn ungrab_buttons(&self, window: xlib::Window) {
        unsafe {
            (self.xlib.XUngrabButton)(
                self.display,
                xlib::AnyButton as c_uint,
                xlib::AnyModifier,
                window,
            );
        }
    }

    /// Starts a modal pointer grab with the given cursor. Returns whether
    /// the grab succeeded; drags bail out when it does not.
    // `XGrabPointer`: https://tronche.com/gui/x/xlib/input/XGrabPointer.html
    #[must_use]
    pub fn grab_pointer(&self, cursor: c_ulong) -> bool {
        let status = unsafe {
            (self.xlib.XGrabPointer)(
                self.display,
                self.root,
                xlib::False,
                MOUSEMASK as c_uint,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                0,
                cursor,
                xlib::CurrentTime,
            )
        };
        status == xlib::GrabSuccess
    }

    // `XUngrabPointer`: https://tronche.com/gui/x/xlib/input/XUngrabPointer.html
    pub fn ungrab_pointer(&self) {
        unsafe {
            (self.xlib.XUngrabPointer)(self.display, xlib::CurrentTime);
        }
    }
}
