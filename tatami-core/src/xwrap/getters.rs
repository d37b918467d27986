//! `XWrap` getters: queries against windows and the server.
use crate::XWrap;
use std::ffi::CStr;
use std::os::raw::{c_int, c_long, c_uchar, c_uint, c_ulong};
use std::slice;
use x11_dl::xlib;

const MAX_PROPERTY_VALUE_LEN: c_long = 4096;

impl XWrap {
    /// Returns the attributes of a window, if it still exists.
    // `XGetWindowAttributes`: https://tronche.com/gui/x/xlib/window-information/XGetWindowAttributes.html
    #[must_use]
    pub fn get_window_attrs(&self, window: xlib::Window) -> Option<xlib::XWindowAttributes> {
        let mut attrs: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        let status =
            unsafe { (self.xlib.XGetWindowAttributes)(self.display, window, &mut attrs) };
        (status != 0).then_some(attrs)
    }

    /// Returns the window this one is transient for, if any.
    // `XGetTransientForHint`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetTransientForHint.html
    #[must_use]
    pub fn get_transient_for(&self, window: xlib::Window) -> Option<xlib::Window> {
        let mut transient: xlib::Window = 0;
        let status = unsafe {
            (self.xlib.XGetTransientForHint)(self.display, window, &mut transient)
        };
        (status != 0 && transient != 0).then_some(transient)
    }

    /// Returns the raw `WM_NORMAL_HINTS` of a window.
    // `XGetWMNormalHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMNormalHints.html
    #[must_use]
    pub fn get_wm_normal_hints(&self, window: xlib::Window) -> Option<xlib::XSizeHints> {
        let mut hints: xlib::XSizeHints = unsafe { std::mem::zeroed() };
        let mut supplied: c_long = 0;
        let status = unsafe {
            (self.xlib.XGetWMNormalHints)(self.display, window, &mut hints, &mut supplied)
        };
        (status != 0).then_some(hints)
    }

    /// Returns a copy of the `WM_HINTS` of a window.
    // `XGetWMHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMHints.html
    #[must_use]
    pub fn get_wm_hints(&self, window: xlib::Window) -> Option<xlib::XWMHints> {
        unsafe {
            let hints_ptr = (self.xlib.XGetWMHints)(self.display, window);
            if hints_ptr.is_null() {
                return None;
            }
            let hints = *hints_ptr;
            (self.xlib.XFree)(hints_ptr.cast());
            Some(hints)
        }
    }

    /// Returns the `(class, instance)` pair of a window, empty strings when
    /// unset.
    // `XGetClassHint`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetClassHint.html
    #[must_use]
    pub fn get_class_hint(&self, window: xlib::Window) -> (String, String) {
        let mut hint: xlib::XClassHint = unsafe { std::mem::zeroed() };
        let status = unsafe { (self.xlib.XGetClassHint)(self.display, window, &mut hint) };
        if status == 0 {
            return (String::new(), String::new());
        }
        let take = |ptr: *mut std::os::raw::c_char| -> String {
            if ptr.is_null() {
                return String::new();
            }
            let value = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
            unsafe { (self.xlib.XFree)(ptr.cast()) };
            value
        };
        (take(hint.res_class), take(hint.res_name))
    }

    /// Returns a text property of a window as UTF-8, going through the
    /// locale-aware text list conversion for non-STRING encodings.
    // `XGetTextProperty`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetTextProperty.html
    // `XmbTextPropertyToTextList`: https://tronche.com/gui/x/xlib/ICC/Xmb-text-list-to-property.html
    #[must_use]
    pub fn get_text_prop(&self, window: xlib::Window, atom: xlib::Atom) -> Option<String> {
        unsafe {
            let mut prop: xlib::XTextProperty = std::mem::zeroed();
            let status = (self.xlib.XGetTextProperty)(self.display, window, &mut prop, atom);
            if status == 0 || prop.nitems == 0 || prop.value.is_null() {
                return None;
            }
            let text = if prop.encoding == xlib::XA_STRING {
                Some(CStr::from_ptr(prop.value.cast()).to_string_lossy().into_owned())
            } else {
                let mut list: *mut *mut std::os::raw::c_char = std::mem::zeroed();
                let mut count: c_int = 0;
                let converted = (self.xlib.XmbTextPropertyToTextList)(
                    self.display,
                    &prop,
                    &mut list,
                    &mut count,
                );
                if converted >= xlib::Success.into() && count > 0 && !list.is_null() && !(*list).is_null()
                {
                    let value = CStr::from_ptr(*list).to_string_lossy().into_owned();
                    (self.xlib.XFreeStringList)(list);
                    Some(value)
                } else {
                    None
                }
            };
            (self.xlib.XFree)(prop.value.cast());
            text
        }
    }

    /// Returns an atom-valued property of a window, 0 when unset.
    // `XGetWindowProperty`: https://tronche.com/gui/x/xlib/window-information/XGetWindowProperty.html
    #[must_use]
    pub fn get_atom_prop(&self, window: xlib::Window, prop: xlib::Atom) -> xlib::Atom {
        let mut format_return: c_int = 0;
        let mut nitems_return: c_ulong = 0;
        let mut bytes_remaining: c_ulong = 0;
        let mut type_return: xlib::Atom = 0;
        let mut prop_return: *mut c_uchar = std::ptr::null_mut();
        let mut atom: xlib::Atom = 0;
        unsafe {
            let status = (self.xlib.XGetWindowProperty)(
                self.display,
                window,
                prop,
                0,
                MAX_PROPERTY_VALUE_LEN / 4,
                xlib::False,
                xlib::XA_ATOM,
                &mut type_return,
                &mut format_return,
                &mut nitems_return,
                &mut bytes_remaining,
                &mut prop_return,
            );
            if status == i32::from(xlib::Success) && !prop_return.is_null() {
                #[allow(clippy::cast_ptr_alignment)]
                {
                    atom = *prop_return.cast::<xlib::Atom>();
                }
                (self.xlib.XFree)(prop_return.cast());
            }
        }
        atom
    }

    /// Returns the ICCCM `WM_STATE` value of a window, if set.
    #[must_use]
    pub fn get_wm_state(&self, window: xlib::Window) -> Option<c_long> {
        let mut format_return: c_int = 0;
        let mut nitems_return: c_ulong = 0;
        let mut bytes_remaining: c_ulong = 0;
        let mut type_return: xlib::Atom = 0;
        let mut prop_return: *mut c_uchar = std::ptr::null_mut();
        unsafe {
            let status = (self.xlib.XGetWindowProperty)(
                self.display,
                window,
                self.atoms.WMState,
                0,
                2,
                xlib::False,
                self.atoms.WMState,
                &mut type_return,
                &mut format_return,
                &mut nitems_return,
                &mut bytes_remaining,
                &mut prop_return,
            );
            if status != i32::from(xlib::Success) || prop_return.is_null() {
                return None;
            }
            let state = if nitems_return == 0 {
                None
            } else {
                Some(c_long::from(*prop_return))
            };
            (self.xlib.XFree)(prop_return.cast());
            state
        }
    }

    /// Returns all children of the root window, in stacking order.
    // `XQueryTree`: https://tronche.com/gui/x/xlib/window-information/XQueryTree.html
    #[must_use]
    pub fn get_all_windows(&self) -> Vec<xlib::Window> {
        unsafe {
            let mut root_return: xlib::Window = 0;
            let mut parent_return: xlib::Window = 0;
            let mut children: *mut xlib::Window = std::ptr::null_mut();
            let mut count: c_uint = 0;
            let status = (self.xlib.XQueryTree)(
                self.display,
                self.root,
                &mut root_return,
                &mut parent_return,
                &mut children,
                &mut count,
            );
            if status == 0 || children.is_null() {
                return Vec::new();
            }
            let windows = slice::from_raw_parts(children, count as usize).to_vec();
            (self.xlib.XFree)(children.cast());
            windows
        }
    }

    /// Returns the pointer position relative to the root window.
    // `XQueryPointer`: https://tronche.com/gui/x/xlib/window-information/XQueryPointer.html
    #[must_use]
    pub fn get_root_pointer(&self) -> Option<(i32, i32)> {
        let mut root_return: xlib::Window = 0;
        let mut child_return: xlib::Window = 0;
        let mut root_x: c_int = 0;
        let mut root_y: c_int = 0;
        let mut win_x: c_int = 0;
        let mut win_y: c_int = 0;
        let mut mask: c_uint = 0;
        let status = unsafe {
            (self.xlib.XQueryPointer)(
                self.display,
                self.root,
                &mut root_return,
                &mut child_return,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        (status != 0).then_some((root_x, root_y))
    }
}
