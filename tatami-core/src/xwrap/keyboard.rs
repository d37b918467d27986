//! Xlib calls related to the keyboard.
use crate::utils::xkeysym_lookup::XKeysym;
use crate::XWrap;
use std::os::raw::{c_int, c_uint, c_ulong};
use x11_dl::keysym;
use x11_dl::xlib;

impl XWrap {
    /// Grabs one key combination on the root window, with every lock-key
    /// variant so NumLock and CapsLock cannot mask a binding.
    // `XKeysymToKeycode`: https://tronche.com/gui/x/xlib/utilities/keyboard/XKeysymToKeycode.html
    // `XGrabKey`: https://tronche.com/gui/x/xlib/input/XGrabKey.html
    pub fn grab_key(&self, keysym: XKeysym, modifiers: u32, numlock_mask: u32) {
        let code = unsafe { (self.xlib.XKeysymToKeycode)(self.display, c_ulong::from(keysym)) };
        if code == 0 {
            return;
        }
        for extra in lock_variants(numlock_mask) {
            unsafe {
                (self.xlib.XGrabKey)(
                    self.display,
                    c_int::from(code),
                    modifiers | extra,
                    self.root,
                    xlib::True,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                );
            }
        }
    }

    /// Drops every key grab on the root window.
    // `XUngrabKey`: https://tronche.com/gui/x/xlib/input/XUngrabKey.html
    pub fn ungrab_keys(&self) {
        unsafe {
            (self.xlib.XUngrabKey)(self.display, xlib::AnyKey, xlib::AnyModifier, self.root);
        }
    }

    /// Converts a keycode from a key event back to its keysym.
    // `XkbKeycodeToKeysym`: https://linux.die.net/man/3/xkbkeycodetokeysym
    #[must_use]
    pub fn keycode_to_keysym(&self, keycode: u32) -> XKeysym {
        let sym = unsafe { (self.xlib.XkbKeycodeToKeysym)(self.display, keycode as u8, 0, 0) };
        sym as XKeysym
    }

    /// Reloads Xlib's keyboard mapping after a `MappingNotify`.
    // `XRefreshKeyboardMapping`: https://tronche.com/gui/x/xlib/utilities/keyboard/XRefreshKeyboardMapping.html
    pub fn refresh_keyboard_mapping(&self, event: &mut xlib::XMappingEvent) {
        unsafe {
            (self.xlib.XRefreshKeyboardMapping)(event);
        }
    }

    /// Finds which modifier bit NumLock currently lives on; layouts move
    /// it around.
    // `XGetModifierMapping`: https://tronche.com/gui/x/xlib/input/XGetModifierMapping.html
    #[must_use]
    pub fn get_numlock_mask(&self) -> u32 {
        let mut numlock_mask = 0;
        unsafe {
            let modmap = (self.xlib.XGetModifierMapping)(self.display);
            if modmap.is_null() {
                return 0;
            }
            let numlock_code =
                (self.xlib.XKeysymToKeycode)(self.display, c_ulong::from(keysym::XK_Num_Lock));
            let per_mod = (*modmap).max_keypermod as usize;
            let keycodes = std::slice::from_raw_parts((*modmap).modifiermap, 8 * per_mod);
            for (index, chunk) in keycodes.chunks(per_mod).enumerate() {
                if chunk.contains(&numlock_code) {
                    numlock_mask = 1 << index;
                }
            }
            (self.xlib.XFreeModifiermap)(modmap);
        }
        numlock_mask
    }
}

/// The grab variants covering every lock-key state.
pub(crate) fn lock_variants(numlock_mask: u32) -> [c_uint; 4] {
    [
        0,
        xlib::LockMask,
        numlock_mask,
        numlock_mask | xlib::LockMask,
    ]
}
