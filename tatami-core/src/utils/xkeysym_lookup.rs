//! Lookups from the config file's key and modifier names to X keysyms and
//! modifier masks.
use x11_dl::keysym;
use x11_dl::xlib;

pub type XKeysym = u32;
pub type ModMask = u32;

/// Resolves a config key name to a keysym. Single printable characters map
/// straight to their Latin-1 keysym; everything else goes through the name
/// table.
#[must_use]
pub fn into_keysym(key: &str) -> Option<XKeysym> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if (' '..='~').contains(&c) {
            return Some(c as u32);
        }
    }
    let sym = match key {
        "Return" | "Enter" => keysym::XK_Return,
        "Escape" => keysym::XK_Escape,
        "Tab" => keysym::XK_Tab,
        "space" | "Space" => keysym::XK_space,
        "BackSpace" => keysym::XK_BackSpace,
        "Delete" => keysym::XK_Delete,
        "Home" => keysym::XK_Home,
        "End" => keysym::XK_End,
        "PageUp" | "Prior" => keysym::XK_Prior,
        "PageDown" | "Next" => keysym::XK_Next,
        "Left" => keysym::XK_Left,
        "Right" => keysym::XK_Right,
        "Up" => keysym::XK_Up,
        "Down" => keysym::XK_Down,
        "Print" => keysym::XK_Print,
        "F1" => keysym::XK_F1,
        "F2" => keysym::XK_F2,
        "F3" => keysym::XK_F3,
        "F4" => keysym::XK_F4,
        "F5" => keysym::XK_F5,
        "F6" => keysym::XK_F6,
        "F7" => keysym::XK_F7,
        "F8" => keysym::XK_F8,
        "F9" => keysym::XK_F9,
        "F10" => keysym::XK_F10,
        "F11" => keysym::XK_F11,
        "F12" => keysym::XK_F12,
        "XF86AudioLowerVolume" => keysym::XF86XK_AudioLowerVolume,
        "XF86AudioRaiseVolume" => keysym::XF86XK_AudioRaiseVolume,
        "XF86AudioMute" => keysym::XF86XK_AudioMute,
        "XF86AudioPlay" => keysym::XF86XK_AudioPlay,
        "XF86AudioNext" => keysym::XF86XK_AudioNext,
        "XF86AudioPrev" => keysym::XF86XK_AudioPrev,
        "XF86MonBrightnessUp" => keysym::XF86XK_MonBrightnessUp,
        "XF86MonBrightnessDown" => keysym::XF86XK_MonBrightnessDown,
        _ => return None,
    };
    Some(sym)
}

/// Folds a list of modifier names into an X modifier mask.
#[must_use]
pub fn into_mod_mask(modifiers: &[String]) -> ModMask {
    modifiers.iter().fold(0, |mask, name| mask | into_mod(name))
}

#[must_use]
fn into_mod(name: &str) -> ModMask {
    match name {
        "Shift" => xlib::ShiftMask,
        "Control" | "Ctrl" => xlib::ControlMask,
        "Mod1" | "Alt" => xlib::Mod1Mask,
        "Mod2" | "NumLock" => xlib::Mod2Mask,
        "Mod3" => xlib::Mod3Mask,
        "Mod4" | "Super" => xlib::Mod4Mask,
        "Mod5" => xlib::Mod5Mask,
        _ => 0,
    }
}

/// Strips NumLock and CapsLock from an event state so bindings match no
/// matter the lock state, keeping only real modifiers.
#[must_use]
pub const fn clean_mask(mask: u32, numlock_mask: u32) -> u32 {
    mask & !(numlock_mask | xlib::LockMask)
        & (xlib::ShiftMask
            | xlib::ControlMask
            | xlib::Mod1Mask
            | xlib::Mod2Mask
            | xlib::Mod3Mask
            | xlib::Mod4Mask
            | xlib::Mod5Mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_characters_map_to_their_latin1_keysym() {
        assert_eq!(into_keysym("a"), Some('a' as u32));
        assert_eq!(into_keysym("9"), Some('9' as u32));
        assert_eq!(into_keysym(","), Some(',' as u32));
    }

    #[test]
    fn named_keys_resolve_and_unknown_names_do_not() {
        assert_eq!(into_keysym("Return"), Some(keysym::XK_Return));
        assert_eq!(into_keysym("F5"), Some(keysym::XK_F5));
        assert_eq!(into_keysym("NoSuchKey"), None);
    }

    #[test]
    fn modifier_lists_fold_into_a_mask() {
        let mods = vec!["Mod4".to_string(), "Shift".to_string()];
        assert_eq!(into_mod_mask(&mods), xlib::Mod4Mask | xlib::ShiftMask);
    }

    #[test]
    fn clean_mask_ignores_lock_keys() {
        let numlock = xlib::Mod2Mask;
        let state = xlib::Mod4Mask | xlib::LockMask | numlock;
        assert_eq!(clean_mask(state, numlock), xlib::Mod4Mask);
        assert_eq!(
            clean_mask(xlib::Mod4Mask | xlib::ShiftMask, numlock),
            xlib::Mod4Mask | xlib::ShiftMask,
            "real modifiers must survive cleaning"
        );
    }
}
