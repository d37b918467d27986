//! General configuration: appearance, tags, rules and bindings. Every field
//! has a built-in default so a missing or partial config file still yields
//! a usable window manager.
mod keybind;

pub use keybind::{BaseCommand, ClickTarget, Keybind, MouseBind};

use crate::layouts::{LayoutKind, LAYOUTS};
use crate::utils::xkeysym_lookup;
use crate::{Result, TatamiError};
use serde::{Deserialize, Serialize};
use std::fs;
use xdg::BaseDirectories;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ColorScheme {
    pub fg: String,
    pub bg: String,
    pub border: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Colors {
    pub normal: ColorScheme,
    pub selected: ColorScheme,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            normal: ColorScheme {
                fg: "#bbbbbb".to_string(),
                bg: "#222222".to_string(),
                border: "#444444".to_string(),
            },
            selected: ColorScheme {
                fg: "#eeeeee".to_string(),
                bg: "#005577".to_string(),
                border: "#005577".to_string(),
            },
        }
    }
}

/// Seeds a newly managed client's tags, floating state and monitor by
/// substring-matching its class, instance and title.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Rule {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub title: Option<String>,
    /// Tag index the client starts on.
    pub tag: Option<usize>,
    #[serde(default)]
    pub is_floating: bool,
    pub monitor: Option<usize>,
}

impl Rule {
    /// Whether every given pattern is a substring of the corresponding
    /// client property.
    #[must_use]
    pub fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        let contains = |pattern: &Option<String>, value: &str| {
            pattern.as_ref().map_or(true, |p| value.contains(p.as_str()))
        };
        contains(&self.class, class)
            && contains(&self.instance, instance)
            && contains(&self.title, title)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub tags: Vec<String>,
    pub fonts: Vec<String>,
    pub colors: Colors,
    pub border_px: i32,
    /// Edge-snap distance for mouse drags, in pixels.
    pub snap: i32,
    pub show_bar: bool,
    pub top_bar: bool,
    pub mfact: f32,
    pub masters_count: u32,
    pub gap_px: i32,
    /// Respect ICCCM size hints even for tiled clients.
    pub resize_hints: bool,
    /// Refuse to move focus away from a fullscreen client.
    pub lock_fullscreen: bool,
    pub layouts: Vec<LayoutKind>,
    /// Shell line for the launcher; `{monitor}` is replaced with the
    /// selected monitor's number.
    pub menu_command: String,
    pub terminal_command: String,
    pub rules: Vec<Rule>,
    pub keybinds: Vec<Keybind>,
    pub mousebinds: Vec<MouseBind>,
}

impl Default for Config {
    fn default() -> Self {
        let tags: Vec<String> = (1..=9).map(|n| n.to_string()).collect();
        Self {
            keybinds: default_keybinds(tags.len()),
            mousebinds: default_mousebinds(),
            tags,
            fonts: vec!["monospace:size=10".to_string()],
            colors: Colors::default(),
            border_px: 1,
            snap: 32,
            show_bar: true,
            top_bar: true,
            mfact: 0.55,
            masters_count: 1,
            gap_px: 5,
            resize_hints: true,
            lock_fullscreen: true,
            layouts: LAYOUTS.to_vec(),
            menu_command: "dmenu_run -m {monitor}".to_string(),
            terminal_command: "st".to_string(),
            rules: vec![
                Rule {
                    class: Some("Gimp".to_string()),
                    is_floating: true,
                    ..Rule::default()
                },
                Rule {
                    class: Some("Firefox".to_string()),
                    tag: Some(8),
                    ..Rule::default()
                },
            ],
        }
    }
}

impl Config {
    /// Loads `$XDG_CONFIG_HOME/tatami/config.toml`, falling back to the
    /// defaults when the file does not exist. The parsed config is
    /// validated before it is returned.
    ///
    /// # Errors
    ///
    /// Errors when the file exists but cannot be read or parsed, or when
    /// validation rejects it.
    pub fn load() -> Result<Self> {
        let base = BaseDirectories::with_prefix("tatami")?;
        let config = match base.find_config_file("config.toml") {
            Some(path) => {
                tracing::info!("loading config from {}", path.display());
                let contents = fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the parts serde cannot: tag count, key names, binding values.
    ///
    /// # Errors
    ///
    /// Errors on the first invalid binding or tag table.
    pub fn validate(&self) -> Result<()> {
        if self.tags.is_empty() || self.tags.len() > 31 {
            return Err(TatamiError::InvalidBindingValue(format!(
                "between 1 and 31 tags required, got {}",
                self.tags.len()
            )));
        }
        if self.layouts.is_empty() {
            return Err(TatamiError::InvalidBindingValue(
                "at least one layout required".to_string(),
            ));
        }
        for keybind in &self.keybinds {
            xkeysym_lookup::into_keysym(&keybind.key)
                .ok_or_else(|| TatamiError::UnknownKey(keybind.key.clone()))?;
            keybind.command(self.tags.len())?;
        }
        for mousebind in &self.mousebinds {
            mousebind.command(self.tags.len())?;
        }
        Ok(())
    }
}

fn default_keybinds(tag_count: usize) -> Vec<Keybind> {
    let modkey = "Mod4";
    let bind = |modifier: &[&str], key: &str, command: BaseCommand, value: &str| Keybind {
        command,
        value: value.to_string(),
        modifier: modifier.iter().map(ToString::to_string).collect(),
        key: key.to_string(),
    };

    let mut keybinds = vec![
        bind(&[modkey], "p", BaseCommand::Execute, "dmenu_run -m {monitor}"),
        bind(&[modkey, "Shift"], "Return", BaseCommand::Execute, "st"),
        bind(&[modkey], "b", BaseCommand::ToggleBar, ""),
        bind(&[modkey], "j", BaseCommand::FocusStack, "1"),
        bind(&[modkey], "k", BaseCommand::FocusStack, "-1"),
        bind(&[modkey], "i", BaseCommand::IncMasterCount, "1"),
        bind(&[modkey], "d", BaseCommand::IncMasterCount, "-1"),
        bind(&[modkey], "h", BaseCommand::SetMasterFactor, "-0.05"),
        bind(&[modkey], "l", BaseCommand::SetMasterFactor, "0.05"),
        bind(&[modkey], "Return", BaseCommand::Zoom, ""),
        bind(&[modkey], "Tab", BaseCommand::ViewPrevious, ""),
        bind(&[modkey, "Shift"], "c", BaseCommand::CloseClient, ""),
        bind(&[modkey], "t", BaseCommand::SetLayout, "tile"),
        bind(&[modkey], "f", BaseCommand::SetLayout, "floating"),
        bind(&[modkey], "m", BaseCommand::SetLayout, "monocle"),
        bind(&[modkey, "Shift"], "space", BaseCommand::ToggleFloating, ""),
        bind(&[modkey], "0", BaseCommand::ViewAll, ""),
        bind(&[modkey], ",", BaseCommand::FocusMonitor, "-1"),
        bind(&[modkey], ".", BaseCommand::FocusMonitor, "1"),
        bind(&[modkey, "Shift"], ",", BaseCommand::MoveToMonitor, "-1"),
        bind(&[modkey, "Shift"], ".", BaseCommand::MoveToMonitor, "1"),
        bind(&[modkey], "-", BaseCommand::ChangeGap, "-1"),
        bind(&[modkey], "=", BaseCommand::ChangeGap, "1"),
        bind(&[modkey, "Shift"], "=", BaseCommand::ChangeGap, "0"),
        bind(&[modkey, "Shift"], "q", BaseCommand::Quit, ""),
    ];

    for tag in 0..tag_count.min(9) {
        let key = (tag + 1).to_string();
        let value = tag.to_string();
        keybinds.push(bind(&[modkey], &key, BaseCommand::ViewTag, &value));
        keybinds.push(bind(&[modkey, "Control"], &key, BaseCommand::ToggleViewTag, &value));
        keybinds.push(bind(&[modkey, "Shift"], &key, BaseCommand::MoveToTag, &value));
        keybinds.push(bind(
            &[modkey, "Control", "Shift"],
            &key,
            BaseCommand::ToggleClientTag,
            &value,
        ));
    }

    keybinds
}

fn default_mousebinds() -> Vec<MouseBind> {
    let bind = |target: ClickTarget,
                modifier: &[&str],
                button: u32,
                command: BaseCommand,
                value: &str| MouseBind {
        target,
        modifier: modifier.iter().map(ToString::to_string).collect(),
        button,
        command,
        value: value.to_string(),
    };

    vec![
        bind(ClickTarget::LayoutSymbol, &[], 1, BaseCommand::SetLayout, "tile"),
        bind(ClickTarget::LayoutSymbol, &[], 3, BaseCommand::SetLayout, "monocle"),
        bind(ClickTarget::WinTitle, &[], 2, BaseCommand::Zoom, ""),
        bind(ClickTarget::StatusText, &[], 2, BaseCommand::Execute, "st"),
        bind(ClickTarget::ClientWin, &["Mod4"], 1, BaseCommand::MoveMouse, ""),
        bind(ClickTarget::ClientWin, &["Mod4"], 2, BaseCommand::ToggleFloating, ""),
        bind(ClickTarget::ClientWin, &["Mod4"], 3, BaseCommand::ResizeMouse, ""),
        // Tag-cell clicks: the clicked cell overrides the bound tag index.
        bind(ClickTarget::TagBar, &[], 1, BaseCommand::ViewTag, "0"),
        bind(ClickTarget::TagBar, &[], 3, BaseCommand::ToggleViewTag, "0"),
        bind(ClickTarget::TagBar, &["Mod4"], 1, BaseCommand::MoveToTag, "0"),
        bind(ClickTarget::TagBar, &["Mod4"], 3, BaseCommand::ToggleClientTag, "0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_default_config_validates() {
        let config = Config::default();
        config.validate().expect("default config must be valid");
        assert_eq!(config.tags.len(), 9);
        assert!((config.mfact - 0.55).abs() < f32::EPSILON);
    }

    #[test]
    fn a_partial_toml_file_keeps_the_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            mfact = 0.6
            top_bar = false

            [[rules]]
            class = "mpv"
            is_floating = true
            "#,
        )
        .expect("partial config must parse");
        assert!((config.mfact - 0.6).abs() < f32::EPSILON);
        assert!(!config.top_bar);
        assert!(config.show_bar, "unset fields fall back to defaults");
        assert_eq!(config.rules.len(), 1);
        assert!(config.rules[0].is_floating);
    }

    #[test]
    fn bad_bindings_are_rejected() {
        let mut config = Config::default();
        config.keybinds.push(Keybind {
            command: BaseCommand::ViewTag,
            value: "99".to_string(),
            modifier: vec!["Mod4".to_string()],
            key: "x".to_string(),
        });
        assert!(config.validate().is_err(), "tag 99 does not exist");

        let mut config = Config::default();
        config.keybinds.push(Keybind {
            command: BaseCommand::Quit,
            value: String::new(),
            modifier: vec![],
            key: "NotAKey".to_string(),
        });
        assert!(config.validate().is_err(), "unknown key names must be rejected");
    }

    #[test]
    fn rules_match_on_substrings_of_all_given_fields() {
        let rule = Rule {
            class: Some("Gimp".to_string()),
            title: Some("Layers".to_string()),
            ..Rule::default()
        };
        assert!(rule.matches("Gimp-2.10", "gimp", "Layers - image.xcf"));
        assert!(!rule.matches("Gimp-2.10", "gimp", "Toolbox"));
        let unconstrained = Rule::default();
        assert!(unconstrained.matches("anything", "at", "all"));
    }
}
