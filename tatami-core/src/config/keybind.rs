//! Key and mouse bindings as written in the config file. A binding names a
//! [`BaseCommand`] plus a string value; the pair is validated and resolved
//! into a typed [`Command`] when the config is loaded.
use crate::command::Command;
use crate::layouts::LayoutKind;
use crate::{Result, TatamiError};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseCommand {
    ViewTag,
    ViewAll,
    ViewPrevious,
    ToggleViewTag,
    MoveToTag,
    ToggleClientTag,
    FocusStack,
    FocusMonitor,
    MoveToMonitor,
    Zoom,
    SetMasterFactor,
    IncMasterCount,
    SetLayout,
    ToggleFloating,
    ToggleBar,
    ChangeGap,
    CloseClient,
    MoveMouse,
    ResizeMouse,
    Execute,
    Quit,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Keybind {
    pub command: BaseCommand,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub modifier: Vec<String>,
    pub key: String,
}

impl Keybind {
    /// Resolves the binding into a typed command, validating the value.
    ///
    /// # Errors
    ///
    /// Errors when the value does not parse for the named command or names
    /// a tag outside the configured range.
    pub fn command(&self, tag_count: usize) -> Result<Command> {
        resolve(self.command, &self.value, tag_count)
    }
}

/// Where on the screen a mouse binding applies.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    TagBar,
    LayoutSymbol,
    StatusText,
    WinTitle,
    ClientWin,
    RootWin,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MouseBind {
    pub target: ClickTarget,
    #[serde(default)]
    pub modifier: Vec<String>,
    /// X button number, 1 through 5.
    pub button: u32,
    pub command: BaseCommand,
    #[serde(default)]
    pub value: String,
}

impl MouseBind {
    /// Resolves the binding into a typed command, validating the value.
    ///
    /// # Errors
    ///
    /// Errors when the value does not parse for the named command or names
    /// a tag outside the configured range.
    pub fn command(&self, tag_count: usize) -> Result<Command> {
        resolve(self.command, &self.value, tag_count)
    }
}

fn resolve(base: BaseCommand, value: &str, tag_count: usize) -> Result<Command> {
    let invalid = || TatamiError::InvalidBindingValue(format!("{base:?}: {value:?}"));
    let tag_index = || -> Result<usize> {
        let index: usize = value.parse().map_err(|_| invalid())?;
        if index >= tag_count {
            return Err(invalid());
        }
        Ok(index)
    };
    let signed = || -> Result<i32> { value.parse().map_err(|_| invalid()) };

    let command = match base {
        BaseCommand::ViewTag => Command::ViewTag(tag_index()?),
        BaseCommand::ViewAll => Command::ViewAll,
        BaseCommand::ViewPrevious => Command::ViewPrevious,
        BaseCommand::ToggleViewTag => Command::ToggleViewTag(tag_index()?),
        BaseCommand::MoveToTag => Command::MoveToTag(tag_index()?),
        BaseCommand::ToggleClientTag => Command::ToggleClientTag(tag_index()?),
        BaseCommand::FocusStack => Command::FocusStack(signed()?),
        BaseCommand::FocusMonitor => Command::FocusMonitor(signed()?),
        BaseCommand::MoveToMonitor => Command::MoveToMonitor(signed()?),
        BaseCommand::Zoom => Command::Zoom,
        BaseCommand::SetMasterFactor => {
            Command::SetMasterFactor(value.parse().map_err(|_| invalid())?)
        }
        BaseCommand::IncMasterCount => Command::IncMasterCount(signed()?),
        BaseCommand::SetLayout => match value {
            "tile" => Command::SetLayout(LayoutKind::Tile),
            "monocle" => Command::SetLayout(LayoutKind::Monocle),
            "floating" => Command::SetLayout(LayoutKind::Floating),
            _ => return Err(invalid()),
        },
        BaseCommand::ToggleFloating => Command::ToggleFloating,
        BaseCommand::ToggleBar => Command::ToggleBar,
        BaseCommand::ChangeGap => Command::ChangeGap(signed()?),
        BaseCommand::CloseClient => Command::CloseClient,
        BaseCommand::MoveMouse => Command::MoveMouse,
        BaseCommand::ResizeMouse => Command::ResizeMouse,
        BaseCommand::Execute => {
            if value.is_empty() {
                return Err(invalid());
            }
            Command::Execute(value.to_string())
        }
        BaseCommand::Quit => Command::Quit,
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keybind(command: BaseCommand, value: &str) -> Keybind {
        Keybind {
            command,
            value: value.to_string(),
            modifier: vec!["Mod4".to_string()],
            key: "x".to_string(),
        }
    }

    #[test]
    fn tag_commands_validate_the_tag_range() {
        assert_eq!(
            keybind(BaseCommand::ViewTag, "3").command(9).unwrap(),
            Command::ViewTag(3)
        );
        assert!(
            keybind(BaseCommand::ViewTag, "9").command(9).is_err(),
            "tag index past the configured tags must be rejected"
        );
        assert!(keybind(BaseCommand::MoveToTag, "banana").command(9).is_err());
    }

    #[test]
    fn layout_names_resolve_to_layout_kinds() {
        assert_eq!(
            keybind(BaseCommand::SetLayout, "monocle").command(9).unwrap(),
            Command::SetLayout(LayoutKind::Monocle)
        );
        assert!(keybind(BaseCommand::SetLayout, "spiral").command(9).is_err());
    }

    #[test]
    fn execute_requires_a_command_line() {
        assert!(keybind(BaseCommand::Execute, "").command(9).is_err());
        assert_eq!(
            keybind(BaseCommand::Execute, "st").command(9).unwrap(),
            Command::Execute("st".to_string())
        );
    }

    #[test]
    fn signed_values_accept_negatives() {
        assert_eq!(
            keybind(BaseCommand::FocusStack, "-1").command(9).unwrap(),
            Command::FocusStack(-1)
        );
        assert_eq!(
            keybind(BaseCommand::SetMasterFactor, "-0.05").command(9).unwrap(),
            Command::SetMasterFactor(-0.05)
        );
    }
}
