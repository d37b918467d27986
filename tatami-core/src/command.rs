//! User-facing operations, each carrying its typed payload. The config
//! layer parses its string form into these; the command handler executes
//! them against the live state.
use crate::layouts::LayoutKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Swap to the view containing only this tag index.
    ViewTag(usize),
    /// Make every tag visible at once.
    ViewAll,
    /// Swap back to the previously visible tag-set.
    ViewPrevious,
    /// XOR a tag in or out of the current view.
    ToggleViewTag(usize),
    /// Retag the selected client with exactly this tag.
    MoveToTag(usize),
    /// XOR a tag on the selected client.
    ToggleClientTag(usize),
    /// Move focus through the visible clients in insertion order.
    FocusStack(i32),
    /// Move the selection to the next/previous monitor.
    FocusMonitor(i32),
    /// Send the selected client to the next/previous monitor.
    MoveToMonitor(i32),
    /// Swap the selected client with the master, or promote it.
    Zoom,
    /// Delta below 1.0 in magnitude, absolute otherwise (offset by 1).
    SetMasterFactor(f32),
    IncMasterCount(i32),
    SetLayout(LayoutKind),
    ToggleFloating,
    ToggleBar,
    /// Grow or shrink the gaps; zero resets them.
    ChangeGap(i32),
    /// Politely ask the selected client to close, killing it if it refuses
    /// to speak `WM_DELETE_WINDOW`.
    CloseClient,
    /// Modal pointer drag moving the selected client.
    MoveMouse,
    /// Modal pointer drag resizing the selected client.
    ResizeMouse,
    /// Spawn a command line through the shell. A `{monitor}` placeholder is
    /// replaced with the selected monitor's number before spawning.
    Execute(String),
    Quit,
}
