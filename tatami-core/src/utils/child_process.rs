//! Spawning user commands and reaping the zombies they leave behind.
use std::collections::HashMap;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

type ChildId = u32;

/// The children we have spawned and not yet reaped.
#[derive(Debug, Default)]
pub struct Children {
    inner: HashMap<ChildId, Child>,
}

impl Children {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Tracks a child. Returns `true` if it was not already known.
    pub fn insert(&mut self, child: Child) -> bool {
        self.inner.insert(child.id(), child).is_none()
    }

    /// Non-blocking reap of every child that has exited.
    pub fn remove_finished_children(&mut self) {
        self.inner
            .retain(|_, child| child.try_wait().map_or(true, |ret| ret.is_none()));
    }
}

/// Registers the `SIGCHLD` hook: the flag flips when a child exits, and the
/// event loop reaps on the next pass.
pub fn register_child_hook(flag: Arc<AtomicBool>) {
    let _ = signal_hook::flag::register(signal_hook::consts::signal::SIGCHLD, flag)
        .map_err(|err| tracing::error!("cannot register SIGCHLD hook: {:?}", err));
}

/// Hands a command line to the shell, detached from our stdio.
pub fn exec_shell(command: &str, children: &mut Children) -> Option<u32> {
    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|err| tracing::error!("failed to spawn {command:?}: {err}"))
        .ok()?;
    let pid = child.id();
    children.insert(child);
    Some(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_children_are_reaped() {
        let mut children = Children::new();
        exec_shell("true", &mut children).expect("spawning `true` should work");
        assert_eq!(children.len(), 1);
        // `true` exits almost immediately; wait for it before reaping.
        std::thread::sleep(std::time::Duration::from_millis(50));
        children.remove_finished_children();
        assert!(children.is_empty(), "an exited child must be reaped");
    }
}
