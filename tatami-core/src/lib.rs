//! Core window management logic for tatami.
// We deny clippy pedantic lints, primarily to keep code as correct as
// possible. Remember, the goal of tatami is to do one thing and to do that
// one thing well: be a window manager.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise. X geometry is a soup of i32/u32/c_int conversions and the casts
// are unavoidable.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod bar;
pub mod command;
pub mod config;
pub mod drw;
mod event_loop;
mod handlers;
pub mod layouts;
mod manager;
pub mod models;
pub mod state;
pub mod utils;
pub mod xwrap;

pub use command::Command;
pub use config::Config;
pub use manager::Manager;
pub use state::State;
pub use xwrap::XWrap;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TatamiError>;

#[derive(Debug, Error)]
pub enum TatamiError {
    #[error("config parsing error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XDG error: {0}")]
    XdgBaseDir(#[from] xdg::BaseDirectoriesError),
    #[error("cannot open X display")]
    DisplayNotFound,
    #[error("no fonts could be loaded")]
    NoFonts,
    #[error("cannot allocate color {0:?}")]
    ColorAllocation(String),
    #[error("unknown key name: {0}")]
    UnknownKey(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid binding value: {0}")]
    InvalidBindingValue(String),
}
