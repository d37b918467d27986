//! Starts the tatami window manager.
//!
//! `tatami -v` prints the version, anything else prints usage; both exit
//! non-zero, matching the traditional contract of minimalist window
//! managers. With no arguments the window manager runs until `quit`.
mod logging;

use anyhow::Context;
use std::env;
use std::process::exit;
use tatami_core::{Config, Manager};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() == 2 && args[1] == "-v" {
        eprintln!("tatami-{VERSION}");
        exit(1);
    } else if args.len() != 1 {
        eprintln!("usage: tatami [-v]");
        exit(1);
    }

    logging::setup_logging();
    tracing::info!("tatami-{} booting", VERSION);

    if let Err(err) = run() {
        tracing::error!("{err:#}");
        eprintln!("tatami: {err:#}");
        exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    let mut manager = Manager::new(config).context("connecting to the X server")?;
    manager.setup().context("starting the window manager")?;
    manager.scan();
    manager.run();
    manager.cleanup();
    manager.xwrap.close();
    tracing::info!("clean shutdown");
    Ok(())
}
