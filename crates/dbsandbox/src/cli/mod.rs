//! The `dbsandbox` command line.

mod progress;
mod unpack;

use clap::{Parser, Subcommand};
use dbsandbox_archive::Verbosity;

use crate::error::UnpackError;

pub use progress::EntryTracker;
pub use unpack::UnpackArg;

#[derive(Clone, Debug, Parser)]
#[command(name = "dbsandbox", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(
        name = "unpack",
        visible_aliases = ["extract", "untar", "unzip", "inflate", "expand"],
        about = "unpack a tarball into the sandbox binary directory"
    )]
    Unpack(UnpackArg),
}

impl App {
    /// Verbosity requested on the command line, used to set up logging.
    pub fn verbosity(&self) -> Verbosity {
        match &self.cmd {
            Commands::Unpack(arg) => arg.verbosity(),
        }
    }

    pub fn execute(self) -> anyhow::Result<()> {
        match self.cmd {
            Commands::Unpack(arg) => arg.run(),
        }
    }
}

/// One line for the whole error chain. Causes already quoted by an outer
/// message are skipped.
pub fn render_error(err: &anyhow::Error) -> String {
    let mut rendered = String::new();
    for cause in err.chain() {
        let message = cause.to_string();
        if rendered.contains(&message) {
            continue;
        }
        if !rendered.is_empty() {
            rendered.push_str(": ");
        }
        rendered.push_str(&message);
    }
    rendered
}

pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<UnpackError>())
        .map_or(1, UnpackError::exit_code)
}
