//! Manage network access policies and student connections from a Command Line Interface.
use anyhow::Result;
use clap::Parser;

mod cmd;
mod formatter;
mod globals;
mod logging;
mod shell;

pub mod errors;

use self::cmd::Cli;
use self::globals::Globals;

// Re-export errors so main can provide more accurate messages.
pub use sdnac_conf::Error as ConfError;
pub use sdnac_controller_client::ControllerRejected;
pub use sdnac_controller_client::ControllerUnreachable;
pub use sdnac_policy::DatasetError;

/// Initialise the sdnac process and invoke a command implementation.
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let globals = Globals::initialise(cli)?;

    match &globals.cli.command {
        cmd::Command::Network(cmd) => cmd::network::run(&globals, cmd).await,
        cmd::Command::Policy(cmd) => cmd::policy::run(&globals, cmd).await,
        cmd::Command::Shell(cmd) => shell::run(&globals, cmd).await,
    }
}
