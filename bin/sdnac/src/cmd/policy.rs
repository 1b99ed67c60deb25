//! Inspect the access policy defined by a dataset.
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;

use crate::errors::DatasetNotConfigured;
use crate::Globals;

/// Inspect the access policy defined by a dataset.
#[derive(Debug, Parser)]
pub struct PolicyCli {
    /// Select the `sdnac policy` command to run.
    #[command(subcommand)]
    pub command: PolicyCmd,
}

/// Select the `sdnac policy` command to run.
#[derive(Debug, Subcommand)]
pub enum PolicyCmd {
    /// List course references to students, servers or services that do not exist.
    Check,

    /// List every service access the policy currently grants.
    Report,
}

/// Execute the selected `sdnac policy` command.
pub async fn run(globals: &Globals, cmd: &PolicyCli) -> Result<i32> {
    let command = match cmd.command {
        PolicyCmd::Check => "policy check",
        PolicyCmd::Report => "policy report",
    };
    let policy = match globals.policy()? {
        Some(policy) => policy,
        None => anyhow::bail!(DatasetNotConfigured::new(command)),
    };

    match cmd.command {
        PolicyCmd::Check => {
            let dangling = policy.check();
            if dangling.is_empty() {
                println!("All course references resolve to known entities");
                return Ok(0);
            }
            println!("{}", crate::formatter::dangling(&dangling));
            Ok(1)
        }
        PolicyCmd::Report => {
            println!("{}", crate::formatter::grants(&policy.report()));
            Ok(0)
        }
    }
}
