//! CLI interface for SDN network access control.
use clap::Args;
use clap::Parser;
use clap::Subcommand;

pub mod network;
pub mod policy;

use crate::logging::LogOpt;
use crate::shell::ShellCli;

/// Configuration file used when none is given explicitly.
pub const DEFAULT_CONFIG: &str = "sdnac.yaml";

/// CLI definition for the sdnac binary.
#[derive(Debug, Parser)]
#[command(about)]
#[command(propagate_version = true)]
#[command(version)]
pub struct Cli {
    /// Select the `sdnac` command to run.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration sources and overrides.
    #[command(flatten)]
    pub conf: ConfOpt,

    /// Configure process logging.
    #[command(flatten)]
    pub log: LogOpt,
}

/// Select the `sdnac` command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect the network as seen by the SDN controller.
    #[command(alias = "net")]
    Network(network::NetworkCli),

    /// Inspect the access policy defined by a dataset.
    Policy(policy::PolicyCli),

    /// Manage policies and connections through an interactive menu.
    Shell(ShellCli),
}

/// Configuration sources and overrides.
#[derive(Args, Debug)]
pub struct ConfOpt {
    /// Path to the sdnac configuration file.
    #[arg(long = "config", global = true, env = "SDNAC_CONFIG")]
    pub config: Option<String>,

    /// Base URL of the SDN controller REST API.
    #[arg(long = "controller", global = true, env = "SDNAC_CONTROLLER")]
    pub controller: Option<String>,

    /// Path to a YAML policy dataset to load on start.
    #[arg(long = "dataset", global = true, env = "SDNAC_DATASET")]
    pub dataset: Option<String>,
}
