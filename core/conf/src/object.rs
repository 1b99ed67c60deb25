//! Data object storing the process configuration.
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::ControllerConf;

/// Global configuration for the SDN access control process.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Conf {
    /// SDN controller client configuration.
    #[serde(default)]
    pub controller: ControllerConf,

    /// Options for flows installed to provision connections.
    #[serde(default)]
    pub flows: FlowsConf,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConf,

    /// Policy dataset configuration.
    #[serde(default)]
    pub policy: PolicyConf,
}

/// Options for flows installed to provision connections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowsConf {
    /// Cookie attached to every installed flow.
    #[serde(default)]
    pub cookie: u64,

    /// Priority of installed flows.
    #[serde(default = "FlowsConf::default_priority")]
    pub priority: u16,

    /// Delete flows already pushed when provisioning a connection fails part way.
    #[serde(default)]
    pub rollback_partial: bool,
}

impl FlowsConf {
    fn default_priority() -> u16 {
        32768
    }
}

impl Default for FlowsConf {
    fn default() -> Self {
        FlowsConf {
            cookie: 0,
            priority: Self::default_priority(),
            rollback_partial: false,
        }
    }
}

/// Verbosity levels for process logs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConf {
    /// Minimum level of log events to emit.
    #[serde(default)]
    pub level: LogLevel,
}

/// Policy dataset configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConf {
    /// Path to a YAML dataset to import on start.
    #[serde(default)]
    pub dataset: Option<String>,
}
