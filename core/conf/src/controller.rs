//! Configuration of the SDN controller client.
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// How to reach the SDN controller REST API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerConf {
    /// Allowed time, in seconds, for each request to the controller to complete.
    #[serde(default = "ControllerConf::default_timeout")]
    pub timeout_sec: u64,

    /// Allowed time, in seconds, to establish new connections to the controller.
    #[serde(default = "ControllerConf::default_timeout_connect")]
    pub timeout_connect_sec: u64,

    /// Base URL of the controller REST API.
    #[serde(default = "ControllerConf::default_url")]
    pub url: String,
}

impl ControllerConf {
    fn default_timeout() -> u64 {
        5
    }

    fn default_timeout_connect() -> u64 {
        1
    }

    fn default_url() -> String {
        String::from("http://127.0.0.1:8080/")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    pub fn timeout_connect(&self) -> Duration {
        Duration::from_secs(self.timeout_connect_sec)
    }
}

impl Default for ControllerConf {
    fn default() -> Self {
        ControllerConf {
            timeout_sec: Self::default_timeout(),
            timeout_connect_sec: Self::default_timeout_connect(),
            url: Self::default_url(),
        }
    }
}
