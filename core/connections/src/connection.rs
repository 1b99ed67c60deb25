//! Connections provisioned on the network.
use std::fmt;

use sdnac_controller_client::AttachmentPoint;
use sdnac_policy::MacAddress;

/// Unique identifier of a connection and of the flows provisioned for it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Handler(u64);

impl Handler {
    pub fn new(id: u64) -> Self {
        Handler(id)
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Student access to a server service backed by flows installed on the network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connection {
    /// Whether the connection flows are believed installed.
    pub active: bool,

    /// Where the student's device was attached when the connection was provisioned.
    pub attachment: AttachmentPoint,

    pub handler: Handler,

    /// Hardware address of the student's device when the connection was provisioned.
    pub mac: MacAddress,

    pub server: String,
    pub service: String,
    pub student: String,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "ACTIVE" } else { "INACTIVE" };
        write!(
            f,
            "{}: {} -> {}:{} [{}]",
            self.handler, self.student, self.server, self.service, state
        )
    }
}
