//! Errors encountered while provisioning or tearing down connections.
use sdnac_policy::MacAddress;

use crate::Handler;

/// The student's device is not attached to the network.
#[derive(Debug, thiserror::Error)]
#[error("no attachment point known for device '{mac}'")]
pub struct AttachmentNotFound {
    pub mac: MacAddress,
}

impl AttachmentNotFound {
    /// The student's device is not attached to the network.
    pub fn new(mac: MacAddress) -> Self {
        Self { mac }
    }
}

/// Provisioning failed after some flows were installed.
///
/// The listed flows may still be installed on the switch.
#[derive(Debug, thiserror::Error)]
#[error("provisioning of connection {handler} failed after installing flows {applied:?}")]
pub struct PartialProvisioning {
    pub applied: Vec<String>,
    pub handler: Handler,
}

/// Teardown failed after some flows were deleted.
///
/// The connection record is kept so teardown can be attempted again.
#[derive(Debug, thiserror::Error)]
#[error("teardown of connection {handler} failed after deleting flows {removed:?}")]
pub struct PartialTeardown {
    pub handler: Handler,
    pub removed: Vec<String>,
}

/// The policy does not allow the student to reach the service.
#[derive(Debug, thiserror::Error)]
#[error("student '{student}' is not authorised to access '{service}' on server '{server}'")]
pub struct Unauthorized {
    pub server: String,
    pub service: String,
    pub student: String,
}

impl Unauthorized {
    /// The policy does not allow the student to reach the service.
    pub fn new<S1, S2, S3>(student: S1, server: S2, service: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            server: server.into(),
            service: service.into(),
            student: student.into(),
        }
    }
}

/// No connection is recorded for the handler.
#[derive(Debug, thiserror::Error)]
#[error("no connection with handler {handler}")]
pub struct UnknownConnection {
    pub handler: Handler,
}

impl UnknownConnection {
    /// No connection is recorded for the handler.
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }
}
