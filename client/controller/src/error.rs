//! Errors during controller interactions.

/// The controller responded but declined the operation.
#[derive(Debug, thiserror::Error)]
#[error("the SDN controller rejected the request to {operation}: {reason}")]
pub struct ControllerRejected {
    pub operation: String,
    pub reason: String,
}

impl ControllerRejected {
    /// The controller responded but declined the operation.
    pub fn new<S1: Into<String>, S2: Into<String>>(operation: S1, reason: S2) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// The controller could not be reached or returned a malformed response.
#[derive(Debug, thiserror::Error)]
#[error("unable to reach the SDN controller to {operation}")]
pub struct ControllerUnreachable {
    pub operation: String,
}

impl ControllerUnreachable {
    /// The controller could not be reached or returned a malformed response.
    pub fn new<S: Into<String>>(operation: S) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}
