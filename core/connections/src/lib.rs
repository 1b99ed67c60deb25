//! Authorise student access to server services and provision it on the network.
//!
//! Provisioning a connection goes through the following steps:
//!
//! 1. Check the student, server and service exist.
//! 2. Check the policy authorises the student to reach the service.
//! 3. Allocate a new [`Handler`] for the connection.
//! 4. Find where the student's device is attached to the network.
//! 5. Compile and push the four flows that allow bidirectional traffic.
//!
//! Tearing a connection down finds the student's device again and deletes the same flows.
mod attachment;
mod connection;
mod errors;
mod flows;
mod manager;

#[cfg(test)]
mod tests;

pub use self::attachment::resolve_attachment;
pub use self::connection::Connection;
pub use self::connection::Handler;
pub use self::errors::AttachmentNotFound;
pub use self::errors::PartialProvisioning;
pub use self::errors::PartialTeardown;
pub use self::errors::Unauthorized;
pub use self::errors::UnknownConnection;
pub use self::flows::compile_flows;
pub use self::flows::flow_names;
pub use self::flows::FlowKind;
pub use self::flows::FlowOptions;
pub use self::manager::ConnectionManager;

pub use sdnac_policy::UnknownEntity;
