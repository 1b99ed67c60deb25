//! Async client library to interact with the REST API of an SDN controller.
//!
//! The client exposes the controller operations network access control depends on:
//! switch and device inventory, route computation and static flow management.
//! Failures are reported as [`anyhow::Error`]s carrying either a [`ControllerUnreachable`]
//! or a [`ControllerRejected`] context so callers can tell them apart.
use anyhow::Result;

mod error;
mod models;

#[cfg(any(test, feature = "test-fixture"))]
pub mod fixture;

pub use self::error::ControllerRejected;
pub use self::error::ControllerUnreachable;
pub use self::models::AttachmentPoint;
pub use self::models::Device;
pub use self::models::EtherType;
pub use self::models::FlowAction;
pub use self::models::FlowDescriptor;
pub use self::models::FlowMatch;
pub use self::models::IpProto;
pub use self::models::RouteHop;
pub use self::models::Switch;

/// Async API client to SDN controllers.
pub struct Client {
    backend: Box<dyn IController>,
}

impl Client {
    /// Remove a static flow entry, by name, from a switch.
    pub async fn delete_flow(&self, switch: &str, name: &str) -> Result<()> {
        self.backend.delete_flow(switch, name).await
    }

    /// List devices known to the controller with their attachment points.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.backend.devices().await
    }

    /// Install a static flow entry on the switch it names.
    pub async fn push_flow(&self, flow: &FlowDescriptor) -> Result<()> {
        self.backend.push_flow(flow).await
    }

    /// Compute the shortest path between two attachment points.
    ///
    /// An empty list is returned when the controller knows no route.
    pub async fn route(
        &self,
        src: &AttachmentPoint,
        dst: &AttachmentPoint,
    ) -> Result<Vec<RouteHop>> {
        self.backend.route(src, dst).await
    }

    /// List switches connected to the controller.
    pub async fn switches(&self) -> Result<Vec<Switch>> {
        self.backend.switches().await
    }
}

impl<C> From<C> for Client
where
    C: IController + 'static,
{
    fn from(value: C) -> Self {
        let backend = Box::new(value);
        Client { backend }
    }
}

/// Interface to SDN controller API clients.
///
/// Enables implementation of controller clients across different controllers and transports.
#[async_trait::async_trait]
pub trait IController: Send + Sync {
    /// Remove a static flow entry, by name, from a switch.
    async fn delete_flow(&self, switch: &str, name: &str) -> Result<()>;

    /// List devices known to the controller with their attachment points.
    async fn devices(&self) -> Result<Vec<Device>>;

    /// Install a static flow entry on the switch it names.
    async fn push_flow(&self, flow: &FlowDescriptor) -> Result<()>;

    /// Compute the shortest path between two attachment points.
    async fn route(
        &self,
        src: &AttachmentPoint,
        dst: &AttachmentPoint,
    ) -> Result<Vec<RouteHop>>;

    /// List switches connected to the controller.
    async fn switches(&self) -> Result<Vec<Switch>>;
}
