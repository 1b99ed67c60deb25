//! SDN controller API client for the HTTP(S) protocol.
//!
//! Requests follow the Floodlight REST API layout:
//!
//! - `GET wm/core/controller/switches/json`
//! - `GET wm/device/`
//! - `GET wm/topology/route/{src}/{src_port}/{dst}/{dst_port}/json`
//! - `POST` and `DELETE wm/staticflowpusher/json`
use anyhow::Context;
use anyhow::Result;
use reqwest::Client as ReqwestClient;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use sdnac_client_utils::InvalidResponse;
use sdnac_client_utils::RequestRejected;
use sdnac_controller_client::AttachmentPoint;
use sdnac_controller_client::ControllerRejected;
use sdnac_controller_client::ControllerUnreachable;
use sdnac_controller_client::Device;
use sdnac_controller_client::FlowDescriptor;
use sdnac_controller_client::IController;
use sdnac_controller_client::RouteHop;
use sdnac_controller_client::Switch;

pub use sdnac_client_utils::ClientOptions;

#[cfg(test)]
mod tests;

/// String to set as the user agent in HTTP request.
static CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// SDN controller API client for the HTTP(S) protocol.
pub struct HttpClient {
    /// Base URL of the API server to send requests to.
    base: String,

    /// Low-level [`Client`](reqwest::Client) to perform HTTP requests with.
    client: ReqwestClient,
}

impl HttpClient {
    /// Initialise a client with [`ClientOptions`].
    pub fn with<O>(options: O) -> Result<HttpClient>
    where
        O: Into<ClientOptions>,
    {
        let options = options.into();
        let client = options.client(CLIENT_USER_AGENT);
        let client = HttpClient {
            base: options.address,
            client: client.build()?,
        };
        Ok(client)
    }
}

impl HttpClient {
    /// Send a request and decode the response, classifying failures.
    async fn send<T>(&self, operation: &str, request: RequestBuilder) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .with_context(|| ControllerUnreachable::new(operation))?;
        sdnac_client_utils::inspect(response)
            .await
            .map_err(|error| classify(error, operation))
    }

    /// Send a static flow pusher request and check its acknowledgement.
    async fn send_flow(&self, operation: &str, request: RequestBuilder) -> Result<()> {
        let ack: Option<FlowAck> = self.send(operation, request).await?;
        match ack {
            Some(ack) if ack.is_error() => {
                anyhow::bail!(ControllerRejected::new(operation, ack.status))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl IController for HttpClient {
    async fn delete_flow(&self, switch: &str, name: &str) -> Result<()> {
        let body = FlowRef { name, switch };
        let request = self
            .client
            .delete(format!("{}wm/staticflowpusher/json", self.base))
            .json(&body);
        self.send_flow("delete static flow", request).await
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        let operation = "list devices";
        let request = self.client.get(format!("{}wm/device/", self.base));
        match self.send::<DeviceList>(operation, request).await? {
            None => Err(empty(operation)),
            Some(DeviceList::Bare(devices)) => Ok(devices),
            Some(DeviceList::Wrapped { devices }) => Ok(devices),
        }
    }

    async fn push_flow(&self, flow: &FlowDescriptor) -> Result<()> {
        let request = self
            .client
            .post(format!("{}wm/staticflowpusher/json", self.base))
            .json(flow);
        self.send_flow("push static flow", request).await
    }

    async fn route(
        &self,
        src: &AttachmentPoint,
        dst: &AttachmentPoint,
    ) -> Result<Vec<RouteHop>> {
        let request = self.client.get(format!(
            "{}wm/topology/route/{}/{}/{}/{}/json",
            self.base, src.switch, src.port, dst.switch, dst.port,
        ));
        let hops = self.send::<Vec<RouteHop>>("compute route", request).await?;
        Ok(hops.unwrap_or_default())
    }

    async fn switches(&self) -> Result<Vec<Switch>> {
        let operation = "list switches";
        let request = self
            .client
            .get(format!("{}wm/core/controller/switches/json", self.base));
        match self.send::<Vec<Switch>>(operation, request).await? {
            None => Err(empty(operation)),
            Some(switches) => Ok(switches),
        }
    }
}

/// Device inventories are returned as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeviceList {
    Bare(Vec<Device>),
    Wrapped { devices: Vec<Device> },
}

/// Acknowledgement returned by the static flow pusher.
#[derive(Deserialize)]
struct FlowAck {
    #[serde(default)]
    status: String,
}

impl FlowAck {
    /// The static flow pusher answers 200 even when it refuses or discards an entry.
    fn is_error(&self) -> bool {
        let status = self.status.to_lowercase();
        ["error", "warning", "discarded"]
            .iter()
            .any(|marker| status.contains(marker))
    }
}

/// Identify a static flow to delete.
#[derive(Serialize)]
struct FlowRef<'a> {
    name: &'a str,
    switch: &'a str,
}

/// Attach the controller failure class to an error from [`sdnac_client_utils::inspect`].
fn classify(error: anyhow::Error, operation: &str) -> anyhow::Error {
    let reason = error
        .downcast_ref::<RequestRejected>()
        .map(|rejected| rejected.to_string());
    match reason {
        Some(reason) => error.context(ControllerRejected::new(operation, reason)),
        None => error.context(ControllerUnreachable::new(operation)),
    }
}

/// A listing endpoint returned no payload at all.
fn empty(operation: &str) -> anyhow::Error {
    anyhow::anyhow!(sdnac_client_utils::EmptyResponse)
        .context(InvalidResponse {
            response: String::new(),
        })
        .context(ControllerUnreachable::new(operation))
}
