//! Data exchanged with the SDN controller.
use std::fmt;
use std::net::Ipv4Addr;

use serde::de::Error as _;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Location where a device is connected to the network fabric.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct AttachmentPoint {
    /// DPID of the switch the device is connected to.
    #[serde(alias = "switchDPID")]
    pub switch: String,

    /// Switch port the device is connected to.
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u32,
}

impl AttachmentPoint {
    pub fn new<S: Into<String>>(switch: S, port: u32) -> Self {
        AttachmentPoint {
            switch: switch.into(),
            port,
        }
    }
}

impl fmt::Display for AttachmentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.switch, self.port)
    }
}

/// Device record from the controller's device inventory.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Attachment points the controller observed the device at, most relevant first.
    #[serde(default, rename = "attachmentPoint")]
    pub attachment_points: Vec<AttachmentPoint>,

    /// IPv4 addresses observed for the device.
    #[serde(default)]
    pub ipv4: Vec<String>,

    /// Hardware addresses reported for the device, as the controller formats them.
    #[serde(default)]
    pub mac: Vec<String>,
}

/// Ethernet frame types matched by flows.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum EtherType {
    #[serde(rename = "0x0806")]
    Arp,

    #[serde(rename = "0x0800")]
    Ipv4,
}

/// IP protocol numbers matched by flows.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum IpProto {
    #[serde(rename = "0x06")]
    Tcp,

    #[serde(rename = "0x11")]
    Udp,
}

/// Forwarding action applied to packets matching a flow.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FlowAction {
    /// Send out of every port except the ingress one.
    Flood,

    /// Send out of the given switch port.
    Output(u32),
}

impl fmt::Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowAction::Flood => write!(f, "output=flood"),
            FlowAction::Output(port) => write!(f, "output={}", port),
        }
    }
}

impl Serialize for FlowAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Static flow entry to install on (or remove from) a switch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FlowDescriptor {
    /// Action applied to matching packets.
    pub actions: FlowAction,

    /// Whether the flow is enabled once installed.
    pub active: bool,

    /// Opaque value attached to the flow for bookkeeping.
    pub cookie: u64,

    /// Packet fields the flow matches on.
    #[serde(flatten)]
    pub matches: FlowMatch,

    /// Name of the flow, used to delete it later.
    pub name: String,

    /// Priority of the flow over overlapping entries.
    pub priority: u16,

    /// DPID of the switch to install the flow on.
    pub switch: String,
}

/// Match fields of a static flow entry.
///
/// Fields set to `None` are not part of the match and are omitted from the flow document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FlowMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_spa: Option<Ipv4Addr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_tha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp_tpa: Option<Ipv4Addr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_dst: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_src: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_type: Option<EtherType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_port: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_proto: Option<IpProto>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_dst: Option<Ipv4Addr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_src: Option<Ipv4Addr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_dst: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_src: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_dst: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_src: Option<u16>,
}

/// One hop along a route computed by the controller.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RouteHop {
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u32,

    #[serde(alias = "switchDPID", alias = "dpid")]
    pub switch: String,
}

/// Switch connected to the controller.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    #[serde(rename = "switchDPID", alias = "dpid")]
    pub dpid: String,

    #[serde(default, rename = "inetAddress")]
    pub inet_address: Option<String>,
}

/// Controllers report port numbers as numbers, strings or `{"portNumber": N}` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u32),
    Text(String),
    Object {
        #[serde(rename = "portNumber")]
        port_number: u32,
    },
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(port) => Ok(port),
        PortRepr::Object { port_number } => Ok(port_number),
        PortRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid switch port '{}'", text))),
    }
}
