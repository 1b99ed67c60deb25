//! Compile the flows that realise a connection on the network.
use sdnac_controller_client::AttachmentPoint;
use sdnac_controller_client::EtherType;
use sdnac_controller_client::FlowAction;
use sdnac_controller_client::FlowDescriptor;
use sdnac_controller_client::FlowMatch;
use sdnac_controller_client::IpProto;
use sdnac_policy::Protocol;
use sdnac_policy::Server;
use sdnac_policy::Service;
use sdnac_policy::Student;

use crate::Handler;

/// Options applied to every compiled flow.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlowOptions {
    pub cookie: u64,
    pub priority: u16,
}

impl Default for FlowOptions {
    fn default() -> Self {
        FlowOptions {
            cookie: 0,
            priority: 32768,
        }
    }
}

/// The flows provisioned for each connection, in installation order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FlowKind {
    /// ARP requests from the student towards the server, flooded.
    ArpRequest,

    /// ARP replies from the server to the student.
    ArpReply,

    /// Traffic from the student to the server service, flooded.
    Outbound,

    /// Traffic from the server service back to the student.
    Inbound,
}

impl FlowKind {
    pub const ALL: [FlowKind; 4] = [
        FlowKind::ArpRequest,
        FlowKind::ArpReply,
        FlowKind::Outbound,
        FlowKind::Inbound,
    ];

    /// Name of this flow for the connection with the given handler.
    pub fn name(&self, handler: Handler) -> String {
        format!("{}_{}", handler, self.suffix())
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            FlowKind::ArpRequest => "arp_request",
            FlowKind::ArpReply => "arp_reply",
            FlowKind::Outbound => "outbound",
            FlowKind::Inbound => "inbound",
        }
    }
}

/// Names of the flows provisioned for a connection, in installation order.
pub fn flow_names(handler: Handler) -> [String; 4] {
    FlowKind::ALL.map(|kind| kind.name(handler))
}

/// Compile the flows granting the student bidirectional access to the server service.
///
/// The server's own attachment point is not known, so traffic towards the server is flooded
/// while traffic back to the student is sent out of the student's switch port.
pub fn compile_flows(
    options: &FlowOptions,
    handler: Handler,
    student: &Student,
    server: &Server,
    service: &Service,
    attachment: &AttachmentPoint,
) -> [FlowDescriptor; 4] {
    let mac = student.mac.to_string();
    let port = service.port.get();
    FlowKind::ALL.map(|kind| {
        let (matches, actions) = match kind {
            FlowKind::ArpRequest => {
                let matches = FlowMatch {
                    arp_tpa: Some(server.ip),
                    eth_type: Some(EtherType::Arp),
                    in_port: Some(attachment.port),
                    ..Default::default()
                };
                (matches, FlowAction::Flood)
            }
            FlowKind::ArpReply => {
                let matches = FlowMatch {
                    arp_spa: Some(server.ip),
                    arp_tha: Some(mac.clone()),
                    eth_type: Some(EtherType::Arp),
                    ..Default::default()
                };
                (matches, FlowAction::Output(attachment.port))
            }
            FlowKind::Outbound => {
                let mut matches = FlowMatch {
                    eth_src: Some(mac.clone()),
                    eth_type: Some(EtherType::Ipv4),
                    in_port: Some(attachment.port),
                    ipv4_dst: Some(server.ip),
                    ..Default::default()
                };
                match service.protocol {
                    Protocol::Tcp => {
                        matches.ip_proto = Some(IpProto::Tcp);
                        matches.tcp_dst = Some(port);
                    }
                    Protocol::Udp => {
                        matches.ip_proto = Some(IpProto::Udp);
                        matches.udp_dst = Some(port);
                    }
                }
                (matches, FlowAction::Flood)
            }
            FlowKind::Inbound => {
                let mut matches = FlowMatch {
                    eth_dst: Some(mac.clone()),
                    eth_type: Some(EtherType::Ipv4),
                    ipv4_src: Some(server.ip),
                    ..Default::default()
                };
                match service.protocol {
                    Protocol::Tcp => {
                        matches.ip_proto = Some(IpProto::Tcp);
                        matches.tcp_src = Some(port);
                    }
                    Protocol::Udp => {
                        matches.ip_proto = Some(IpProto::Udp);
                        matches.udp_src = Some(port);
                    }
                }
                (matches, FlowAction::Output(attachment.port))
            }
        };
        FlowDescriptor {
            actions,
            active: true,
            cookie: options.cookie,
            matches,
            name: kind.name(handler),
            priority: options.priority,
            switch: attachment.switch.clone(),
        }
    })
}
