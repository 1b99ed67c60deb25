//! Entities the access policy is made of.
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::num::NonZeroU16;
use std::str::FromStr;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::AlreadyExists;
use crate::errors::EntityKind;
use crate::errors::InvalidPort;
use crate::MacAddress;

/// Server allowed to students of a course, restricted to the listed services.
///
/// Names are references into the server catalog and are not checked when bound.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AllowedServer {
    /// Name of the allowed server.
    #[serde(alias = "nombre")]
    pub name: String,

    /// Names of the services students may reach on the server.
    #[serde(default, alias = "servicios_permitidos")]
    pub services: BTreeSet<String>,
}

impl AllowedServer {
    pub fn new<S, I, T>(name: S, services: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        AllowedServer {
            name: name.into(),
            services: services.into_iter().map(Into::into).collect(),
        }
    }
}

/// Group of students and the server services they may reach while the course is active.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code.
    #[serde(alias = "codigo")]
    pub code: String,

    /// Human readable course name.
    #[serde(alias = "nombre")]
    pub name: String,

    /// Servers the course allows access to.
    #[serde(default, alias = "servidores")]
    pub servers: Vec<AllowedServer>,

    /// Lifecycle state of the course.
    #[serde(default, alias = "estado")]
    pub state: CourseState,

    /// Codes of students enrolled in the course.
    #[serde(default, alias = "alumnos")]
    pub students: BTreeSet<String>,
}

impl Course {
    /// Define a new, inactive, course with no students or servers.
    pub fn new<S1, S2>(code: S1, name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Course {
            code: code.into(),
            name: name.into(),
            servers: Vec::new(),
            state: CourseState::default(),
            students: BTreeSet::new(),
        }
    }

    /// Allow the course access to server services, merging with existing bindings.
    pub fn allow(&mut self, binding: AllowedServer) {
        match self.servers.iter_mut().find(|known| known.name == binding.name) {
            Some(known) => known.services.extend(binding.services),
            None => self.servers.push(binding),
        }
    }

    /// Revoke access to a server, returning true if a binding was removed.
    pub fn disallow(&mut self, server: &str) -> bool {
        let before = self.servers.len();
        self.servers.retain(|binding| binding.name != server);
        before != self.servers.len()
    }

    /// Enroll a student, returning false if they were already enrolled.
    pub fn enroll<S: Into<String>>(&mut self, student: S) -> bool {
        self.students.insert(student.into())
    }

    /// Check if the course grants the student access to the server service.
    pub fn grants(&self, student: &str, server: &str, service: &str) -> bool {
        self.state.is_active()
            && self.students.contains(student)
            && self
                .servers
                .iter()
                .any(|binding| binding.name == server && binding.services.contains(service))
    }

    /// Remove a student from the course, returning false if they were not enrolled.
    pub fn unenroll(&mut self, student: &str) -> bool {
        self.students.remove(student)
    }

    pub fn with_state(mut self, state: CourseState) -> Self {
        self.state = state;
        self
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}) - {} students",
            self.code,
            self.name,
            self.state,
            self.students.len()
        )
    }
}

/// Lifecycle state of a course.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseState {
    #[serde(alias = "active", alias = "DICTANDO")]
    Active,

    #[default]
    #[serde(alias = "inactive", alias = "INACTIVO")]
    Inactive,
}

impl CourseState {
    pub fn is_active(&self) -> bool {
        matches!(self, CourseState::Active)
    }
}

impl fmt::Display for CourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl FromStr for CourseState {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(CourseState::Active),
            "INACTIVE" => Ok(CourseState::Inactive),
            _ => anyhow::bail!("unknown course state '{}'", value),
        }
    }
}

/// Transport protocol of a service.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[serde(alias = "tcp")]
    Tcp,

    #[serde(alias = "udp")]
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

impl FromStr for Protocol {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TCP" => Ok(Protocol::Tcp),
            "UDP" => Ok(Protocol::Udp),
            _ => anyhow::bail!("unknown protocol '{}', expected TCP or UDP", value),
        }
    }
}

/// Host reachable through the network, exposing services.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// IPv4 address of the server.
    pub ip: Ipv4Addr,

    /// Unique server name.
    #[serde(alias = "nombre")]
    pub name: String,

    /// Services exposed by the server, in definition order.
    #[serde(default, alias = "servicios")]
    pub services: Vec<Service>,
}

impl Server {
    pub fn new<S: Into<String>>(name: S, ip: Ipv4Addr) -> Self {
        Server {
            ip,
            name: name.into(),
            services: Vec::new(),
        }
    }

    /// Add a service to the server, rejecting duplicate names.
    pub fn add_service(&mut self, service: Service) -> Result<()> {
        if self.service(&service.name).is_some() {
            let id = format!("{}/{}", self.name, service.name);
            anyhow::bail!(AlreadyExists::new(EntityKind::Service, id));
        }
        self.services.push(service);
        Ok(())
    }

    /// Lookup a service by name.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.name == name)
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} services",
            self.name,
            self.ip,
            self.services.len()
        )
    }
}

/// Network service exposed by a server.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "puerto")]
    pub port: NonZeroU16,
    #[serde(alias = "protocolo")]
    pub protocol: Protocol,
}

impl Service {
    /// Define a service, rejecting ports outside 1-65535.
    pub fn new<S: Into<String>>(name: S, protocol: Protocol, port: u32) -> Result<Self> {
        let port = u16::try_from(port)
            .ok()
            .and_then(NonZeroU16::new)
            .ok_or(InvalidPort { port })?;
        Ok(Service {
            name: name.into(),
            port,
            protocol,
        })
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.protocol, self.port)
    }
}

/// Student that may be granted access to network services.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student code.
    #[serde(alias = "codigo")]
    pub code: String,

    /// Hardware address of the student's device.
    pub mac: MacAddress,

    #[serde(alias = "nombre")]
    pub name: String,
}

impl Student {
    pub fn new<S1, S2>(name: S1, code: S2, mac: MacAddress) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Student {
            code: code.into(),
            mac,
            name: name.into(),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - MAC: {}", self.name, self.code, self.mac)
    }
}
