//! Errors raised when managing or querying the policy.
use std::fmt;

/// Kinds of entities the policy tracks.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntityKind {
    Course,
    Server,
    Service,
    Student,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course => write!(f, "course"),
            Self::Server => write!(f, "server"),
            Self::Service => write!(f, "service"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// An entity with the same identifier is already defined.
#[derive(Debug, thiserror::Error)]
#[error("a {kind} with identifier '{id}' already exists")]
pub struct AlreadyExists {
    pub id: String,
    pub kind: EntityKind,
}

impl AlreadyExists {
    /// An entity with the same identifier is already defined.
    pub fn new<S: Into<String>>(kind: EntityKind, id: S) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// The referenced entity does not exist.
#[derive(Debug, thiserror::Error)]
#[error("the {kind} '{id}' does not exist")]
pub struct UnknownEntity {
    pub id: String,
    pub kind: EntityKind,
}

impl UnknownEntity {
    /// The referenced entity does not exist.
    pub fn new<S: Into<String>>(kind: EntityKind, id: S) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// The referenced service does not exist on the server.
    pub fn service(server: &str, service: &str) -> Self {
        Self::new(EntityKind::Service, format!("{}/{}", server, service))
    }
}

/// Service ports must be in the range 1-65535.
#[derive(Debug, thiserror::Error)]
#[error("service port {port} is outside the range 1-65535")]
pub struct InvalidPort {
    pub port: u32,
}
