//! Import and export the policy as a YAML dataset.
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::Course;
use crate::PolicyStore;
use crate::Server;
use crate::Student;

/// Errors exchanging policy datasets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to create the dataset file at the given path.
    #[error("unable to create dataset file at '{0}'")]
    // (path,)
    Create(String),

    /// Unable to decode the policy dataset.
    #[error("unable to decode the policy dataset")]
    Decode,

    /// Unable to encode the policy dataset.
    #[error("unable to encode the policy dataset")]
    Encode,

    /// Unable to read the dataset file at the given path.
    #[error("unable to read dataset file at '{0}'")]
    // (path,)
    Open(String),
}

/// Serialisable snapshot of the whole policy.
///
/// Spanish keys (`alumnos`, `cursos`, `servidores`, `nombre` and the like) are accepted on import.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, alias = "cursos")]
    pub courses: Vec<Course>,

    #[serde(default, alias = "servidores")]
    pub servers: Vec<Server>,

    #[serde(default, alias = "alumnos")]
    pub students: Vec<Student>,
}

impl PolicyStore {
    /// Build a store from a dataset, rejecting duplicate identifiers.
    pub fn from_dataset(dataset: Dataset) -> Result<PolicyStore> {
        let mut store = PolicyStore::default();
        for student in dataset.students {
            store.add_student(student)?;
        }
        for server in dataset.servers {
            let mut known = Server::new(server.name, server.ip);
            for service in server.services {
                known.add_service(service)?;
            }
            store.add_server(known)?;
        }
        for course in dataset.courses {
            let mut known = Course::new(course.code, course.name).with_state(course.state);
            known.students = course.students;
            for binding in course.servers {
                known.allow(binding);
            }
            store.add_course(known)?;
        }
        Ok(store)
    }

    /// Snapshot the store into a dataset with collections ordered by identifier.
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            courses: self.courses.values().cloned().collect(),
            servers: self.servers.values().cloned().collect(),
            students: self.students.values().cloned().collect(),
        }
    }

    /// Decode a YAML dataset into a new store.
    pub fn import<R: Read>(reader: R) -> Result<PolicyStore> {
        let dataset: Dataset = serde_yaml::from_reader(reader).context(Error::Decode)?;
        PolicyStore::from_dataset(dataset)
    }

    /// Encode the store as a YAML dataset.
    pub fn export<W: Write>(&self, writer: W) -> Result<()> {
        serde_yaml::to_writer(writer, &self.to_dataset()).context(Error::Encode)
    }

    /// Load a store from a YAML dataset file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PolicyStore> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| Error::Open(path.display().to_string()))?;
        PolicyStore::import(file).with_context(|| Error::Open(path.display().to_string()))
    }

    /// Save the store to a YAML dataset file, replacing any existing content.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| Error::Create(path.display().to_string()))?;
        self.export(file)
    }
}
