//! Summaries of the effective policy.
use std::fmt;

use crate::PolicyStore;

/// Access the policy currently allows, with the course granting it.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Grant {
    pub course: String,
    pub server: String,
    pub service: String,
    pub student: String,
}

/// Reference from a course to an entity that is not defined.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum DanglingReference {
    /// A course allows a server that does not exist.
    Server { course: String, server: String },

    /// A course allows a service the server does not expose.
    Service {
        course: String,
        server: String,
        service: String,
    },

    /// A course enrolls a student that does not exist.
    Student { course: String, student: String },
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server { course, server } => {
                write!(f, "course '{}' allows unknown server '{}'", course, server)
            }
            Self::Service {
                course,
                server,
                service,
            } => write!(
                f,
                "course '{}' allows unknown service '{}' on server '{}'",
                course, service, server
            ),
            Self::Student { course, student } => {
                write!(f, "course '{}' enrolls unknown student '{}'", course, student)
            }
        }
    }
}

impl PolicyStore {
    /// List references in courses that do not resolve to known entities.
    ///
    /// Such references never grant access.
    pub fn check(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for course in self.courses.values() {
            for student in &course.students {
                if !self.students.contains_key(student) {
                    dangling.push(DanglingReference::Student {
                        course: course.code.clone(),
                        student: student.clone(),
                    });
                }
            }
            for binding in &course.servers {
                let server = match self.servers.get(&binding.name) {
                    Some(server) => server,
                    None => {
                        dangling.push(DanglingReference::Server {
                            course: course.code.clone(),
                            server: binding.name.clone(),
                        });
                        continue;
                    }
                };
                for service in &binding.services {
                    if server.service(service).is_none() {
                        dangling.push(DanglingReference::Service {
                            course: course.code.clone(),
                            server: binding.name.clone(),
                            service: service.clone(),
                        });
                    }
                }
            }
        }
        dangling
    }

    /// List every access grant the policy allows right now.
    ///
    /// Only grants that resolve to known students, servers and services are reported.
    pub fn report(&self) -> Vec<Grant> {
        let mut grants = Vec::new();
        let active = self.courses.values().filter(|course| course.state.is_active());
        for course in active {
            let students = course
                .students
                .iter()
                .filter(|student| self.students.contains_key(*student));
            for student in students {
                for binding in &course.servers {
                    let server = match self.servers.get(&binding.name) {
                        Some(server) => server,
                        None => continue,
                    };
                    let services = binding
                        .services
                        .iter()
                        .filter(|service| server.service(service).is_some());
                    for service in services {
                        grants.push(Grant {
                            course: course.code.clone(),
                            server: server.name.clone(),
                            service: service.clone(),
                            student: student.clone(),
                        });
                    }
                }
            }
        }
        grants.sort();
        grants
    }
}
