//! In-memory registry of students, servers and courses.
use std::collections::BTreeMap;

use anyhow::Result;

use crate::errors::AlreadyExists;
use crate::errors::EntityKind;
use crate::errors::UnknownEntity;
use crate::AllowedServer;
use crate::Course;
use crate::CourseState;
use crate::Server;
use crate::Service;
use crate::Student;

/// In-memory registry of students, servers and courses answering authorisation queries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PolicyStore {
    pub(crate) courses: BTreeMap<String, Course>,
    pub(crate) servers: BTreeMap<String, Server>,
    pub(crate) students: BTreeMap<String, Student>,
}

impl PolicyStore {
    /// Check if a student may reach a service on a server right now.
    ///
    /// Access is granted when at least one course enrolls the student, is active and
    /// allows the service on the server. Unknown students, servers or services simply
    /// never match, even when a course references them.
    pub fn is_authorized(&self, student: &str, server: &str, service: &str) -> bool {
        if !self.students.contains_key(student) || self.service(server, service).is_err() {
            return false;
        }
        self.courses
            .values()
            .any(|course| course.grants(student, server, service))
    }
}

// Students.
impl PolicyStore {
    pub fn add_student(&mut self, student: Student) -> Result<()> {
        if self.students.contains_key(&student.code) {
            anyhow::bail!(AlreadyExists::new(EntityKind::Student, student.code));
        }
        self.students.insert(student.code.clone(), student);
        Ok(())
    }

    /// Remove a student and any enrolment they had.
    pub fn remove_student(&mut self, code: &str) -> Result<Student> {
        let student = self
            .students
            .remove(code)
            .ok_or_else(|| UnknownEntity::new(EntityKind::Student, code))?;
        for course in self.courses.values_mut() {
            course.unenroll(code);
        }
        Ok(student)
    }

    pub fn student(&self, code: &str) -> Option<&Student> {
        self.students.get(code)
    }

    /// Iterate over students ordered by code.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }
}

// Servers and services.
impl PolicyStore {
    pub fn add_server(&mut self, server: Server) -> Result<()> {
        if self.servers.contains_key(&server.name) {
            anyhow::bail!(AlreadyExists::new(EntityKind::Server, server.name));
        }
        self.servers.insert(server.name.clone(), server);
        Ok(())
    }

    pub fn add_service(&mut self, server: &str, service: Service) -> Result<()> {
        let server = self
            .servers
            .get_mut(server)
            .ok_or_else(|| UnknownEntity::new(EntityKind::Server, server))?;
        server.add_service(service)
    }

    /// Remove a server from the catalog.
    ///
    /// Course bindings naming the server are left in place and stop matching.
    pub fn remove_server(&mut self, name: &str) -> Result<Server> {
        let server = self
            .servers
            .remove(name)
            .ok_or_else(|| UnknownEntity::new(EntityKind::Server, name))?;
        Ok(server)
    }

    pub fn server(&self, name: &str) -> Option<&Server> {
        self.servers.get(name)
    }

    /// Iterate over servers ordered by name.
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }

    /// Lookup a server and one of its services, failing if either is missing.
    pub fn service(&self, server: &str, service: &str) -> Result<(&Server, &Service)> {
        let found = self
            .servers
            .get(server)
            .ok_or_else(|| UnknownEntity::new(EntityKind::Server, server))?;
        let service = found
            .service(service)
            .ok_or_else(|| UnknownEntity::service(server, service))?;
        Ok((found, service))
    }
}

// Courses.
impl PolicyStore {
    pub fn add_course(&mut self, course: Course) -> Result<()> {
        if self.courses.contains_key(&course.code) {
            anyhow::bail!(AlreadyExists::new(EntityKind::Course, course.code));
        }
        self.courses.insert(course.code.clone(), course);
        Ok(())
    }

    /// Allow students of a course to reach services on a server.
    ///
    /// Server and service names are recorded as given and only resolved at authorisation time.
    pub fn allow(&mut self, course: &str, binding: AllowedServer) -> Result<()> {
        self.course_mut(course)?.allow(binding);
        Ok(())
    }

    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses.get(code)
    }

    /// Iterate over courses ordered by code.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Revoke a course's access to a server.
    pub fn disallow(&mut self, course: &str, server: &str) -> Result<()> {
        if !self.course_mut(course)?.disallow(server) {
            anyhow::bail!(UnknownEntity::new(
                EntityKind::Server,
                format!("{}/{}", course, server)
            ));
        }
        Ok(())
    }

    /// Enroll a known student in a course; enrolling twice has no effect.
    pub fn enroll(&mut self, course: &str, student: &str) -> Result<()> {
        if !self.students.contains_key(student) {
            anyhow::bail!(UnknownEntity::new(EntityKind::Student, student));
        }
        self.course_mut(course)?.enroll(student);
        Ok(())
    }

    pub fn remove_course(&mut self, code: &str) -> Result<Course> {
        let course = self
            .courses
            .remove(code)
            .ok_or_else(|| UnknownEntity::new(EntityKind::Course, code))?;
        Ok(course)
    }

    pub fn set_course_state(&mut self, course: &str, state: CourseState) -> Result<()> {
        self.course_mut(course)?.state = state;
        Ok(())
    }

    /// Remove a student from a course, failing if they were not enrolled.
    pub fn unenroll(&mut self, course: &str, student: &str) -> Result<()> {
        if !self.course_mut(course)?.unenroll(student) {
            anyhow::bail!(UnknownEntity::new(
                EntityKind::Student,
                format!("{}/{}", course, student)
            ));
        }
        Ok(())
    }

    fn course_mut(&mut self, code: &str) -> Result<&mut Course> {
        self.courses
            .get_mut(code)
            .ok_or_else(|| UnknownEntity::new(EntityKind::Course, code).into())
    }
}
