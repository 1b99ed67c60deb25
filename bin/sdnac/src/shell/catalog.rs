//! Menus to manage students, servers and courses.
use anyhow::Result;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use sdnac_policy::AllowedServer;
use sdnac_policy::Course;
use sdnac_policy::CourseState;
use sdnac_policy::Protocol;
use sdnac_policy::Server;
use sdnac_policy::Service;
use sdnac_policy::Student;

use super::prompt;
use super::MenuEntry;
use super::Next;
use super::Session;

pub(super) static COURSES_MENU: &[MenuEntry] = &[
    MenuEntry {
        action: |session| list_courses(session).boxed(),
        label: "List courses",
        token: "list",
    },
    MenuEntry {
        action: |session| add_course(session).boxed(),
        label: "Add course",
        token: "add",
    },
    MenuEntry {
        action: |session| toggle_course(session).boxed(),
        label: "Activate or deactivate course",
        token: "state",
    },
    MenuEntry {
        action: |session| enroll(session).boxed(),
        label: "Enroll student",
        token: "enroll",
    },
    MenuEntry {
        action: |session| unenroll(session).boxed(),
        label: "Unenroll student",
        token: "unenroll",
    },
    MenuEntry {
        action: |session| allow(session).boxed(),
        label: "Allow server services",
        token: "allow",
    },
    MenuEntry {
        action: |session| disallow(session).boxed(),
        label: "Disallow server",
        token: "disallow",
    },
    MenuEntry {
        action: |session| remove_course(session).boxed(),
        label: "Remove course",
        token: "remove",
    },
    MenuEntry {
        action: super::back,
        label: "Back",
        token: "back",
    },
];

pub(super) static SERVERS_MENU: &[MenuEntry] = &[
    MenuEntry {
        action: |session| list_servers(session).boxed(),
        label: "List servers",
        token: "list",
    },
    MenuEntry {
        action: |session| add_server(session).boxed(),
        label: "Add server",
        token: "add",
    },
    MenuEntry {
        action: |session| add_service(session).boxed(),
        label: "Add service to server",
        token: "service",
    },
    MenuEntry {
        action: |session| remove_server(session).boxed(),
        label: "Remove server",
        token: "remove",
    },
    MenuEntry {
        action: super::back,
        label: "Back",
        token: "back",
    },
];

pub(super) static STUDENTS_MENU: &[MenuEntry] = &[
    MenuEntry {
        action: |session| list_students(session).boxed(),
        label: "List students",
        token: "list",
    },
    MenuEntry {
        action: |session| add_student(session).boxed(),
        label: "Add student",
        token: "add",
    },
    MenuEntry {
        action: |session| remove_student(session).boxed(),
        label: "Remove student",
        token: "remove",
    },
    MenuEntry {
        action: super::back,
        label: "Back",
        token: "back",
    },
];

pub fn courses(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    super::submenu(session, "Courses", COURSES_MENU)
}

pub fn servers(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    super::submenu(session, "Servers", SERVERS_MENU)
}

pub fn students(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    super::submenu(session, "Students", STUDENTS_MENU)
}

/// Options to pick a course from, by code.
fn course_options(session: &Session) -> Vec<(String, String)> {
    session
        .policy
        .courses()
        .map(|course| (course.to_string(), course.code.clone()))
        .collect()
}

/// Options to pick a server from, by name.
fn server_options(session: &Session) -> Vec<(String, String)> {
    session
        .policy
        .servers()
        .map(|server| (server.to_string(), server.name.clone()))
        .collect()
}

/// Options to pick a student from, by code.
fn student_options<'a, I>(students: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a Student>,
{
    students
        .into_iter()
        .map(|student| (student.to_string(), student.code.clone()))
        .collect()
}

// Courses.
async fn add_course(session: &mut Session) -> Result<Next> {
    let code = prompt::input_valid("Course code", prompt::valid_non_empty).await?;
    let name = prompt::input_valid("Course name", prompt::valid_non_empty).await?;
    let active = prompt::confirm("Activate the course now?", false).await?;
    let state = match active {
        true => CourseState::Active,
        false => CourseState::Inactive,
    };
    session
        .policy
        .add_course(Course::new(&code, name).with_state(state))?;
    println!("Course {} added", code);
    Ok(Next::Stay)
}

async fn allow(session: &mut Session) -> Result<Next> {
    let course = match prompt::choose("Course", course_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(course) => course,
    };
    let server = match prompt::choose("Server to allow", server_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(server) => server,
    };
    let services: Vec<String> = match session.policy.server(&server) {
        None => Vec::new(),
        Some(server) => server
            .services
            .iter()
            .map(|service| service.name.clone())
            .collect(),
    };
    if services.is_empty() {
        println!("Server {} exposes no services", server);
        return Ok(Next::Stay);
    }
    let picked = prompt::multi_select("Services to allow", services.clone()).await?;
    if picked.is_empty() {
        println!("No services selected");
        return Ok(Next::Stay);
    }
    let picked = picked.into_iter().map(|index| services[index].clone());
    let binding = AllowedServer::new(&server, picked);
    session.policy.allow(&course, binding)?;
    println!("Course {} now allows server {}", course, server);
    Ok(Next::Stay)
}

async fn disallow(session: &mut Session) -> Result<Next> {
    let course = match prompt::choose("Course", course_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(course) => course,
    };
    let bound: Vec<(String, String)> = match session.policy.course(&course) {
        None => Vec::new(),
        Some(course) => course
            .servers
            .iter()
            .map(|server| (server.name.clone(), server.name.clone()))
            .collect(),
    };
    let server = match prompt::choose("Server to disallow", bound).await? {
        None => return Ok(Next::Stay),
        Some(server) => server,
    };
    session.policy.disallow(&course, &server)?;
    println!("Course {} no longer allows server {}", course, server);
    Ok(Next::Stay)
}

async fn enroll(session: &mut Session) -> Result<Next> {
    let course = match prompt::choose("Course", course_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(course) => course,
    };
    let options = student_options(session.policy.students());
    let student = match prompt::choose("Student to enroll", options).await? {
        None => return Ok(Next::Stay),
        Some(student) => student,
    };
    session.policy.enroll(&course, &student)?;
    println!("Student {} enrolled in course {}", student, course);
    Ok(Next::Stay)
}

async fn list_courses(session: &mut Session) -> Result<Next> {
    println!("{}", crate::formatter::courses(session.policy.courses()));
    Ok(Next::Stay)
}

async fn remove_course(session: &mut Session) -> Result<Next> {
    let course = match prompt::choose("Course to remove", course_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(course) => course,
    };
    let question = format!("Remove course {}?", course);
    if prompt::confirm(&question, false).await? {
        session.policy.remove_course(&course)?;
        println!("Course {} removed", course);
    }
    Ok(Next::Stay)
}

async fn toggle_course(session: &mut Session) -> Result<Next> {
    let course = match prompt::choose("Course", course_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(course) => course,
    };
    let state = match session.policy.course(&course) {
        Some(course) if course.state.is_active() => CourseState::Inactive,
        _ => CourseState::Active,
    };
    session.policy.set_course_state(&course, state)?;
    println!("Course {} is now {}", course, state);
    Ok(Next::Stay)
}

async fn unenroll(session: &mut Session) -> Result<Next> {
    let course = match prompt::choose("Course", course_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(course) => course,
    };
    let enrolled: Vec<(String, String)> = match session.policy.course(&course) {
        None => Vec::new(),
        Some(course) => course
            .students
            .iter()
            .map(|code| (code.clone(), code.clone()))
            .collect(),
    };
    let student = match prompt::choose("Student to unenroll", enrolled).await? {
        None => return Ok(Next::Stay),
        Some(student) => student,
    };
    session.policy.unenroll(&course, &student)?;
    println!("Student {} unenrolled from course {}", student, course);
    Ok(Next::Stay)
}

// Servers.
async fn add_server(session: &mut Session) -> Result<Next> {
    let name = prompt::input_valid("Server name", prompt::valid_non_empty).await?;
    let ip = prompt::input_valid("Server IPv4 address", prompt::valid_ipv4).await?;
    let server = Server::new(&name, ip.parse()?);
    session.policy.add_server(server)?;
    println!("Server {} added", name);
    Ok(Next::Stay)
}

async fn add_service(session: &mut Session) -> Result<Next> {
    let server = match prompt::choose("Server", server_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(server) => server,
    };
    let name = prompt::input_valid("Service name", prompt::valid_non_empty).await?;
    let protocols = vec![
        ("TCP".to_string(), Protocol::Tcp),
        ("UDP".to_string(), Protocol::Udp),
    ];
    let protocol = match prompt::choose("Protocol", protocols).await? {
        None => return Ok(Next::Stay),
        Some(protocol) => protocol,
    };
    let port = prompt::input_valid("Port", prompt::valid_port).await?;
    let service = Service::new(&name, protocol, port.parse()?)?;
    session.policy.add_service(&server, service)?;
    println!("Service {} added to server {}", name, server);
    Ok(Next::Stay)
}

async fn list_servers(session: &mut Session) -> Result<Next> {
    println!("{}", crate::formatter::servers(session.policy.servers()));
    Ok(Next::Stay)
}

async fn remove_server(session: &mut Session) -> Result<Next> {
    let server = match prompt::choose("Server to remove", server_options(session)).await? {
        None => return Ok(Next::Stay),
        Some(server) => server,
    };
    let question = format!("Remove server {}? Courses keep referencing it", server);
    if prompt::confirm(&question, false).await? {
        session.policy.remove_server(&server)?;
        println!("Server {} removed", server);
    }
    Ok(Next::Stay)
}

// Students.
async fn add_student(session: &mut Session) -> Result<Next> {
    let name = prompt::input_valid("Student name", prompt::valid_non_empty).await?;
    let code = prompt::input_valid("Student code", prompt::valid_non_empty).await?;
    let mac = prompt::input_valid("Device MAC address", prompt::valid_mac).await?;
    let student = Student::new(name, &code, mac.parse()?);
    session.policy.add_student(student)?;
    println!("Student {} added", code);
    Ok(Next::Stay)
}

async fn list_students(session: &mut Session) -> Result<Next> {
    println!("{}", crate::formatter::students(session.policy.students()));
    Ok(Next::Stay)
}

async fn remove_student(session: &mut Session) -> Result<Next> {
    let options = student_options(session.policy.students());
    let student = match prompt::choose("Student to remove", options).await? {
        None => return Ok(Next::Stay),
        Some(student) => student,
    };
    let question = format!("Remove student {} and all their enrolments?", student);
    if prompt::confirm(&question, false).await? {
        session.policy.remove_student(&student)?;
        println!("Student {} removed", student);
    }
    Ok(Next::Stay)
}
