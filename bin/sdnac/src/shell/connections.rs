//! Provision and tear down student connections from the shell.
use anyhow::Result;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use sdnac_connections::Handler;

use super::prompt;
use super::MenuEntry;
use super::Next;
use super::Session;

pub(super) static CONNECTIONS_MENU: &[MenuEntry] = &[
    MenuEntry {
        action: |session| list(session).boxed(),
        label: "List connections",
        token: "list",
    },
    MenuEntry {
        action: |session| create(session).boxed(),
        label: "Create connection",
        token: "create",
    },
    MenuEntry {
        action: |session| destroy(session).boxed(),
        label: "Destroy connection",
        token: "destroy",
    },
    MenuEntry {
        action: super::back,
        label: "Back",
        token: "back",
    },
];

pub fn menu(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    super::submenu(session, "Connections", CONNECTIONS_MENU)
}

async fn create(session: &mut Session) -> Result<Next> {
    let students: Vec<(String, String)> = session
        .policy
        .students()
        .map(|student| (student.to_string(), student.code.clone()))
        .collect();
    let student = match prompt::choose("Student", students).await? {
        None => return Ok(Next::Stay),
        Some(student) => student,
    };
    let servers: Vec<(String, String)> = session
        .policy
        .servers()
        .map(|server| (server.to_string(), server.name.clone()))
        .collect();
    let server = match prompt::choose("Server", servers).await? {
        None => return Ok(Next::Stay),
        Some(server) => server,
    };
    let services: Vec<(String, String)> = match session.policy.server(&server) {
        None => Vec::new(),
        Some(server) => server
            .services
            .iter()
            .map(|service| {
                let label = format!("{} ({}/{})", service.name, service.protocol, service.port);
                (label, service.name.clone())
            })
            .collect(),
    };
    let service = match prompt::choose("Service", services).await? {
        None => return Ok(Next::Stay),
        Some(service) => service,
    };

    let handler = session
        .manager
        .create(&session.policy, &student, &server, &service)
        .await?;
    println!(
        "Connection {} provisioned: {} -> {}:{}",
        handler, student, server, service
    );
    Ok(Next::Stay)
}

async fn destroy(session: &mut Session) -> Result<Next> {
    let connections: Vec<(String, Handler)> = session
        .manager
        .connections()
        .map(|connection| (connection.to_string(), connection.handler))
        .collect();
    let handler = match prompt::choose("Connection to destroy", connections).await? {
        None => return Ok(Next::Stay),
        Some(handler) => handler,
    };
    session.manager.destroy(handler).await?;
    println!("Connection {} torn down", handler);
    Ok(Next::Stay)
}

async fn list(session: &mut Session) -> Result<Next> {
    if session.manager.connections().next().is_none() {
        println!("No connections provisioned");
        return Ok(Next::Stay);
    }
    println!(
        "{}",
        crate::formatter::connections(session.manager.connections())
    );
    Ok(Next::Stay)
}
