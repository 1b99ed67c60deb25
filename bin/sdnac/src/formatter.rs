//! Format output for easy consumption by people interacting with `sdnac`.
use comfy_table::Table;

use sdnac_connections::Connection;
use sdnac_controller_client::Device;
use sdnac_controller_client::RouteHop;
use sdnac_controller_client::Switch;
use sdnac_policy::Course;
use sdnac_policy::DanglingReference;
use sdnac_policy::Grant;
use sdnac_policy::Server;
use sdnac_policy::Student;

/// Placeholder for values that are not set.
const NOT_SET: &str = "<not set>";

fn table<R: Into<comfy_table::Row>>(header: R) -> Table {
    let mut table = Table::new();
    table.set_header(header);
    table
}

/// Format active connections into a table.
pub fn connections<'a, I>(connections: I) -> Table
where
    I: IntoIterator<Item = &'a Connection>,
{
    let mut table = table(["HANDLER", "STUDENT", "SERVER", "SERVICE", "ATTACHMENT", "STATE"]);
    for connection in connections {
        table.add_row(vec![
            connection.handler.to_string(),
            connection.student.clone(),
            connection.server.clone(),
            connection.service.clone(),
            connection.attachment.to_string(),
            if connection.active { "ACTIVE" } else { "INACTIVE" }.to_string(),
        ]);
    }
    table
}

pub fn courses<'a, I>(courses: I) -> Table
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut table = table(["CODE", "NAME", "STATE", "STUDENTS", "SERVERS"]);
    for course in courses {
        let servers: Vec<String> = course
            .servers
            .iter()
            .map(|server| {
                let services: Vec<&str> = server.services.iter().map(String::as_str).collect();
                format!("{} [{}]", server.name, services.join(", "))
            })
            .collect();
        table.add_row(vec![
            course.code.clone(),
            course.name.clone(),
            course.state.to_string(),
            course.students.len().to_string(),
            servers.join("\n"),
        ]);
    }
    table
}

/// Format course references to missing entities into a table.
pub fn dangling(references: &[DanglingReference]) -> Table {
    let mut table = table(["COURSE", "KIND", "REFERENCE"]);
    for reference in references {
        let (course, kind, target) = match reference {
            DanglingReference::Server { course, server } => (course, "server", server.clone()),
            DanglingReference::Service {
                course,
                server,
                service,
            } => (course, "service", format!("{}/{}", server, service)),
            DanglingReference::Student { course, student } => {
                (course, "student", student.clone())
            }
        };
        table.add_row(vec![course.clone(), kind.to_string(), target]);
    }
    table
}

/// Format devices known to the controller into a table.
pub fn devices(devices: &[Device]) -> Table {
    let mut table = table(["MAC", "IPV4", "ATTACHMENT"]);
    for device in devices {
        let mac = device.mac.first().map(String::as_str).unwrap_or(NOT_SET);
        let ipv4 = match device.ipv4.is_empty() {
            true => NOT_SET.to_string(),
            false => device.ipv4.join(", "),
        };
        let attachment = match device.attachment_points.first() {
            None => NOT_SET.to_string(),
            Some(point) => point.to_string(),
        };
        table.add_row(vec![mac.to_string(), ipv4, attachment]);
    }
    table
}

/// Format granted accesses into a table.
pub fn grants(grants: &[Grant]) -> Table {
    let mut table = table(["STUDENT", "SERVER", "SERVICE", "COURSE"]);
    for grant in grants {
        table.add_row(vec![&grant.student, &grant.server, &grant.service, &grant.course]);
    }
    table
}

/// Format the hops of a route into a table.
pub fn route(hops: &[RouteHop]) -> Table {
    let mut table = table(["HOP", "SWITCH", "PORT"]);
    for (index, hop) in hops.iter().enumerate() {
        table.add_row(vec![index.to_string(), hop.switch.clone(), hop.port.to_string()]);
    }
    table
}

pub fn servers<'a, I>(servers: I) -> Table
where
    I: IntoIterator<Item = &'a Server>,
{
    let mut table = table(["NAME", "IP", "SERVICES"]);
    for server in servers {
        let services: Vec<String> = server
            .services
            .iter()
            .map(|service| format!("{} ({}/{})", service.name, service.protocol, service.port))
            .collect();
        table.add_row(vec![server.name.clone(), server.ip.to_string(), services.join("\n")]);
    }
    table
}

pub fn students<'a, I>(students: I) -> Table
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut table = table(["CODE", "NAME", "MAC"]);
    for student in students {
        table.add_row(vec![
            student.code.clone(),
            student.name.clone(),
            student.mac.to_string(),
        ]);
    }
    table
}

/// Format switches connected to the controller into a table.
pub fn switches(switches: &[Switch]) -> Table {
    let mut table = table(["DPID", "ADDRESS"]);
    for switch in switches {
        let address = switch.inet_address.as_deref().unwrap_or(NOT_SET);
        table.add_row(vec![switch.dpid.as_str(), address]);
    }
    table
}

#[cfg(test)]
mod tests {
    use sdnac_controller_client::AttachmentPoint;
    use sdnac_controller_client::Device;
    use sdnac_policy::DanglingReference;
    use sdnac_policy::Grant;

    #[test]
    fn devices_without_attachment() {
        let devices = vec![
            Device {
                attachment_points: vec![AttachmentPoint::new("00:00:00:00:00:00:00:01", 3)],
                ipv4: vec!["10.0.0.1".into()],
                mac: vec!["aa:bb:cc:dd:ee:ff".into()],
            },
            Device {
                attachment_points: Vec::new(),
                ipv4: Vec::new(),
                mac: vec!["00:11:22:33:44:55".into()],
            },
        ];
        let output = super::devices(&devices).to_string();
        assert!(output.contains("00:00:00:00:00:00:00:01/3"));
        assert!(output.contains("10.0.0.1"));
        assert!(output.contains("<not set>"));
    }

    #[test]
    fn grants_are_listed() {
        let grants = vec![Grant {
            course: "C1".into(),
            server: "Srv1".into(),
            service: "ssh".into(),
            student: "20211049".into(),
        }];
        let output = super::grants(&grants).to_string();
        for value in ["C1", "Srv1", "ssh", "20211049"] {
            assert!(output.contains(value), "missing '{}' in output", value);
        }
    }

    #[test]
    fn dangling_services_show_server() {
        let references = vec![DanglingReference::Service {
            course: "C1".into(),
            server: "Srv1".into(),
            service: "ftp".into(),
        }];
        let output = super::dangling(&references).to_string();
        assert!(output.contains("Srv1/ftp"));
        assert!(output.contains("service"));
    }
}
