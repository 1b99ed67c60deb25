use std::net::Ipv4Addr;

use sdnac_controller_client::fixture::Controller;
use sdnac_controller_client::fixture::Failure;
use sdnac_controller_client::AttachmentPoint;
use sdnac_controller_client::Client;
use sdnac_controller_client::ControllerRejected;
use sdnac_controller_client::ControllerUnreachable;
use sdnac_policy::AllowedServer;
use sdnac_policy::Course;
use sdnac_policy::CourseState;
use sdnac_policy::EntityKind;
use sdnac_policy::PolicyStore;
use sdnac_policy::Protocol;
use sdnac_policy::Server;
use sdnac_policy::Service;
use sdnac_policy::Student;

use crate::AttachmentNotFound;
use crate::ConnectionManager;
use crate::FlowOptions;
use crate::Handler;
use crate::PartialProvisioning;
use crate::PartialTeardown;
use crate::Unauthorized;
use crate::UnknownConnection;
use crate::UnknownEntity;

const STUDENT: &str = "20211049";
const STUDENT_MAC: &str = "aa:bb:cc:dd:ee:ff";
const SWITCH: &str = "00:00:00:00:00:00:00:01";

fn policy() -> PolicyStore {
    let mut policy = PolicyStore::default();
    let mac = "AA:BB:CC:DD:EE:FF".parse().unwrap();
    policy
        .add_student(Student::new("Ana Torres", STUDENT, mac))
        .unwrap();
    let mac = "00:11:22:33:44:55".parse().unwrap();
    policy
        .add_student(Student::new("Luis Rojas", "20200001", mac))
        .unwrap();

    let mut server = Server::new("Srv1", Ipv4Addr::new(10, 0, 0, 5));
    server
        .add_service(Service::new("ssh", Protocol::Tcp, 22).unwrap())
        .unwrap();
    server
        .add_service(Service::new("dns", Protocol::Udp, 53).unwrap())
        .unwrap();
    policy.add_server(server).unwrap();

    let course = Course::new("C1", "Networks").with_state(CourseState::Active);
    policy.add_course(course).unwrap();
    policy.enroll("C1", STUDENT).unwrap();
    policy
        .allow("C1", AllowedServer::new("Srv1", ["ssh", "dns"]))
        .unwrap();

    let course = Course::new("C2", "Security");
    policy.add_course(course).unwrap();
    policy.enroll("C2", "20200001").unwrap();
    policy
        .allow("C2", AllowedServer::new("Srv1", ["ssh"]))
        .unwrap();
    policy
}

fn fixture() -> (Controller, ConnectionManager) {
    let controller = Controller::default();
    controller
        .switch(SWITCH)
        .device(STUDENT_MAC, SWITCH, 3)
        .device("00:11:22:33:44:55", SWITCH, 4);
    let logger = slog::Logger::root(slog::Discard, slog::o!());
    let client = Client::from(controller.clone());
    let manager = ConnectionManager::new(logger, client, FlowOptions::default());
    (controller, manager)
}

fn names(handler: u64) -> Vec<String> {
    ["arp_request", "arp_reply", "outbound", "inbound"]
        .iter()
        .map(|suffix| format!("{}_{}", handler, suffix))
        .collect()
}

#[tokio::test]
async fn provision_and_teardown() {
    let policy = policy();
    let (controller, mut manager) = fixture();

    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    assert_eq!(handler, Handler::new(1));

    let pushed = controller.pushed();
    let pushed_names: Vec<String> = pushed.iter().map(|flow| flow.name.clone()).collect();
    assert_eq!(pushed_names, names(1));
    assert!(pushed.iter().all(|flow| flow.switch == SWITCH));
    assert_eq!(pushed[2].matches.tcp_dst, Some(22));
    assert_eq!(pushed[2].matches.in_port, Some(3));
    assert_eq!(controller.installed().len(), 4);

    let connection = manager.connection(handler).unwrap();
    assert!(connection.active);
    assert_eq!(connection.student, STUDENT);
    assert_eq!(connection.server, "Srv1");
    assert_eq!(connection.service, "ssh");
    assert_eq!(connection.attachment, AttachmentPoint::new(SWITCH, 3));

    manager.destroy(handler).await.unwrap();
    let deleted: Vec<String> = controller
        .deleted()
        .into_iter()
        .map(|(switch, name)| {
            assert_eq!(switch, SWITCH);
            name
        })
        .collect();
    assert_eq!(deleted, names(1));
    assert!(controller.installed().is_empty());
    assert!(manager.connection(handler).is_none());
    assert_eq!(manager.connections().count(), 0);
}

#[tokio::test]
async fn inactive_course_is_unauthorized() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let error = manager
        .create(&policy, "20200001", "Srv1", "ssh")
        .await
        .unwrap_err();
    let error = error.downcast_ref::<Unauthorized>().unwrap();
    assert_eq!(error.student, "20200001");
    assert_eq!(controller.push_attempts(), 0);
    assert_eq!(manager.connections().count(), 0);
}

#[tokio::test]
async fn unauthorized_service() {
    let mut policy = policy();
    policy
        .add_service("Srv1", Service::new("http", Protocol::Tcp, 80).unwrap())
        .unwrap();
    let (controller, mut manager) = fixture();
    let error = manager
        .create(&policy, STUDENT, "Srv1", "http")
        .await
        .unwrap_err();
    assert!(error.downcast_ref::<Unauthorized>().is_some());
    assert_eq!(controller.push_attempts(), 0);
}

#[tokio::test]
async fn unauthorized_does_not_consume_handlers() {
    let policy = policy();
    let (_, mut manager) = fixture();
    let _ = manager.create(&policy, "20200001", "Srv1", "ssh").await;
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    assert_eq!(handler, Handler::new(1));
}

#[tokio::test]
async fn unknown_entities() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let cases = [
        ("99999999", "Srv1", "ssh", EntityKind::Student),
        (STUDENT, "Srv9", "ssh", EntityKind::Server),
        (STUDENT, "Srv1", "ftp", EntityKind::Service),
    ];
    for (student, server, service, kind) in cases {
        let error = manager
            .create(&policy, student, server, service)
            .await
            .unwrap_err();
        let error = error.downcast_ref::<UnknownEntity>().unwrap();
        assert_eq!(error.kind, kind);
    }
    assert_eq!(controller.push_attempts(), 0);
}

#[tokio::test]
async fn device_not_attached() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    controller.forget_device(STUDENT_MAC);
    let error = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap_err();
    assert!(error.downcast_ref::<AttachmentNotFound>().is_some());
    assert_eq!(controller.push_attempts(), 0);
    assert_eq!(manager.connections().count(), 0);

    // The handler allocated for the failed attempt is not reused.
    controller.device(STUDENT_MAC, SWITCH, 3);
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    assert_eq!(handler, Handler::new(2));
}

#[tokio::test]
async fn handlers_are_monotonic() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let first = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    let second = manager
        .create(&policy, STUDENT, "Srv1", "dns")
        .await
        .unwrap();
    manager.destroy(first).await.unwrap();
    let third = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    assert_eq!(
        [first, second, third],
        [Handler::new(1), Handler::new(2), Handler::new(3)]
    );
    let handlers: Vec<Handler> = manager.connections().map(|c| c.handler).collect();
    assert_eq!(handlers, vec![second, third]);

    // Flows of each connection are named after its handler.
    let installed: Vec<String> = controller
        .installed()
        .into_keys()
        .map(|(_, name)| name)
        .collect();
    assert_eq!(installed.len(), 8);
    assert!(installed
        .iter()
        .all(|name| name.starts_with("2_") || name.starts_with("3_")));
}

#[tokio::test]
async fn destroy_twice() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    manager.destroy(handler).await.unwrap();
    let error = manager.destroy(handler).await.unwrap_err();
    let error = error.downcast_ref::<UnknownConnection>().unwrap();
    assert_eq!(error.handler, handler);
    assert_eq!(controller.delete_attempts(), 4);
}

#[tokio::test]
async fn destroy_unknown_handler() {
    let (controller, mut manager) = fixture();
    let error = manager.destroy(Handler::new(42)).await.unwrap_err();
    assert!(error.downcast_ref::<UnknownConnection>().is_some());
    assert_eq!(controller.delete_attempts(), 0);
}

#[tokio::test]
async fn partial_provisioning() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    controller.fail_pushes_from(2, Failure::Rejected);
    let error = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap_err();
    let partial = error.downcast_ref::<PartialProvisioning>().unwrap();
    assert_eq!(partial.handler, Handler::new(1));
    assert_eq!(partial.applied, names(1)[..2].to_vec());
    assert!(error.downcast_ref::<ControllerRejected>().is_some());
    assert_eq!(controller.push_attempts(), 3);
    assert_eq!(controller.installed().len(), 2);
    assert_eq!(controller.delete_attempts(), 0);
    assert_eq!(manager.connections().count(), 0);
}

#[tokio::test]
async fn first_push_failure_is_not_partial() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    controller.fail_pushes_from(0, Failure::Unreachable);
    let error = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap_err();
    assert!(error.downcast_ref::<PartialProvisioning>().is_none());
    assert!(error.downcast_ref::<ControllerUnreachable>().is_some());
    assert_eq!(controller.push_attempts(), 1);
    assert!(controller.installed().is_empty());
    assert_eq!(manager.connections().count(), 0);
}

#[tokio::test]
async fn partial_provisioning_rollback() {
    let policy = policy();
    let controller = Controller::default();
    controller.device(STUDENT_MAC, SWITCH, 3);
    controller.fail_pushes_from(3, Failure::Rejected);
    let logger = slog::Logger::root(slog::Discard, slog::o!());
    let mut manager =
        ConnectionManager::new(logger, Client::from(controller.clone()), FlowOptions::default())
            .with_rollback(true);

    let error = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap_err();
    assert!(error.downcast_ref::<PartialProvisioning>().is_none());
    assert!(error.downcast_ref::<ControllerRejected>().is_some());

    let deleted: Vec<String> = controller
        .deleted()
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    assert_eq!(
        deleted,
        vec!["1_outbound", "1_arp_reply", "1_arp_request"]
    );
    assert!(controller.installed().is_empty());
    assert_eq!(manager.connections().count(), 0);
}

#[tokio::test]
async fn failed_rollback_reports_remaining_flows() {
    let policy = policy();
    let controller = Controller::default();
    controller.device(STUDENT_MAC, SWITCH, 3);
    controller.fail_pushes_from(3, Failure::Rejected);
    controller.fail_deletes_from(1, Failure::Unreachable);
    let logger = slog::Logger::root(slog::Discard, slog::o!());
    let mut manager =
        ConnectionManager::new(logger, Client::from(controller.clone()), FlowOptions::default())
            .with_rollback(true);

    let error = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap_err();
    let partial = error.downcast_ref::<PartialProvisioning>().unwrap();
    assert_eq!(partial.handler, Handler::new(1));
    assert_eq!(partial.applied, vec!["1_arp_request", "1_arp_reply"]);
    assert!(error.downcast_ref::<ControllerRejected>().is_some());
    assert_eq!(controller.delete_attempts(), 3);
    assert_eq!(controller.installed().len(), 2);
    assert_eq!(manager.connections().count(), 0);
}

#[tokio::test]
async fn partial_teardown_keeps_record() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    controller.fail_deletes_from(1, Failure::Unreachable);

    let error = manager.destroy(handler).await.unwrap_err();
    let partial = error.downcast_ref::<PartialTeardown>().unwrap();
    assert_eq!(partial.removed, vec!["1_arp_request".to_string()]);
    assert!(manager.connection(handler).is_some());

    // Teardown can be retried once the controller recovers.
    controller.heal();
    manager.destroy(handler).await.unwrap();
    assert!(manager.connection(handler).is_none());
    assert!(controller.installed().is_empty());
}

#[tokio::test]
async fn first_delete_failure_is_not_partial() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    controller.fail_deletes_from(0, Failure::Rejected);
    let error = manager.destroy(handler).await.unwrap_err();
    assert!(error.downcast_ref::<PartialTeardown>().is_none());
    assert!(error.downcast_ref::<ControllerRejected>().is_some());
    assert!(manager.connection(handler).is_some());
}

#[tokio::test]
async fn teardown_follows_moved_device() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    controller.move_device(STUDENT_MAC, "00:00:00:00:00:00:00:02", 7);
    manager.destroy(handler).await.unwrap();
    assert!(controller
        .deleted()
        .iter()
        .all(|(switch, _)| switch == "00:00:00:00:00:00:00:02"));
}

#[tokio::test]
async fn teardown_of_vanished_device() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    controller.forget_device(STUDENT_MAC);
    let error = manager.destroy(handler).await.unwrap_err();
    assert!(error.downcast_ref::<AttachmentNotFound>().is_some());
    assert_eq!(controller.delete_attempts(), 0);
    assert!(manager.connection(handler).is_some());
}

#[tokio::test]
async fn unreachable_controller() {
    let policy = policy();
    let (controller, mut manager) = fixture();
    controller.unreachable();
    let error = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap_err();
    assert!(error.downcast_ref::<ControllerUnreachable>().is_some());
    assert_eq!(controller.push_attempts(), 0);
}

#[tokio::test]
async fn policy_changes_do_not_affect_existing_connections() {
    let mut policy = policy();
    let (_, mut manager) = fixture();
    let handler = manager
        .create(&policy, STUDENT, "Srv1", "ssh")
        .await
        .unwrap();
    policy.set_course_state("C1", CourseState::Inactive).unwrap();
    assert!(manager.connection(handler).unwrap().active);
    manager.destroy(handler).await.unwrap();
}
