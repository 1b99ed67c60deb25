//! Track connections and drive their provisioning through the controller.
use std::collections::BTreeMap;

use anyhow::Result;
use slog::Logger;

use sdnac_controller_client::AttachmentPoint;
use sdnac_controller_client::Client;
use sdnac_policy::EntityKind;
use sdnac_policy::MacAddress;
use sdnac_policy::PolicyStore;
use sdnac_policy::UnknownEntity;

use crate::compile_flows;
use crate::flow_names;
use crate::resolve_attachment;
use crate::AttachmentNotFound;
use crate::Connection;
use crate::FlowOptions;
use crate::Handler;
use crate::PartialProvisioning;
use crate::PartialTeardown;
use crate::Unauthorized;
use crate::UnknownConnection;

/// Provision, track and tear down student connections.
///
/// Connections are kept in memory only and are lost when the manager is dropped.
/// The flows installed on the network are not removed when that happens.
pub struct ConnectionManager {
    client: Client,
    connections: BTreeMap<Handler, Connection>,
    logger: Logger,
    next_handler: u64,
    options: FlowOptions,
    rollback_partial: bool,
}

impl ConnectionManager {
    pub fn new(logger: Logger, client: Client, options: FlowOptions) -> ConnectionManager {
        ConnectionManager {
            client,
            connections: BTreeMap::new(),
            logger,
            next_handler: 1,
            options,
            rollback_partial: false,
        }
    }

    /// Delete already installed flows when provisioning fails half way.
    pub fn with_rollback(mut self, rollback: bool) -> ConnectionManager {
        self.rollback_partial = rollback;
        self
    }

    /// Look up a recorded connection.
    pub fn connection(&self, handler: Handler) -> Option<&Connection> {
        self.connections.get(&handler)
    }

    /// Iterate over recorded connections, ordered by handler.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Authorise and provision access for a student to a server service.
    ///
    /// A handler is allocated as soon as the request is authorised and is not reused
    /// even if provisioning fails afterwards.
    ///
    /// When a flow fails to install after others were installed the error carries
    /// a [`PartialProvisioning`] context listing the installed flows.
    /// With rollback enabled the context is only attached if some flows could not be removed.
    pub async fn create(
        &mut self,
        policy: &PolicyStore,
        student: &str,
        server: &str,
        service: &str,
    ) -> Result<Handler> {
        let student_entry = match policy.student(student) {
            Some(student) => student,
            None => anyhow::bail!(UnknownEntity::new(EntityKind::Student, student)),
        };
        let (server_entry, service_entry) = policy.service(server, service)?;
        if !policy.is_authorized(student, server, service) {
            slog::info!(
                self.logger, "Connection request denied by policy";
                "student" => student,
                "server" => server,
                "service" => service,
            );
            anyhow::bail!(Unauthorized::new(student, server, service));
        }

        let handler = Handler::new(self.next_handler);
        self.next_handler += 1;
        slog::debug!(
            self.logger, "Provisioning connection";
            "handler" => %handler,
            "student" => student,
            "server" => server,
            "service" => service,
        );

        let attachment = self.locate(handler, &student_entry.mac).await?;
        let flows = compile_flows(
            &self.options,
            handler,
            student_entry,
            server_entry,
            service_entry,
            &attachment,
        );

        let mut applied = Vec::new();
        for flow in &flows {
            if let Err(error) = self.client.push_flow(flow).await {
                slog::warn!(
                    self.logger, "Failed to install connection flow";
                    "handler" => %handler,
                    "flow" => &flow.name,
                    "installed" => applied.len(),
                    "error" => format!("{:#}", error),
                );
                if self.rollback_partial {
                    applied = self.rollback(handler, &attachment, &applied).await;
                }
                if applied.is_empty() {
                    return Err(error);
                }
                return Err(error.context(PartialProvisioning { applied, handler }));
            }
            applied.push(flow.name.clone());
        }

        let connection = Connection {
            active: true,
            attachment: attachment.clone(),
            handler,
            mac: student_entry.mac,
            server: server.to_string(),
            service: service.to_string(),
            student: student.to_string(),
        };
        self.connections.insert(handler, connection);
        slog::info!(
            self.logger, "Connection provisioned";
            "handler" => %handler,
            "student" => student,
            "server" => server,
            "service" => service,
            "attachment" => %attachment,
        );
        Ok(handler)
    }

    /// Tear down a connection by deleting its flows from the network.
    ///
    /// The connection record is removed only once all flows are deleted.
    /// When a deletion fails after others succeeded the error carries
    /// a [`PartialTeardown`] context listing the deleted flows.
    pub async fn destroy(&mut self, handler: Handler) -> Result<()> {
        let mac = match self.connections.get(&handler) {
            Some(connection) => connection.mac,
            None => anyhow::bail!(UnknownConnection::new(handler)),
        };
        slog::debug!(self.logger, "Tearing down connection"; "handler" => %handler);

        let attachment = self.locate(handler, &mac).await?;
        let mut removed = Vec::new();
        for name in flow_names(handler) {
            if let Err(error) = self.client.delete_flow(&attachment.switch, &name).await {
                slog::warn!(
                    self.logger, "Failed to delete connection flow";
                    "handler" => %handler,
                    "flow" => &name,
                    "deleted" => removed.len(),
                    "error" => format!("{:#}", error),
                );
                if removed.is_empty() {
                    return Err(error);
                }
                return Err(error.context(PartialTeardown { handler, removed }));
            }
            removed.push(name);
        }

        self.connections.remove(&handler);
        slog::info!(self.logger, "Connection torn down"; "handler" => %handler);
        Ok(())
    }

    /// Find the current attachment point of a device or fail.
    async fn locate(&self, handler: Handler, mac: &MacAddress) -> Result<AttachmentPoint> {
        match resolve_attachment(&self.client, mac).await? {
            Some(attachment) => Ok(attachment),
            None => {
                slog::info!(
                    self.logger, "Device not attached to the network";
                    "handler" => %handler,
                    "mac" => %mac,
                );
                anyhow::bail!(AttachmentNotFound::new(*mac))
            }
        }
    }

    /// Best-effort removal of flows installed by a failed provisioning, newest first.
    ///
    /// Returns the names of flows that could not be removed, in install order.
    async fn rollback(
        &self,
        handler: Handler,
        attachment: &AttachmentPoint,
        applied: &[String],
    ) -> Vec<String> {
        let mut remaining = Vec::new();
        for name in applied.iter().rev() {
            match self.client.delete_flow(&attachment.switch, name).await {
                Ok(()) => slog::debug!(
                    self.logger, "Rolled back connection flow";
                    "handler" => %handler,
                    "flow" => name,
                ),
                Err(error) => {
                    slog::warn!(
                        self.logger, "Failed to roll back connection flow";
                        "handler" => %handler,
                        "flow" => name,
                        "error" => format!("{:#}", error),
                    );
                    remaining.push(name.clone());
                }
            }
        }
        remaining.reverse();
        remaining
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections)
            .field("next_handler", &self.next_handler)
            .field("options", &self.options)
            .field("rollback_partial", &self.rollback_partial)
            .finish()
    }
}
