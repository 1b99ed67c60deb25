//! Container for data made accessible to all `sdnac` commands.
use anyhow::Result;
use slog::Logger;

use sdnac_conf::Conf;
use sdnac_connections::ConnectionManager;
use sdnac_connections::FlowOptions;
use sdnac_controller_client::Client;
use sdnac_controller_client_http::ClientOptions;
use sdnac_controller_client_http::HttpClient;
use sdnac_policy::PolicyStore;

use crate::Cli;

/// Container for data made accessible to all `sdnac` commands.
pub struct Globals {
    /// Parsed CLI arguments.
    pub cli: Cli,

    /// Process configuration, with CLI overrides applied.
    pub conf: Conf,

    /// Configured process logger for advanced users feedback/debugging.
    pub logger: Logger,
}

impl Globals {
    /// Initialise `sdnac` process [`Globals`].
    pub fn initialise(cli: Cli) -> Result<Self> {
        let conf = match &cli.conf.config {
            Some(path) => sdnac_conf::load(path)?,
            None => sdnac_conf::load_or_default(crate::cmd::DEFAULT_CONFIG)?,
        };
        let conf = apply_overrides(conf, &cli);
        let logger = crate::logging::configure(&cli.log, conf.logging.level)?;
        slog::debug!(
            logger, "Configuration loaded";
            "controller" => &conf.controller.url,
            "dataset" => conf.policy.dataset.as_deref().unwrap_or("<none>"),
        );
        Ok(Globals { cli, conf, logger })
    }

    /// Initialise a client to the configured SDN controller.
    pub fn client(&self) -> Result<Client> {
        let options = ClientOptions::url(&self.conf.controller.url)
            .timeout(self.conf.controller.timeout())
            .timeout_connect(self.conf.controller.timeout_connect());
        let client = HttpClient::with(options)?;
        Ok(Client::from(client))
    }

    /// Initialise a connection manager using the configured controller and flow options.
    pub fn manager(&self) -> Result<ConnectionManager> {
        let options = FlowOptions {
            cookie: self.conf.flows.cookie,
            priority: self.conf.flows.priority,
        };
        let logger = self.logger.new(slog::o!("component" => "connections"));
        let manager = ConnectionManager::new(logger, self.client()?, options)
            .with_rollback(self.conf.flows.rollback_partial);
        Ok(manager)
    }

    /// Load the configured policy dataset, if any.
    pub fn policy(&self) -> Result<Option<PolicyStore>> {
        let path = match &self.conf.policy.dataset {
            None => return Ok(None),
            Some(path) => path,
        };
        let policy = PolicyStore::load(path)?;
        slog::info!(
            self.logger, "Policy dataset loaded";
            "path" => path,
            "students" => policy.students().count(),
            "servers" => policy.servers().count(),
            "courses" => policy.courses().count(),
        );
        Ok(Some(policy))
    }
}

/// Apply configuration overrides from CLI arguments and environment variables.
fn apply_overrides(mut conf: Conf, cli: &Cli) -> Conf {
    if let Some(url) = &cli.conf.controller {
        conf.controller.url = url.clone();
    }
    if let Some(dataset) = &cli.conf.dataset {
        conf.policy.dataset = Some(dataset.clone());
    }
    if let Some(level) = cli.log.level {
        conf.logging.level = level.into();
    }
    conf
}
