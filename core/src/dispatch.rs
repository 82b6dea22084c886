//! Runs one lease machine per matching interface and tallies the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::{Id, JoinSet};
use tracing::{error, info};

use airlink_common::config::DhcpConfig;
use airlink_common::error::{Result, WifiError};
use airlink_common::network::interface::InterfaceSelector;
use airlink_common::network::lease::{Lease, Summary};

use crate::dhcp::DhcpClient;
use crate::dhcp::lease::LeaseMachine;
use crate::tools::ToolRunner;

/// Source of interface names and the means to bring one up.
#[async_trait]
pub trait LinkProvider: Send + Sync {
    fn interfaces(&self) -> Result<Vec<String>>;

    async fn bring_up(&self, interface: &str) -> Result<()>;
}

pub struct SystemLinks {
    tools: Arc<dyn ToolRunner>,
}

impl SystemLinks {
    pub fn new(tools: Arc<dyn ToolRunner>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl LinkProvider for SystemLinks {
    fn interfaces(&self) -> Result<Vec<String>> {
        Ok(pnet::datalink::interfaces()
            .into_iter()
            .map(|intf| intf.name)
            .collect())
    }

    async fn bring_up(&self, interface: &str) -> Result<()> {
        self.tools
            .run("ip", &["link", "set", "dev", interface, "up"])
            .await
            .map(|_| ())
    }
}

/// Called once per interface as soon as its lease machine ends.
pub type OutcomeHook = Box<dyn Fn(&str, &Result<Lease>) + Send + Sync>;

pub struct Dispatcher {
    links: Arc<dyn LinkProvider>,
    dhcp: Arc<dyn DhcpClient>,
    cfg: DhcpConfig,
    on_outcome: Option<OutcomeHook>,
}

impl Dispatcher {
    pub fn new(links: Arc<dyn LinkProvider>, dhcp: Arc<dyn DhcpClient>, cfg: DhcpConfig) -> Self {
        Self {
            links,
            dhcp,
            cfg,
            on_outcome: None,
        }
    }

    pub fn on_outcome(mut self, hook: OutcomeHook) -> Self {
        self.on_outcome = Some(hook);
        self
    }

    /// Acquires leases on every interface `selector` matches, concurrently.
    ///
    /// Each interface is driven until its machine ends; a failure on one never
    /// stops the others. Outcomes are reported in the order they finish.
    /// Errors when nothing matches, before any work starts.
    pub async fn run(&self, selector: &InterfaceSelector) -> Result<Summary> {
        let names: Vec<String> = selector.select(self.links.interfaces()?);
        if names.is_empty() {
            return Err(WifiError::NoMatchingInterface(selector.to_string()));
        }

        info!("acquiring leases on {} interface(s): {}", names.len(), names.join(", "));

        let mut tasks: JoinSet<Result<Lease>> = JoinSet::new();
        let mut owners: HashMap<Id, String> = HashMap::new();
        for name in names {
            let links = self.links.clone();
            let machine = LeaseMachine::new(name.clone(), self.dhcp.clone(), self.cfg.clone());
            let interface: String = name.clone();

            let handle = tasks.spawn(async move {
                links.bring_up(&interface).await?;
                machine.run().await
            });
            owners.insert(handle.id(), name);
        }

        let mut summary = Summary {
            attempted: tasks.len(),
            failed: 0,
        };

        while let Some(joined) = tasks.join_next_with_id().await {
            let (name, result): (String, Result<Lease>) = match joined {
                Ok((id, result)) => (owners.remove(&id).unwrap_or_default(), result),
                Err(e) => {
                    let name: String = owners.remove(&e.id()).unwrap_or_default();
                    let err = WifiError::Task {
                        interface: name.clone(),
                        reason: e.to_string(),
                    };
                    (name, Err(err))
                }
            };

            match &result {
                Ok(lease) => info!("{name}: holding {}/{}", lease.address, lease.prefix_len()),
                Err(err) => {
                    error!("{name}: {err}");
                    summary.failed += 1;
                }
            }

            if let Some(hook) = &self.on_outcome {
                hook(&name, &result);
            }
        }

        Ok(summary)
    }
}
