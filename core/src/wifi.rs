//! # Wireless Operations
//!
//! The operator-facing surface: list wireless interfaces, scan, show the current
//! network, and connect. Every failure comes back as a [`WifiError`] whose message
//! is meant to be shown as is.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use airlink_common::config::Config;
use airlink_common::error::{Result, WifiError};
use airlink_common::network::wifi::{ConnectionProfile, NetworkRecord};
use airlink_protocols::{
    iwconfig, iwlist,
    wpa::{self, PassphraseDeriver, Pbkdf2Sha1},
};

use crate::connect::{Orchestrator, RenewalTask, WpaSupplicant};
use crate::dhcp::Udhcpc;
use crate::tools::{SystemTools, ToolRunner};

#[async_trait]
pub trait Wifi: Send + Sync {
    /// Names of the wireless interfaces on this host.
    async fn list_interfaces(&self) -> Result<Vec<String>>;

    /// Networks heard by the interface, one record per SSID.
    async fn scan_networks(&self) -> Result<Vec<NetworkRecord>>;

    /// SSID the interface is associated with, empty when it is not associated.
    async fn current_network(&self) -> Result<String>;

    /// Joins `ssid` with 0, 1 (passphrase) or 2 (passphrase, identity) secrets.
    async fn connect(&self, ssid: &str, secrets: &[&str]) -> Result<()>;
}

/// [`Wifi`] for one interface, backed by the standard wireless tools.
pub struct WifiWorker {
    interface: String,
    tools: Arc<dyn ToolRunner>,
    orchestrator: Orchestrator,
    deriver: Box<dyn PassphraseDeriver>,
}

impl WifiWorker {
    /// Builds a worker on the system tools and brings its interface up.
    pub async fn new(cfg: &Config) -> Result<Self> {
        let worker = Self::from_config(cfg);
        worker
            .tools
            .run("ip", &["link", "set", "dev", &worker.interface, "up"])
            .await?;
        Ok(worker)
    }

    /// Same wiring as [`WifiWorker::new`], leaving the link as it is.
    pub fn from_config(cfg: &Config) -> Self {
        let tools: Arc<dyn ToolRunner> = Arc::new(SystemTools);
        let orchestrator = Orchestrator::new(
            cfg,
            Arc::new(WpaSupplicant::new(cfg.supplicant.clone())),
            Arc::new(Udhcpc::new(tools.clone(), &cfg.dhcp)),
        );
        Self::with_parts(&cfg.interface, tools, orchestrator)
    }

    pub fn with_parts(interface: &str, tools: Arc<dyn ToolRunner>, orchestrator: Orchestrator) -> Self {
        Self {
            interface: interface.to_string(),
            tools,
            orchestrator,
            deriver: Box::new(Pbkdf2Sha1),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Connects and hands back the task that keeps the lease renewed.
    pub async fn connect_tracked(&self, ssid: &str, secrets: &[&str]) -> Result<RenewalTask> {
        let profile: ConnectionProfile =
            wpa::generate_profile_with(self.deriver.as_ref(), ssid, secrets)?;
        info!("{}: connecting to {ssid}", self.interface);

        let (outcome, renewal) = self
            .orchestrator
            .connect_tracked(&self.interface, &profile)
            .await;
        outcome.into_result()?;

        renewal.ok_or_else(|| WifiError::Task {
            interface: self.interface.clone(),
            reason: "lease ended before renewal could be tracked".to_string(),
        })
    }
}

#[async_trait]
impl Wifi for WifiWorker {
    async fn list_interfaces(&self) -> Result<Vec<String>> {
        let output: String = self.tools.run("iwconfig", &[]).await?;
        Ok(iwconfig::parse_interfaces(&output))
    }

    async fn scan_networks(&self) -> Result<Vec<NetworkRecord>> {
        let output: String = self
            .tools
            .run("iwlist", &[&self.interface, "scanning"])
            .await?;
        iwlist::parse_scan(&output)
    }

    async fn current_network(&self) -> Result<String> {
        let output: String = self.tools.run("iwgetid", &["-r"]).await?;
        Ok(output.trim().to_string())
    }

    async fn connect(&self, ssid: &str, secrets: &[&str]) -> Result<()> {
        let profile: ConnectionProfile =
            wpa::generate_profile_with(self.deriver.as_ref(), ssid, secrets)?;
        info!("{}: connecting to {ssid}", self.interface);
        self.orchestrator
            .connect(&self.interface, &profile)
            .await
            .into_result()
    }
}
