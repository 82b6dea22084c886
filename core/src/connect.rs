//! # Connection Orchestrator
//!
//! One connection attempt on one interface:
//! 1. the profile is written to the scratch path,
//! 2. the supplicant is started in the background,
//! 3. the lease state machine is started in the background,
//! 4. the first bound lease is raced against the attempt's timer.
//!
//! The timer only decides the outcome; it never aborts the lease task. After a
//! success that task keeps renewing, after a timeout it is left to fail on its own.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use airlink_common::config::{Config, DhcpConfig};
use airlink_common::error::{Result, WifiError};
use airlink_common::network::lease::{ConnectionOutcome, Lease};
use airlink_common::network::wifi::ConnectionProfile;

use crate::dhcp::DhcpClient;
use crate::dhcp::lease::LeaseMachine;

mod supplicant;

pub use supplicant::{Supplicant, WpaSupplicant};

const PROFILE_MODE: u32 = 0o600;

pub struct Orchestrator {
    supplicant: Arc<dyn Supplicant>,
    dhcp: Arc<dyn DhcpClient>,
    profile_path: PathBuf,
    connect_timeout: Duration,
    dhcp_cfg: DhcpConfig,
}

/// The lease task left running after a successful attempt.
pub struct RenewalTask {
    interface: String,
    handle: JoinHandle<Result<Lease>>,
}

impl RenewalTask {
    /// Waits for renewal to end: an infinite lease, or a fatal error.
    pub async fn wait(self) -> Result<Lease> {
        let RenewalTask { interface, handle } = self;
        handle.await.map_err(|e| WifiError::Task {
            interface,
            reason: e.to_string(),
        })?
    }
}

enum Race {
    Bound(Lease),
    EndedUnbound,
    TimedOut,
}

impl Orchestrator {
    pub fn new(cfg: &Config, supplicant: Arc<dyn Supplicant>, dhcp: Arc<dyn DhcpClient>) -> Self {
        Self {
            supplicant,
            dhcp,
            profile_path: cfg.profile_path.clone(),
            connect_timeout: cfg.connect_timeout,
            dhcp_cfg: cfg.dhcp.clone(),
        }
    }

    /// Runs one attempt and reports its outcome. Renewal continues detached.
    pub async fn connect(&self, interface: &str, profile: &ConnectionProfile) -> ConnectionOutcome {
        self.connect_tracked(interface, profile).await.0
    }

    /// Runs one attempt, handing back the renewal task when it succeeded.
    pub async fn connect_tracked(
        &self,
        interface: &str,
        profile: &ConnectionProfile,
    ) -> (ConnectionOutcome, Option<RenewalTask>) {
        if let Err(err) = persist_profile(&self.profile_path, profile) {
            return (ConnectionOutcome::failure(interface, err), None);
        }

        self.spawn_supplicant(interface);

        let (bind_tx, bind_rx) = oneshot::channel::<Lease>();
        let machine = LeaseMachine::new(interface, self.dhcp.clone(), self.dhcp_cfg.clone());
        let renewal = RenewalTask {
            interface: interface.to_string(),
            handle: tokio::spawn(machine.run_reporting(Some(bind_tx))),
        };

        let race: Race = tokio::select! {
            bound = bind_rx => match bound {
                Ok(lease) => Race::Bound(lease),
                Err(_) => Race::EndedUnbound,
            },
            _ = tokio::time::sleep(self.connect_timeout) => Race::TimedOut,
        };

        match race {
            Race::Bound(lease) => {
                info!("{interface}: connected to {} as {}", profile.ssid(), lease.address);
                (ConnectionOutcome::success(interface), Some(renewal))
            }
            Race::EndedUnbound => match renewal.wait().await {
                Ok(_) => (ConnectionOutcome::success(interface), None),
                Err(err) => (ConnectionOutcome::failure(interface, err), None),
            },
            Race::TimedOut => {
                warn!("{interface}: no lease within {}s", self.connect_timeout.as_secs());
                let err = WifiError::ConnectionTimeout {
                    interface: interface.to_string(),
                    ssid: profile.ssid().to_string(),
                    after: self.connect_timeout,
                };
                (ConnectionOutcome::failure(interface, err), None)
            }
        }
    }

    /// The supplicant may daemonize or die early; neither decides the attempt.
    fn spawn_supplicant(&self, interface: &str) {
        let supplicant = self.supplicant.clone();
        let interface: String = interface.to_string();
        let profile_path: PathBuf = self.profile_path.clone();

        tokio::spawn(async move {
            match supplicant.run(&interface, &profile_path).await {
                Ok(()) => info!("{interface}: supplicant exited"),
                Err(err) => warn!("{interface}: supplicant: {err}"),
            }
        });
    }
}

/// Replaces whatever sits at `path` with the profile, readable by the owner only.
fn persist_profile(path: &Path, profile: &ConnectionProfile) -> Result<()> {
    let to_err = |source: io::Error| WifiError::Profile {
        path: path.to_path_buf(),
        source,
    };

    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(to_err(e)),
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(PROFILE_MODE)
        .open(path)
        .map_err(to_err)?;
    file.write_all(profile.as_bytes()).map_err(to_err)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
