//! # Lease State Machine
//!
//! Keeps one interface holding a DHCPv4 lease:
//!
//! ```text
//! Soliciting ──► Bound ──► Renewing ──► Bound ──► … ──► Infinite
//!      │                       │
//!      └───────────────────────┴──► Fatal (retries exhausted, or the lease
//!                                     could not be installed)
//! ```
//!
//! Transitions for one interface are strictly sequential; only one exchange is ever
//! in flight per machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use airlink_common::config::DhcpConfig;
use airlink_common::error::Result;
use airlink_common::network::lease::Lease;

use super::DhcpClient;

enum State {
    Soliciting,
    Bound(Lease),
    Renewing(Lease),
}

pub struct LeaseMachine {
    interface: String,
    client: Arc<dyn DhcpClient>,
    cfg: DhcpConfig,
}

impl LeaseMachine {
    pub fn new(interface: impl Into<String>, client: Arc<dyn DhcpClient>, cfg: DhcpConfig) -> Self {
        Self {
            interface: interface.into(),
            client,
            cfg,
        }
    }

    /// Acquires and renews until the server grants an infinite lease or an error is fatal.
    ///
    /// Returns the infinite lease. With a finite lease this keeps renewing for as
    /// long as the server keeps answering.
    pub async fn run(self) -> Result<Lease> {
        self.run_reporting(None).await
    }

    /// Like [`LeaseMachine::run`], additionally sending the first bound lease on `first_bind`.
    ///
    /// If the machine fails before binding, the sender is dropped without a value.
    pub async fn run_reporting(self, first_bind: Option<oneshot::Sender<Lease>>) -> Result<Lease> {
        let result = self.drive(first_bind).await;
        if let Err(err) = &result {
            error!("{}: giving up on DHCPv4: {err}", self.interface);
        }
        result
    }

    async fn drive(&self, mut first_bind: Option<oneshot::Sender<Lease>>) -> Result<Lease> {
        let mut state = State::Soliciting;
        info!("{}: start getting DHCPv4 lease", self.interface);

        loop {
            state = match state {
                State::Soliciting => State::Bound(self.exchange(None).await?),
                State::Renewing(previous) => State::Bound(self.exchange(Some(&previous)).await?),
                State::Bound(lease) => {
                    self.client.handle_lease(&self.interface, &lease).await?;
                    info!(
                        "{}: bound to {}/{}",
                        self.interface,
                        lease.address,
                        lease.prefix_len()
                    );

                    if let Some(tx) = first_bind.take() {
                        let _ = tx.send(lease.clone());
                    }

                    if lease.is_infinite() {
                        info!("{}: server returned infinite lease", self.interface);
                        return Ok(lease);
                    }

                    let delay: Duration = renewal_delay(lease.valid_lifetime, self.cfg.safety_margin);
                    info!("{}: renewing in {}s", self.interface, delay.as_secs());
                    tokio::time::sleep(delay).await;
                    State::Renewing(lease)
                }
            };
        }
    }

    /// One solicit (no previous lease) or renew phase, retried per the configured policy.
    async fn exchange(&self, previous: Option<&Lease>) -> Result<Lease> {
        let kind: &str = if previous.is_some() { "renewal" } else { "request" };
        let mut attempts: u32 = 0;

        loop {
            if attempts > 0 {
                info!("{}: resending DHCPv4 {kind}", self.interface);
            }

            let result = match previous {
                None => self.client.solicit(&self.interface).await,
                Some(lease) => self.client.renew(&self.interface, lease).await,
            };
            attempts += 1;

            let err = match result {
                Ok(lease) => return Ok(lease),
                Err(err) => err,
            };

            if err.is_timeout() {
                warn!("{}: timeout contacting DHCP server", self.interface);
            } else {
                warn!("{}: error: {err}", self.interface);
            }

            if !self.cfg.retry.allows(attempts) {
                return Err(err);
            }
            tokio::time::sleep(self.backoff()).await;
        }
    }

    fn backoff(&self) -> Duration {
        let base: Duration = self.cfg.backoff;
        let max_jitter: u64 = (base.as_millis() / 2) as u64;
        base + Duration::from_millis(rand::random_range(0..=max_jitter))
    }
}

/// How long to stay bound before renewing a lease of `lifetime`.
///
/// Servers owe no grace period, so renewal happens `margin` ahead of expiry. A
/// lifetime too short to take the margin off renews halfway through instead.
pub fn renewal_delay(lifetime: Duration, margin: Duration) -> Duration {
    if lifetime > margin {
        lifetime - margin
    } else {
        lifetime / 2
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
