//! The DHCPv4 client boundary.
//!
//! The wire protocol lives in an external client; this crate only needs it to
//! solicit a first lease, renew an existing one, and install a lease on the interface.
//! [`lease::LeaseMachine`] sequences those calls for a single interface.

use async_trait::async_trait;

use airlink_common::error::Result;
use airlink_common::network::lease::Lease;

pub mod lease;
mod udhcpc;

pub use udhcpc::Udhcpc;

#[async_trait]
pub trait DhcpClient: Send + Sync {
    /// Obtains a first lease for `interface`.
    ///
    /// A per-exchange timeout must surface as `WifiError::LeaseTimeout` so
    /// retries can be told apart from other failures.
    async fn solicit(&self, interface: &str) -> Result<Lease>;

    /// Extends `lease`, returning the lease that supersedes it.
    async fn renew(&self, interface: &str, lease: &Lease) -> Result<Lease>;

    /// Installs the lease's address and mask on the interface.
    async fn handle_lease(&self, interface: &str, lease: &Lease) -> Result<()>;
}
