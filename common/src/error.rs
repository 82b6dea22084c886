//! Error taxonomy shared by the parser, the profile generator, the orchestrator
//! and the lease machinery.
//!
//! Messages are meant to be shown to an operator verbatim, so every variant names
//! the interface or SSID it concerns and carries the tool output when there is one.

use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WifiError>;

#[derive(Debug, Error)]
pub enum WifiError {
    /// An external tool could not be started or exited unsuccessfully.
    #[error("{tool}: {output} ({reason})")]
    ToolInvocation {
        tool: String,
        output: String,
        reason: String,
    },

    /// Scan output did not have the shape the parser relies on.
    #[error("unexpected scan output: {0}")]
    ParseAssumptionViolated(String),

    #[error("a profile takes an essid and 0, 1 or 2 secrets, got {0} secrets")]
    InvalidArgumentCount(usize),

    #[error("essid {ssid}: passphrase must be 8 to 63 printable ASCII characters")]
    InvalidPassphrase { ssid: String },

    /// A value that would be written between quotes in the profile cannot be quoted.
    #[error("essid {ssid:?}: {field} must not contain '\"' or control characters")]
    InvalidProfileField { ssid: String, field: &'static str },

    #[error("invalid interface selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A single DHCP exchange ran into its own timeout.
    #[error("{interface}: timeout contacting DHCP server after {after:?}")]
    LeaseTimeout { interface: String, after: Duration },

    /// A DHCP exchange failed for any reason other than a timeout.
    #[error("{interface}: DHCP exchange failed: {reason}")]
    LeaseTransport { interface: String, reason: String },

    #[error("{interface}: applying lease {address} failed: {reason}")]
    LeaseApply {
        interface: String,
        address: Ipv4Addr,
        reason: String,
    },

    /// The whole connection attempt ran out of time before a lease was bound.
    #[error("{interface}: connection to {ssid} timed out after {after:?}")]
    ConnectionTimeout {
        interface: String,
        ssid: String,
        after: Duration,
    },

    #[error("no interfaces match {0}")]
    NoMatchingInterface(String),

    #[error("{}: {source}", path.display())]
    Profile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: cannot write DHCP client script: {source}", path.display())]
    LeaseScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{interface}: task ended abnormally: {reason}")]
    Task { interface: String, reason: String },
}

impl WifiError {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            WifiError::LeaseTimeout { .. } | WifiError::ConnectionTimeout { .. }
        )
    }
}
