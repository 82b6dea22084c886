use std::path::PathBuf;
use std::time::Duration;

/// Where the generated supplicant profile is written before each attempt.
pub const DEFAULT_PROFILE_PATH: &str = "/tmp/wifi.conf";
pub const DEFAULT_INTERFACE: &str = "wlan0";
/// Where the hook script handed to the DHCP client is written.
pub const DEFAULT_LEASE_SCRIPT_PATH: &str = "/tmp/airlink-udhcpc.sh";

pub struct Config {
    /// Interface to drive.
    ///
    /// The `dhcp` command treats this as a pattern and fans out across every match.
    pub interface: String,
    pub profile_path: PathBuf,
    /// Supplicant binary, resolved through `PATH`.
    pub supplicant: String,
    /// Budget for one connection attempt, from supplicant start to first bound lease.
    pub connect_timeout: Duration,
    pub dhcp: DhcpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            supplicant: "wpa_supplicant".to_string(),
            connect_timeout: Duration::from_secs(30),
            dhcp: DhcpConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DhcpConfig {
    /// External DHCPv4 client binary.
    pub client: String,
    /// Hook script the client runs on every event, reporting the lease it got.
    pub script_path: PathBuf,
    /// Timeout of a single solicit or renew exchange.
    pub attempt_timeout: Duration,
    /// Renewals are requested this long before the lease expires.
    pub safety_margin: Duration,
    pub retry: RetryPolicy,
    /// Base delay between two failed exchanges, jitter is added on top.
    pub backoff: Duration,
}

impl Default for DhcpConfig {
    fn default() -> Self {
        Self {
            client: "udhcpc".to_string(),
            script_path: PathBuf::from(DEFAULT_LEASE_SCRIPT_PATH),
            attempt_timeout: Duration::from_secs(15),
            safety_margin: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            backoff: Duration::from_secs(1),
        }
    }
}

/// How many exchanges a solicit or renew phase may make before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Limited(u32),
    /// Keep trying forever. Must be asked for explicitly.
    Unlimited,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Limited(5)
    }
}

impl RetryPolicy {
    /// Whether another exchange may follow `attempts_made` failed ones.
    pub fn allows(&self, attempts_made: u32) -> bool {
        match self {
            RetryPolicy::Limited(max) => attempts_made < *max,
            RetryPolicy::Unlimited => true,
        }
    }
}
