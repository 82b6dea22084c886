use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::sync::OnceCell;
use tracing::debug;

use airlink_common::config::DhcpConfig;
use airlink_common::error::{Result, WifiError};
use airlink_common::network::lease::Lease;

use super::DhcpClient;
use crate::tools::ToolRunner;

/// DHCPv4 "infinity" lease time.
const INFINITE_LEASE_SECS: u64 = u32::MAX as u64;

/// Hook run by udhcpc on each event. It configures nothing and only reports the
/// lease, so that [`DhcpClient::handle_lease`] stays the one place that touches
/// the interface.
const LEASE_SCRIPT: &str = r#"#!/bin/sh
case "$1" in
	bound|renew)
		echo "airlink-lease ip=$ip subnet=$subnet router=${router%% *} lease=$lease"
		;;
esac
exit 0
"#;

const SCRIPT_MODE: u32 = 0o700;

static REPORT_RE: OnceLock<Regex> = OnceLock::new();
static LEASE_RE: OnceLock<Regex> = OnceLock::new();

fn report_re() -> &'static Regex {
    REPORT_RE.get_or_init(|| {
        Regex::new(r"(?m)^airlink-lease ip=(\S*) subnet=(\S*) router=(\S*) lease=(\d*)")
            .expect("lease report regex is valid")
    })
}

fn lease_re() -> &'static Regex {
    LEASE_RE.get_or_init(|| {
        Regex::new(r"(?i)lease of (\d{1,3}(?:\.\d{1,3}){3}) obtained.*?lease time (\d+)")
            .expect("lease regex is valid")
    })
}

/// Drives busybox `udhcpc` in one-shot mode for each exchange.
///
/// `udhcpc` runs our own hook script (`-s`), which prints the address, mask,
/// router and lease time it was given; the lease is installed by
/// [`DhcpClient::handle_lease`] with `ip`.
pub struct Udhcpc {
    tools: Arc<dyn ToolRunner>,
    binary: String,
    script_path: PathBuf,
    script: OnceCell<()>,
    attempt_timeout: Duration,
}

impl Udhcpc {
    pub fn new(tools: Arc<dyn ToolRunner>, cfg: &DhcpConfig) -> Self {
        Self {
            tools,
            binary: cfg.client.clone(),
            script_path: cfg.script_path.clone(),
            script: OnceCell::new(),
            attempt_timeout: cfg.attempt_timeout,
        }
    }

    async fn exchange(&self, interface: &str, requested: Option<Ipv4Addr>) -> Result<Lease> {
        self.script
            .get_or_try_init(|| async { write_script(&self.script_path) })
            .await?;

        let script: String = self.script_path.display().to_string();
        let requested: Option<String> = requested.map(|ip| ip.to_string());
        let mut args: Vec<&str> = vec!["-f", "-q", "-n", "-s", script.as_str(), "-i", interface];
        if let Some(ip) = requested.as_deref() {
            args.extend(["-r", ip]);
        }

        let output: String =
            match tokio::time::timeout(self.attempt_timeout, self.tools.run(&self.binary, &args)).await {
                Ok(Ok(output)) => output,
                Ok(Err(err)) => {
                    return Err(WifiError::LeaseTransport {
                        interface: interface.to_string(),
                        reason: err.to_string(),
                    });
                }
                Err(_elapsed) => {
                    return Err(WifiError::LeaseTimeout {
                        interface: interface.to_string(),
                        after: self.attempt_timeout,
                    });
                }
            };

        debug!("{interface}: {}", output.trim());
        parse_lease(&output).ok_or_else(|| WifiError::LeaseTransport {
            interface: interface.to_string(),
            reason: format!("no lease in {} output: {}", self.binary, output.trim()),
        })
    }

    async fn apply(&self, interface: &str, lease: &Lease, args: &[&str]) -> Result<()> {
        self.tools
            .run("ip", args)
            .await
            .map(|_| ())
            .map_err(|err| WifiError::LeaseApply {
                interface: interface.to_string(),
                address: lease.address,
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl DhcpClient for Udhcpc {
    async fn solicit(&self, interface: &str) -> Result<Lease> {
        self.exchange(interface, None).await
    }

    async fn renew(&self, interface: &str, lease: &Lease) -> Result<Lease> {
        self.exchange(interface, Some(lease.address)).await
    }

    async fn handle_lease(&self, interface: &str, lease: &Lease) -> Result<()> {
        let cidr: String = format!("{}/{}", lease.address, lease.prefix_len());
        self.apply(interface, lease, &["addr", "replace", &cidr, "dev", interface])
            .await?;

        if let Some(router) = lease.router {
            let via: String = router.to_string();
            self.apply(
                interface,
                lease,
                &["route", "replace", "default", "via", &via, "dev", interface],
            )
            .await?;
        }
        Ok(())
    }
}

fn write_script(path: &Path) -> Result<()> {
    let to_err = |source: io::Error| WifiError::LeaseScript {
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
        .mode(SCRIPT_MODE)
        .open(path)
        .map_err(to_err)?;
    file.write_all(LEASE_SCRIPT.as_bytes()).map_err(to_err)
}

/// Prefers the hook script's report; falls back to udhcpc's own log line, which
/// carries neither mask nor router.
fn parse_lease(output: &str) -> Option<Lease> {
    parse_report(output).or_else(|| parse_log_line(output))
}

fn parse_report(output: &str) -> Option<Lease> {
    let caps = report_re().captures_iter(output).last()?;
    let address: Ipv4Addr = caps.get(1)?.as_str().parse().ok()?;
    let subnet_mask: Option<Ipv4Addr> = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let router: Option<Ipv4Addr> = caps.get(3).and_then(|m| m.as_str().parse().ok());
    let secs: u64 = caps.get(4)?.as_str().parse().ok()?;

    Some(Lease::new(address, subnet_mask, lifetime(secs)).with_router(router))
}

fn parse_log_line(output: &str) -> Option<Lease> {
    let caps = lease_re().captures(output)?;
    let address: Ipv4Addr = caps.get(1)?.as_str().parse().ok()?;
    let secs: u64 = caps.get(2)?.as_str().parse().ok()?;
    Some(Lease::new(address, None, lifetime(secs)))
}

fn lifetime(secs: u64) -> Duration {
    if secs >= INFINITE_LEASE_SECS {
        Duration::ZERO
    } else {
        Duration::from_secs(secs)
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
