use colored::*;
use tracing::{info, warn};

use airlink_common::config::Config;
use airlink_core::connect::RenewalTask;
use airlink_core::wifi::WifiWorker;

use crate::terminal::{colors, print, spinner};

pub async fn connect(
    essid: &str,
    secrets: &[&str],
    no_renew: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let worker = WifiWorker::new(cfg).await?;

    let renewal: RenewalTask = {
        let _spinner = spinner::start(format!("Joining {}...", essid.color(colors::SSID)));
        worker.connect_tracked(essid, secrets).await?
    };

    print::aligned_line(worker.interface(), worker.interface().len(), essid.color(colors::SSID));

    if no_renew {
        info!("not renewing, the lease stays until it expires");
        return Ok(());
    }

    info!("renewing the lease in the background, press Ctrl-C to stop");
    tokio::select! {
        result = renewal.wait() => {
            let lease = result?;
            info!("server granted an infinite lease on {}", lease.address);
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, lease renewal stopped");
        }
    }
    Ok(())
}
