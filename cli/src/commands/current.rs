use colored::*;

use airlink_common::config::Config;
use airlink_core::wifi::{Wifi, WifiWorker};

use crate::terminal::{colors, print};

pub async fn current(cfg: &Config) -> anyhow::Result<()> {
    let worker = WifiWorker::from_config(cfg);
    let ssid: String = worker.current_network().await?;

    let value: ColoredString = if ssid.is_empty() {
        "not associated".color(colors::SEPARATOR)
    } else {
        ssid.color(colors::SSID)
    };
    print::aligned_line(worker.interface(), worker.interface().len(), value);
    Ok(())
}
