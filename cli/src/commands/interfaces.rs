use airlink_common::config::Config;
use airlink_core::wifi::{Wifi, WifiWorker};

use crate::terminal::print;

pub async fn interfaces(cfg: &Config) -> anyhow::Result<()> {
    let worker = WifiWorker::from_config(cfg);
    let names: Vec<String> = worker.list_interfaces().await?;

    if names.is_empty() {
        print::no_results();
        return Ok(());
    }

    for (idx, name) in names.iter().enumerate() {
        print::tree_head(idx, name);
    }
    Ok(())
}
