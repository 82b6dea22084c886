use std::sync::Arc;

use colored::*;

use airlink_common::config::Config;
use airlink_common::error::Result as WifiResult;
use airlink_common::network::interface::InterfaceSelector;
use airlink_common::network::lease::{Lease, Summary};
use airlink_core::dhcp::Udhcpc;
use airlink_core::dispatch::{Dispatcher, SystemLinks};
use airlink_core::tools::{SystemTools, ToolRunner};

use crate::terminal::print;

pub async fn dhcp(exact: bool, cfg: &Config) -> anyhow::Result<()> {
    let selector: InterfaceSelector = if exact {
        InterfaceSelector::exact(cfg.interface.clone())
    } else {
        InterfaceSelector::pattern(&cfg.interface)?
    };

    let tools: Arc<dyn ToolRunner> = Arc::new(SystemTools);
    let dispatcher = Dispatcher::new(
        Arc::new(SystemLinks::new(tools.clone())),
        Arc::new(Udhcpc::new(tools, &cfg.dhcp)),
        cfg.dhcp.clone(),
    )
    .on_outcome(Box::new(report));

    let summary: Summary = dispatcher.run(&selector).await?;

    let attempts: ColoredString = format!("{} attempts", summary.attempted).bold().green();
    let failed: ColoredString = match summary.failed {
        0 => format!("{} failed", summary.failed).bold().green(),
        _ => format!("{} failed", summary.failed).bold().red(),
    };
    print::fat_separator();
    print::centerln(&format!("{attempts}, {failed}"));
    Ok(())
}

fn report(interface: &str, result: &WifiResult<Lease>) {
    let status: ColoredString = match result {
        Ok(lease) => format!("{}/{}", lease.address, lease.prefix_len()).green(),
        Err(_) => "failed".red(),
    };
    print::aligned_line(interface, interface.len(), status);
}
