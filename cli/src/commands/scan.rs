use std::time::Instant;

use colored::*;

use airlink_common::config::Config;
use airlink_common::network::wifi::{NetworkRecord, SecurityKind};
use airlink_core::wifi::{Wifi, WifiWorker};

use crate::mprint;
use crate::terminal::{colors, print, spinner};

pub async fn scan(cfg: &Config) -> anyhow::Result<()> {
    let worker = WifiWorker::new(cfg).await?;

    let start_time: Instant = Instant::now();
    let records: Vec<NetworkRecord> = {
        let _spinner = spinner::start(format!("Scanning on {}...", worker.interface()));
        worker.scan_networks().await?
    };

    if records.is_empty() {
        print::header("no networks in range");
        print::no_results();
        return Ok(());
    }

    print::header("nearby networks");
    for (idx, record) in records.iter().enumerate() {
        print_record(idx, record);
        if idx + 1 != records.len() {
            mprint!();
        }
    }

    let found: ColoredString = format!("{} networks", records.len()).bold().green();
    let took: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    print::fat_separator();
    print::centerln(&format!("Scan Complete: {found} heard in {took}"));
    Ok(())
}

fn print_record(idx: usize, record: &NetworkRecord) {
    let name: &str = if record.ssid.is_empty() { "<hidden>" } else { &record.ssid };
    print::tree_head(idx, name);

    let security: ColoredString = record.security.to_string().color(security_color(record.security));
    let secrets: ColoredString = match record.security.secrets_required() {
        Some(0) => "none".color(colors::TEXT_DEFAULT),
        Some(1) => "passphrase".color(colors::TEXT_DEFAULT),
        Some(_) => "password, identity".color(colors::TEXT_DEFAULT),
        None => "cannot connect".color(colors::UNSUPPORTED),
    };
    let details: Vec<(String, ColoredString)> = vec![
        ("Security".to_string(), security),
        ("Secrets".to_string(), secrets),
    ];
    print::as_tree_one_level(details);
}

fn security_color(kind: SecurityKind) -> Color {
    match kind {
        SecurityKind::Open => colors::INSECURE,
        SecurityKind::WpaPsk | SecurityKind::WpaEap => colors::SECURE,
        SecurityKind::Unsupported => colors::UNSUPPORTED,
    }
}
