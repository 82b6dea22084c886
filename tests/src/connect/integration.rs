#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use airlink_common::config::Config;
use airlink_common::error::WifiError;
use airlink_common::network::lease::Lease;
use airlink_common::network::wifi::{NetworkRecord, SecurityKind};
use airlink_core::connect::Orchestrator;
use airlink_core::wifi::{Wifi, WifiWorker};
use airlink_protocols::wpa;
use tempfile::TempDir;

use crate::fakes::{QueuedDhcp, RecordingSupplicant, ScriptedTools};

const SCAN: &str = "wlan0     Scan completed :
          Cell 01 - Address: 00:11:22:33:44:01
                    Channel:1
                    Encryption key:on
                    ESSID:\"Home\"
                    IE: IEEE 802.11i/WPA2 Version 1
                        Group Cipher : CCMP
                        Pairwise Ciphers (1) : CCMP
                        Authentication Suites (1) : PSK
          Cell 02 - Address: 00:11:22:33:44:02
                    Channel:6
                    Encryption key:on
                    ESSID:\"Office\"
                    IE: IEEE 802.11i/WPA2 Version 1
                        Group Cipher : CCMP
                        Pairwise Ciphers (1) : CCMP
                        Authentication Suites (1) : 802.1x
          Cell 03 - Address: 00:11:22:33:44:03
                    Channel:11
                    Encryption key:on
                    ESSID:\"Home\"
                    IE: IEEE 802.11i/WPA2 Version 1
                        Group Cipher : CCMP
                        Pairwise Ciphers (1) : CCMP
                        Authentication Suites (1) : PSK
          Cell 04 - Address: 00:11:22:33:44:04
                    Channel:11
                    Encryption key:off
                    ESSID:\"Cafe\"
";

fn infinite() -> Lease {
    Lease::new(Ipv4Addr::new(192, 168, 1, 23), Some(Ipv4Addr::new(255, 255, 255, 0)), Duration::ZERO)
}

struct Rig {
    worker: WifiWorker,
    dhcp: Arc<QueuedDhcp>,
    cfg: Config,
    _dir: TempDir,
}

fn rig(leases: Vec<Lease>) -> Rig {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        profile_path: dir.path().join("wifi.conf"),
        ..Config::default()
    };

    let dhcp = Arc::new(QueuedDhcp::new(leases));
    let orchestrator = Orchestrator::new(&cfg, Arc::new(RecordingSupplicant::default()), dhcp.clone());
    let tools = Arc::new(ScriptedTools::default().with("iwlist", SCAN));

    Rig {
        worker: WifiWorker::with_parts("wlan0", tools, orchestrator),
        dhcp,
        cfg,
        _dir: dir,
    }
}

fn profile_on_disk(cfg: &Config) -> String {
    std::fs::read_to_string(&cfg.profile_path).unwrap()
}

#[tokio::test]
async fn scan_then_join_home() {
    let rig = rig(vec![infinite()]);

    let records: Vec<NetworkRecord> = rig.worker.scan_networks().await.unwrap();
    assert_eq!(
        records,
        vec![
            NetworkRecord::new("Home", SecurityKind::WpaPsk),
            NetworkRecord::new("Office", SecurityKind::WpaEap),
            NetworkRecord::new("Cafe", SecurityKind::Open),
        ]
    );

    rig.worker.connect("Home", &["correct horse"]).await.unwrap();

    let expected = wpa::generate_profile("Home", &["correct horse"]).unwrap();
    assert_eq!(profile_on_disk(&rig.cfg), expected.as_str());
}

#[tokio::test]
async fn office_gets_an_enterprise_profile() {
    let rig = rig(vec![infinite()]);

    rig.worker.connect("Office", &["s3cret", "alice"]).await.unwrap();

    let profile = profile_on_disk(&rig.cfg);
    assert!(profile.contains("ssid=\"Office\""));
    assert!(profile.contains("key_mgmt=WPA-EAP"));
    assert!(profile.contains("identity=\"alice\""));
    assert!(profile.contains("password=\"s3cret\""));
}

#[tokio::test]
async fn open_network_needs_no_secret() {
    let rig = rig(vec![infinite()]);

    rig.worker.connect("Cafe", &[]).await.unwrap();
    assert!(profile_on_disk(&rig.cfg).contains("key_mgmt=NONE"));
}

#[tokio::test]
async fn short_passphrase_never_reaches_dhcp() {
    let rig = rig(vec![infinite()]);

    let err = rig.worker.connect("Home", &["short"]).await.unwrap_err();
    assert!(matches!(err, WifiError::InvalidPassphrase { .. }));
    assert_eq!(*rig.dhcp.exchanges.lock().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn silent_server_times_out() {
    let rig = rig(vec![]);

    let err = rig.worker.connect("Cafe", &[]).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("Cafe"));
}

#[tokio::test(start_paused = true)]
async fn renewal_runs_until_infinite() {
    let finite = Lease::new(Ipv4Addr::new(192, 168, 1, 23), None, Duration::from_secs(60));
    let rig = rig(vec![finite.clone(), finite, infinite()]);

    let renewal = rig.worker.connect_tracked("Cafe", &[]).await.unwrap();
    let last = renewal.wait().await.unwrap();

    assert!(last.is_infinite());
    assert_eq!(*rig.dhcp.exchanges.lock().unwrap(), 3);
}
