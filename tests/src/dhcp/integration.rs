#![cfg(test)]
use std::sync::Arc;

use airlink_common::config::{DhcpConfig, RetryPolicy};
use airlink_common::error::WifiError;
use airlink_common::network::interface::InterfaceSelector;
use airlink_common::network::lease::Summary;
use airlink_core::dhcp::Udhcpc;
use airlink_core::dispatch::Dispatcher;

use tempfile::TempDir;

use crate::fakes::{ScriptedTools, StaticLinks};

const UDHCPC_OUTPUT: &str = "udhcpc: started, v1.36.1
udhcpc: broadcasting discover
udhcpc: broadcasting select for 192.168.1.23, server 192.168.1.1
udhcpc: lease of 192.168.1.23 obtained from 192.168.1.1, lease time 4294967295
airlink-lease ip=192.168.1.23 subnet=255.255.255.0 router=192.168.1.1 lease=4294967295
";

/// A server that offers no mask and no router.
const BARE_OUTPUT: &str = "udhcpc: started, v1.36.1
udhcpc: lease of 10.9.8.7 obtained from 10.9.8.1, lease time 4294967295
airlink-lease ip=10.9.8.7 subnet= router= lease=4294967295
";

fn cfg(dir: &TempDir) -> DhcpConfig {
    DhcpConfig {
        retry: RetryPolicy::Limited(1),
        script_path: dir.path().join("lease.sh"),
        ..DhcpConfig::default()
    }
}

fn dispatcher(links: StaticLinks, tools: Arc<ScriptedTools>, dir: &TempDir) -> Dispatcher {
    let cfg = cfg(dir);
    Dispatcher::new(Arc::new(links), Arc::new(Udhcpc::new(tools, &cfg)), cfg)
}

#[tokio::test]
async fn pattern_fans_out_over_wireless_links() {
    let dir = tempfile::tempdir().unwrap();
    let tools = Arc::new(ScriptedTools::default().with("udhcpc", UDHCPC_OUTPUT));
    let links = StaticLinks::new(&["lo", "eth0", "wlan0", "wlan1"], &["wlan1"]);

    let selector = InterfaceSelector::pattern("^wlan").unwrap();
    let summary: Summary = dispatcher(links, tools.clone(), &dir).run(&selector).await.unwrap();

    assert_eq!(summary, Summary { attempted: 2, failed: 1 });

    let solicits = tools.calls_to("udhcpc");
    assert_eq!(solicits.len(), 1);
    assert!(solicits[0].ends_with("-i wlan0"));

    assert_eq!(
        tools.calls_to("ip"),
        vec![
            "ip addr replace 192.168.1.23/24 dev wlan0",
            "ip route replace default via 192.168.1.1 dev wlan0",
        ]
    );
}

#[tokio::test]
async fn nothing_matches_nothing_runs() {
    let dir = tempfile::tempdir().unwrap();
    let tools = Arc::new(ScriptedTools::default().with("udhcpc", UDHCPC_OUTPUT));
    let links = StaticLinks::new(&["lo", "eth0", "wlan0"], &[]);

    let selector = InterfaceSelector::pattern("^ath").unwrap();
    let err = dispatcher(links, tools.clone(), &dir).run(&selector).await.unwrap_err();

    assert!(matches!(err, WifiError::NoMatchingInterface(_)));
    assert!(tools.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn exact_selector_is_not_a_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let tools = Arc::new(ScriptedTools::default());
    let links = StaticLinks::new(&["wlan0"], &[]);

    let err = dispatcher(links, tools, &dir)
        .run(&InterfaceSelector::exact("wlan"))
        .await
        .unwrap_err();
    assert!(matches!(err, WifiError::NoMatchingInterface(_)));
}

#[tokio::test]
async fn garbage_from_the_client_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let tools = Arc::new(ScriptedTools::default().with("udhcpc", "udhcpc: no lease, failing\n"));
    let links = StaticLinks::new(&["wlan0"], &[]);

    let summary = dispatcher(links, tools.clone(), &dir)
        .run(&InterfaceSelector::exact("wlan0"))
        .await
        .unwrap();

    assert_eq!(summary, Summary { attempted: 1, failed: 1 });
    assert!(tools.calls_to("ip").is_empty());
}

#[tokio::test]
async fn server_without_mask_gets_a_host_route() {
    let dir = tempfile::tempdir().unwrap();
    let tools = Arc::new(ScriptedTools::default().with("udhcpc", BARE_OUTPUT));
    let links = StaticLinks::new(&["wlan0"], &[]);

    let summary = dispatcher(links, tools.clone(), &dir)
        .run(&InterfaceSelector::exact("wlan0"))
        .await
        .unwrap();

    assert_eq!(summary, Summary { attempted: 1, failed: 0 });
    assert_eq!(tools.calls_to("ip"), vec!["ip addr replace 10.9.8.7/32 dev wlan0"]);
}
