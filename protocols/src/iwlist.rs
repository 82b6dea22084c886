//! # Scan Output Parser
//!
//! Turns `iwlist <iface> scanning` output into one [`NetworkRecord`] per SSID.
//!
//! The output is a sequence of cell blocks, one per access point heard. Each block
//! is expected to carry exactly one `ESSID` line and one `Encryption key` line,
//! in the same order across blocks. Only IEEE 802.11i/WPA2 version 1 is
//! recognised, and a network is assumed to advertise a single authentication suite.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use airlink_common::error::{Result, WifiError};
use airlink_common::network::wifi::{NetworkRecord, SecurityKind};

static CELL_RE: OnceLock<Regex> = OnceLock::new();
static ESSID_RE: OnceLock<Regex> = OnceLock::new();
static ENCRYPTION_RE: OnceLock<Regex> = OnceLock::new();
static WPA2_RE: OnceLock<Regex> = OnceLock::new();
static AUTH_SUITES_RE: OnceLock<Regex> = OnceLock::new();

fn cell_re() -> &'static Regex {
    CELL_RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*Cell").expect("cell regex is valid"))
}

fn essid_re() -> &'static Regex {
    ESSID_RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*ESSID.*$").expect("essid regex is valid"))
}

fn encryption_re() -> &'static Regex {
    ENCRYPTION_RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*Encryption key:(on|off)[ \t\r]*$").expect("encryption regex is valid")
    })
}

fn wpa2_re() -> &'static Regex {
    WPA2_RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*IE: IEEE 802\.11i/WPA2 Version 1[ \t\r]*$")
            .expect("wpa2 regex is valid")
    })
}

fn auth_suites_re() -> &'static Regex {
    AUTH_SUITES_RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*Authentication Suites .*$").expect("auth suites regex is valid")
    })
}

/// Parses scan output into records, first occurrence of an SSID wins.
///
/// Output without any cell (interface up but nothing heard, or no carrier) yields an
/// empty list. Output whose ESSID or encryption lines do not pair up one-to-one with
/// the cells is rejected, since records could no longer be matched to their cells.
pub fn parse_scan(output: &str) -> Result<Vec<NetworkRecord>> {
    let cells: Vec<usize> = cell_re().find_iter(output).map(|m| m.start()).collect();
    if cells.is_empty() {
        return Ok(Vec::new());
    }

    let essids: Vec<&str> = essid_re().find_iter(output).map(|m| m.as_str()).collect();
    let encryption: Vec<&str> = encryption_re()
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if essids.len() != cells.len() || encryption.len() != cells.len() {
        return Err(WifiError::ParseAssumptionViolated(format!(
            "{} cells, {} ESSID lines and {} encryption key lines",
            cells.len(),
            essids.len(),
            encryption.len()
        )));
    }

    let mut known: HashSet<String> = HashSet::new();
    let mut records: Vec<NetworkRecord> = Vec::new();

    for (idx, &start) in cells.iter().enumerate() {
        let ssid: String = essid_value(essids[idx]);
        if !known.insert(ssid.clone()) {
            debug!("{ssid} seen again in cell {}, keeping the first one", idx + 1);
            continue;
        }

        if encryption[idx] == "off" {
            records.push(NetworkRecord::new(ssid, SecurityKind::Open));
            continue;
        }

        // A cell's suites must not be read from the cell after it.
        let end: usize = cells.get(idx + 1).copied().unwrap_or(output.len());
        let security: SecurityKind = classify_cell(&output[start..end]);
        records.push(NetworkRecord::new(ssid, security));
    }

    Ok(records)
}

fn essid_value(line: &str) -> String {
    line.split_once(':')
        .map(|(_, value)| value.trim().trim_matches('"'))
        .unwrap_or_default()
        .to_string()
}

fn classify_cell(cell: &str) -> SecurityKind {
    let Some(marker) = wpa2_re().find(cell) else {
        return SecurityKind::Unsupported;
    };

    let suite: Option<&str> = auth_suites_re()
        .find(&cell[marker.end()..])
        .and_then(|line| line.as_str().split_once(':'))
        .map(|(_, value)| value.trim());

    match suite {
        Some("PSK") => SecurityKind::WpaPsk,
        Some("802.1x") => SecurityKind::WpaEap,
        _ => SecurityKind::Unsupported,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(idx: usize, essid: &str, key: &str, extra: &str) -> String {
        format!(
            "          Cell {idx:02} - Address: 00:11:22:33:44:{idx:02}
                    Channel:6
                    Frequency:2.437 GHz (Channel 6)
                    Quality=70/70  Signal level=-40 dBm
                    Encryption key:{key}
                    ESSID:\"{essid}\"
                    Mode:Master
{extra}"
        )
    }

    fn wpa2(suite: &str) -> String {
        format!(
            "                    IE: IEEE 802.11i/WPA2 Version 1
                        Group Cipher : CCMP
                        Pairwise Ciphers (1) : CCMP
                        Authentication Suites (1) : {suite}
"
        )
    }

    fn scan(cells: &[String]) -> String {
        format!("wlan0     Scan completed :\n{}", cells.concat())
    }

    #[test]
    fn open_network() {
        let output = scan(&[cell(1, "Cafe", "off", "")]);
        assert_eq!(
            parse_scan(&output).unwrap(),
            vec![NetworkRecord::new("Cafe", SecurityKind::Open)]
        );
    }

    #[test]
    fn psk_and_eap_networks() {
        let output = scan(&[
            cell(1, "Home", "on", &wpa2("PSK")),
            cell(2, "Office", "on", &wpa2("802.1x")),
        ]);
        assert_eq!(
            parse_scan(&output).unwrap(),
            vec![
                NetworkRecord::new("Home", SecurityKind::WpaPsk),
                NetworkRecord::new("Office", SecurityKind::WpaEap),
            ]
        );
    }

    #[test]
    fn unknown_suite_is_unsupported() {
        let output = scan(&[cell(1, "Lab", "on", &wpa2("SAE"))]);
        assert_eq!(parse_scan(&output).unwrap()[0].security, SecurityKind::Unsupported);
    }

    #[test]
    fn wep_is_unsupported() {
        let output = scan(&[cell(1, "Legacy", "on", "")]);
        assert_eq!(parse_scan(&output).unwrap()[0].security, SecurityKind::Unsupported);
    }

    #[test]
    fn suites_of_the_next_cell_are_not_borrowed() {
        let output = scan(&[
            cell(1, "Legacy", "on", ""),
            cell(2, "Home", "on", &wpa2("PSK")),
        ]);
        let records = parse_scan(&output).unwrap();
        assert_eq!(records[0], NetworkRecord::new("Legacy", SecurityKind::Unsupported));
        assert_eq!(records[1], NetworkRecord::new("Home", SecurityKind::WpaPsk));
    }

    #[test]
    fn wpa2_without_own_suite_line_is_unsupported() {
        let marker_only = "                    IE: IEEE 802.11i/WPA2 Version 1\n";
        let output = scan(&[
            cell(1, "Half", "on", marker_only),
            cell(2, "Office", "on", &wpa2("802.1x")),
        ]);
        let records = parse_scan(&output).unwrap();
        assert_eq!(records[0].security, SecurityKind::Unsupported);
        assert_eq!(records[1].security, SecurityKind::WpaEap);
    }

    #[test]
    fn open_ignores_suites_elsewhere() {
        let output = scan(&[
            cell(1, "Cafe", "off", &wpa2("PSK")),
            cell(2, "Home", "on", &wpa2("PSK")),
        ]);
        assert_eq!(parse_scan(&output).unwrap()[0].security, SecurityKind::Open);
    }

    #[test]
    fn first_occurrence_wins() {
        let output = scan(&[
            cell(1, "Home", "off", ""),
            cell(2, "Home", "on", &wpa2("PSK")),
        ]);
        assert_eq!(
            parse_scan(&output).unwrap(),
            vec![NetworkRecord::new("Home", SecurityKind::Open)]
        );
    }

    #[test]
    fn one_record_per_distinct_ssid() {
        let output = scan(&[
            cell(1, "Home", "on", &wpa2("PSK")),
            cell(2, "Cafe", "off", ""),
            cell(3, "Home", "on", &wpa2("PSK")),
            cell(4, "Home", "on", &wpa2("PSK")),
            cell(5, "Cafe", "off", ""),
        ]);
        let records = parse_scan(&output).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ssid, "Home");
        assert_eq!(records[1].ssid, "Cafe");
    }

    #[test]
    fn no_cells_is_empty() {
        assert!(parse_scan("wlan0     No scan results\n").unwrap().is_empty());
        assert!(parse_scan("").unwrap().is_empty());
    }

    #[test]
    fn missing_essid_line_is_rejected() {
        let broken = cell(1, "Home", "on", &wpa2("PSK")).replace("ESSID:\"Home\"", "");
        let output = scan(&[broken, cell(2, "Cafe", "off", "")]);
        let err = parse_scan(&output).unwrap_err();
        assert!(matches!(err, WifiError::ParseAssumptionViolated(_)));
    }

    #[test]
    fn ssid_keeps_inner_colons() {
        let output = scan(&[cell(1, "lab:5g", "off", "")]);
        assert_eq!(parse_scan(&output).unwrap()[0].ssid, "lab:5g");
    }

    #[test]
    fn hidden_network_has_empty_ssid() {
        let output = scan(&[cell(1, "", "off", "")]);
        assert_eq!(parse_scan(&output).unwrap()[0].ssid, "");
    }
}
