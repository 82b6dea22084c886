//! # Wireless Network Models
//!
//! Records produced by a scan and the supplicant profile built to join one of them.

use std::fmt;

/// Security scheme a network requires, as inferred from scan output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityKind {
    /// No encryption key.
    Open,
    /// WPA2 personal, pre-shared key.
    WpaPsk,
    /// WPA2 enterprise, 802.1x identity and password.
    WpaEap,
    /// WEP or anything else we cannot build a profile for.
    Unsupported,
}

impl fmt::Display for SecurityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SecurityKind::Open => "Open",
            SecurityKind::WpaPsk => "WPA2-PSK",
            SecurityKind::WpaEap => "WPA2-EAP",
            SecurityKind::Unsupported => "Unsupported",
        };
        f.write_str(label)
    }
}

/// One network seen during a scan. A scan result holds at most one record per SSID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRecord {
    pub ssid: String,
    pub security: SecurityKind,
}

impl NetworkRecord {
    pub fn new(ssid: impl Into<String>, security: SecurityKind) -> Self {
        Self {
            ssid: ssid.into(),
            security,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Open,
    PreShared,
    Enterprise,
}

/// A supplicant configuration document for a single network block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    ssid: String,
    kind: ProfileKind,
    text: String,
}

impl ConnectionProfile {
    pub fn new(ssid: impl Into<String>, kind: ProfileKind, text: String) -> Self {
        Self {
            ssid: ssid.into(),
            kind,
            text,
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl SecurityKind {
    /// Number of secrets a profile for this kind of network needs.
    ///
    /// `None` when no profile can be built at all.
    pub fn secrets_required(&self) -> Option<usize> {
        match self {
            SecurityKind::Open => Some(0),
            SecurityKind::WpaPsk => Some(1),
            SecurityKind::WpaEap => Some(2),
            SecurityKind::Unsupported => None,
        }
    }
}
