//! # Supplicant Profiles
//!
//! Builds the single `network={...}` block handed to the supplicant for one attempt.
//!
//! The shape is picked from how many secrets follow the SSID:
//! * none: open network.
//! * a passphrase: WPA2 personal, the passphrase is turned into the 256-bit key.
//! * a passphrase and an identity: WPA2 enterprise with plaintext credentials,
//!   which is what the EAP exchange needs.

mod passphrase;

pub use passphrase::{PassphraseDeriver, Pbkdf2Sha1};

use airlink_common::error::{Result, WifiError};
use airlink_common::network::wifi::{ConnectionProfile, ProfileKind};

/// Generates a profile with the standard PBKDF2-HMAC-SHA1 passphrase derivation.
pub fn generate_profile(ssid: &str, secrets: &[&str]) -> Result<ConnectionProfile> {
    generate_profile_with(&Pbkdf2Sha1, ssid, secrets)
}

pub fn generate_profile_with(
    deriver: &dyn PassphraseDeriver,
    ssid: &str,
    secrets: &[&str],
) -> Result<ConnectionProfile> {
    quotable(ssid, "essid", ssid)?;

    match secrets {
        [] => Ok(ConnectionProfile::new(ssid, ProfileKind::Open, open_block(ssid))),
        [passphrase] => {
            let key: [u8; 32] = deriver.derive(ssid, passphrase)?;
            Ok(ConnectionProfile::new(
                ssid,
                ProfileKind::PreShared,
                psk_block(ssid, &key),
            ))
        }
        [password, identity] => {
            quotable(ssid, "identity", identity)?;
            quotable(ssid, "password", password)?;
            Ok(ConnectionProfile::new(
                ssid,
                ProfileKind::Enterprise,
                eap_block(ssid, identity, password),
            ))
        }
        _ => Err(WifiError::InvalidArgumentCount(secrets.len())),
    }
}

/// The supplicant reads a quoted value up to the closing quote on the same line.
fn quotable(ssid: &str, field: &'static str, value: &str) -> Result<()> {
    if value.chars().any(|c| c == '"' || c.is_control()) {
        return Err(WifiError::InvalidProfileField {
            ssid: ssid.to_string(),
            field,
        });
    }
    Ok(())
}

fn open_block(ssid: &str) -> String {
    format!("network={{\n\tssid=\"{ssid}\"\n\tproto=RSN\n\tkey_mgmt=NONE\n}}\n")
}

fn psk_block(ssid: &str, key: &[u8; 32]) -> String {
    format!("network={{\n\tssid=\"{ssid}\"\n\tpsk={}\n}}\n", hex::encode(key))
}

fn eap_block(ssid: &str, identity: &str, password: &str) -> String {
    format!(
        "network={{\n\tssid=\"{ssid}\"\n\tkey_mgmt=WPA-EAP\n\tidentity=\"{identity}\"\n\tpassword=\"{password}\"\n}}\n"
    )
}
