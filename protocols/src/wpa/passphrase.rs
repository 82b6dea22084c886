use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use airlink_common::error::{Result, WifiError};

const PBKDF2_ROUNDS: u32 = 4096;
const MIN_PASSPHRASE_LEN: usize = 8;
const MAX_PASSPHRASE_LEN: usize = 63;

/// Turns a personal-mode passphrase into the 256-bit pre-shared key.
pub trait PassphraseDeriver: Send + Sync {
    fn derive(&self, ssid: &str, passphrase: &str) -> Result<[u8; 32]>;
}

/// IEEE 802.11i passphrase mapping: PBKDF2(HMAC-SHA1, passphrase, ssid, 4096, 256).
pub struct Pbkdf2Sha1;

impl PassphraseDeriver for Pbkdf2Sha1 {
    fn derive(&self, ssid: &str, passphrase: &str) -> Result<[u8; 32]> {
        let printable = passphrase.bytes().all(|b| (0x20..=0x7e).contains(&b));
        if !printable || !(MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&passphrase.len()) {
            return Err(WifiError::InvalidPassphrase {
                ssid: ssid.to_string(),
            });
        }

        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha1>(passphrase.as_bytes(), ssid.as_bytes(), PBKDF2_ROUNDS, &mut key);
        Ok(key)
    }
}
