//! Text formats spoken by the wireless tooling airlink drives.
//!
//! * [`iwlist`]: scan output → [`NetworkRecord`](airlink_common::network::wifi::NetworkRecord)s.
//! * [`iwconfig`]: interface status → wireless interface names.
//! * [`wpa`]: supplicant profile documents.

pub mod iwconfig;
pub mod iwlist;
pub mod wpa;
