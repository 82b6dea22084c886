//! # airlink core
//!
//! Drives a wireless interface from "down" to "holds a DHCPv4 lease".
//!
//! * **[`tools`]**: runs the external wireless and link tools.
//! * **[`wifi`]**: the operator-facing surface (list, scan, current network, connect).
//! * **[`connect`]**: one connection attempt, supplicant and lease raced against a timer.
//! * **[`dhcp`]**: the DHCPv4 client boundary and the per-interface lease state machine.
//! * **[`dispatch`]**: fans lease acquisition out over every matching interface.

pub mod connect;
pub mod dhcp;
pub mod dispatch;
pub mod tools;
pub mod wifi;
