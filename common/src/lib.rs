//! Shared building blocks for the airlink workspace.
//!
//! * **[`config`]**: runtime knobs for connecting and lease handling.
//! * **[`error`]**: the [`WifiError`](error::WifiError) taxonomy used by every crate.
//! * **[`network`]**: domain models (scan records, profiles, leases, selectors).

pub mod config;
pub mod error;
pub mod network;
