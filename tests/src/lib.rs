//! Cross-crate scenarios: scan output through to profiles on disk, and leases
//! through the real `udhcpc` driver with scripted tool output.

#[cfg(test)]
mod fakes;

mod connect;
mod dhcp;
