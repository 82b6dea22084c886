//! # Lease & Outcome Models
//!
//! What a DHCP exchange hands back, and what a connection attempt reports.

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::error::{Result, WifiError};

/// An IPv4 address assignment.
///
/// A lease is never changed in place; a renewal produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub address: Ipv4Addr,
    pub subnet_mask: Option<Ipv4Addr>,
    /// Zero means the lease never expires.
    pub valid_lifetime: Duration,
    /// Default gateway offered with the lease.
    pub router: Option<Ipv4Addr>,
}

impl Lease {
    pub fn new(address: Ipv4Addr, subnet_mask: Option<Ipv4Addr>, valid_lifetime: Duration) -> Self {
        Self {
            address,
            subnet_mask,
            valid_lifetime,
            router: None,
        }
    }

    pub fn with_router(mut self, router: Option<Ipv4Addr>) -> Self {
        self.router = router;
        self
    }

    pub fn is_infinite(&self) -> bool {
        self.valid_lifetime.is_zero()
    }

    /// The mask to install. Servers that omit one get the address itself.
    pub fn netmask(&self) -> Ipv4Addr {
        self.subnet_mask.unwrap_or(self.address)
    }

    /// Prefix length of [`Lease::netmask`]. A non-contiguous mask yields a host route.
    pub fn prefix_len(&self) -> u8 {
        let mask: u32 = self.netmask().into();
        let ones = mask.leading_ones();
        if ones + mask.trailing_zeros() == 32 {
            ones as u8
        } else {
            32
        }
    }
}

/// Terminal result of one connection attempt on one interface.
#[derive(Debug)]
pub struct ConnectionOutcome {
    pub interface: String,
    pub succeeded: bool,
    pub error: Option<WifiError>,
}

impl ConnectionOutcome {
    pub fn success(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(interface: impl Into<String>, error: WifiError) -> Self {
        Self {
            interface: interface.into(),
            succeeded: false,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None if self.succeeded => Ok(()),
            None => Err(WifiError::Task {
                interface: self.interface,
                reason: "failed without an error".to_string(),
            }),
        }
    }
}

/// Totals reported by the multi-interface dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub attempted: usize,
    pub failed: usize,
}

impl Summary {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}
