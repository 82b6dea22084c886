pub mod connect;
pub mod current;
pub mod dhcp;
pub mod interfaces;
pub mod scan;

use clap::{Parser, Subcommand};
use airlink_common::config::DEFAULT_INTERFACE;

#[derive(Parser)]
#[command(name = "airlink")]
#[command(about = "Join wireless networks and keep their leases alive.")]
pub struct CommandLine {
    /// Wireless interface to use; a regex for `dhcp` unless --exact is given
    #[arg(short, long, global = true, default_value = DEFAULT_INTERFACE)]
    pub interface: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List wireless interfaces on this device
    #[command(alias = "i")]
    Interfaces,
    /// List nearby networks and how they are secured
    #[command(alias = "s")]
    Scan,
    /// Show the network the interface is associated with
    #[command(alias = "w")]
    Current,
    /// Connect to a network and keep its lease renewed
    #[command(alias = "c")]
    Connect {
        essid: String,
        /// WPA2 passphrase, or the password for 802.1x networks
        passphrase: Option<String>,
        /// 802.1x identity
        identity: Option<String>,
        /// Return as soon as the first lease is bound
        #[arg(long)]
        no_renew: bool,
    },
    /// Acquire leases on every matching interface at once
    #[command(alias = "d")]
    Dhcp {
        /// Match the interface name literally
        #[arg(long)]
        exact: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
