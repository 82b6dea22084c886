mod commands;
mod terminal;

use commands::{CommandLine, Commands, connect, current, dhcp, interfaces, scan};
use airlink_common::config::Config;
use terminal::{logging, print};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();
    print::banner();

    if !is_root::is_root() {
        warn!("not running as root, most wireless tools will refuse to work");
    }

    let cfg = Config {
        interface: commands.interface,
        ..Config::default()
    };

    let result = match commands.command {
        Commands::Interfaces => {
            print::header("wireless interfaces");
            interfaces::interfaces(&cfg).await
        }
        Commands::Scan => {
            print::header("starting scanner");
            scan::scan(&cfg).await
        }
        Commands::Current => {
            print::header("current network");
            current::current(&cfg).await
        }
        Commands::Connect {
            essid,
            passphrase,
            identity,
            no_renew,
        } => {
            print::header("connecting");
            let secrets: Vec<&str> = passphrase.iter().chain(identity.iter()).map(String::as_str).collect();
            connect::connect(&essid, &secrets, no_renew, &cfg).await
        }
        Commands::Dhcp { exact } => {
            print::header("acquiring leases");
            dhcp::dhcp(exact, &cfg).await
        }
    };

    print::end_of_program();
    result
}
