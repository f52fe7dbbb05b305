use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cp210x_config::constants::{CP210X_PID, CP2105_PID};
use cp210x_config::{CP210x, ControlTransferChannel, DeviceFilter, UsbChannel};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use cli::{Cli, Commands};

mod cli;
mod configure;
mod usb;
mod util;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .init()
        .context("Failed to initialise logging")?;

    let filters = filters(&cli);
    let timeout = Duration::from_millis(cli.timeout);
    match cli.command {
        Commands::List => usb::list(&filters).context("Failed to list USB devices")?,
        Commands::Configure(args) => {
            let mut device = connect(&filters, cli.bus, cli.address, timeout)?;
            configure::action(&mut device, &args).context("Failed to configure device")?
        }
        Commands::Reset => {
            let mut device = connect(&filters, cli.bus, cli.address, timeout)?;
            device.channel_mut().open().context("Failed to open device")?;
            device.reset().context("Failed to reset device")?;
            device.channel_mut().close()?;
        }
    }
    Ok(())
}

/// Find the device to operate on, without opening it.
fn connect(
    filters: &[DeviceFilter],
    bus: Option<u8>,
    address: Option<u8>,
    timeout: Duration,
) -> anyhow::Result<CP210x<UsbChannel>> {
    let channel = match (bus, address) {
        (Some(bus), Some(address)) => UsbChannel::find_at(filters, bus, address),
        _ => UsbChannel::find(filters),
    }
    .context("Failed to find device")?;
    Ok(CP210x::new(channel.with_timeout(timeout)))
}

/// Device filters from the --vid and --pid options.
///
/// Without --pid, both factory product IDs are matched.
fn filters(cli: &Cli) -> Vec<DeviceFilter> {
    match cli.pid {
        Some(pid) => vec![DeviceFilter::new(cli.vid, pid)],
        None => vec![
            DeviceFilter::new(cli.vid, CP210X_PID),
            DeviceFilter::new(cli.vid, CP2105_PID),
        ],
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod test {
    use crate::cli::{Cli, Commands};

    use clap::{CommandFactory, Parser};
    use log::LevelFilter;

    #[test]
    fn check_cli_debug_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_filters_match_factory_ids() {
        let cli = Cli::parse_from(["cp210x", "list"]);
        let filters = super::filters(&cli);
        assert_eq!(filters.len(), 2);
        assert!(filters.iter().any(|f| f.matches(0x10C4, 0xEA60)));
        assert!(filters.iter().any(|f| f.matches(0x10C4, 0xEA70)));
    }

    #[test]
    fn explicit_ids() {
        let cli = Cli::parse_from(["cp210x", "--vid", "1209", "--pid", "0x0001", "reset"]);
        let filters = super::filters(&cli);
        assert_eq!(filters.len(), 1);
        assert!(filters[0].matches(0x1209, 0x0001));
        assert!(matches!(cli.command, Commands::Reset));
    }

    #[test]
    fn configure_builds_request() {
        let cli = Cli::parse_from([
            "cp210x",
            "configure",
            "--set-vid",
            "0x1209",
            "--name",
            "Bench Supply",
            "--flush",
            "0x0F",
            "--mode",
            "258",
        ]);
        let Commands::Configure(args) = cli.command else {
            panic!("Expected configure command.");
        };
        let mut expected = cp210x_config::ConfigurationRequest::new();
        expected
            .with_vendor_id(0x1209)
            .with_name("Bench Supply")
            .with_flush(0x0F)
            .with_mode(0x0102);
        assert_eq!(args.to_request(), expected);
    }

    #[test]
    fn configure_rejects_bad_values() {
        fn with(extra: &[&str]) -> Result<Cli, clap::Error> {
            Cli::try_parse_from(["cp210x", "configure"].iter().chain(extra))
        }
        assert!(with(&[]).is_err(), "At least one setting is required.");
        assert!(with(&["--name", "café"]).is_err());
        assert!(with(&["--flush", "256"]).is_err());
        assert!(with(&["--mode", "0x10000"]).is_err());
        assert!(with(&["--serial", "0123456789"]).is_ok());
    }

    #[test]
    fn short_verbose_flag() {
        let cli = Cli::parse_from(["cp210x", "-v", "list"]);
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Commands::List));
        let cli = Cli::parse_from(["cp210x", "list", "-vvv"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn verbosity_steps_through_info() {
        assert_eq!(super::log_level(0), LevelFilter::Warn);
        assert_eq!(super::log_level(1), LevelFilter::Info);
        assert_eq!(super::log_level(2), LevelFilter::Debug);
        assert_eq!(super::log_level(3), LevelFilter::Trace);
        assert_eq!(super::log_level(9), LevelFilter::Trace);
    }

    #[test]
    fn transfer_timeout() {
        assert_eq!(Cli::parse_from(["cp210x", "reset"]).timeout, 1000);
        let cli = Cli::parse_from(["cp210x", "--timeout", "250", "reset"]);
        assert_eq!(cli.timeout, 250);
        assert!(Cli::try_parse_from(["cp210x", "--timeout", "-1", "reset"]).is_err());
    }

    #[test]
    fn bus_requires_address() {
        assert!(Cli::try_parse_from(["cp210x", "--bus", "1", "reset"]).is_err());
        assert!(Cli::try_parse_from(["cp210x", "--bus", "1", "--address", "4", "reset"]).is_ok());
    }
}
