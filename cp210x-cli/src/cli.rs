use crate::configure::ConfigureArgs;
use crate::util;

use clap::Parser;

/// CLI for configuring Silicon Labs CP210x USB to UART bridges
///
/// Changes the USB vendor ID, product ID, product string and serial number
/// string of a CP210x, along with its flush and mode settings, then resets it
/// so it re-enumerates with the new settings.
///
/// By default the CLI looks for a device with the factory IDs (VID 0x10C4,
/// PID 0xEA60 or 0xEA70). If more than one is attached, pick one with --bus
/// and --address (see the list command).
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Device vendor ID in hexadecimal
    #[arg(long = "vid", default_value = "0x10C4", value_parser = util::u16_from_hex)]
    pub(crate) vid: u16,
    /// Device product ID in hexadecimal [default: 0xEA60 or 0xEA70]
    #[arg(short, long = "pid", value_parser = util::u16_from_hex)]
    pub(crate) pid: Option<u16>,
    /// Bus number of the device to use
    #[arg(long, requires = "address")]
    pub(crate) bus: Option<u8>,
    /// Address of the device to use on its bus
    #[arg(long, requires = "bus")]
    pub(crate) address: Option<u8>,
    /// Timeout for each control transfer, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub(crate) timeout: u64,
    /// Log more detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// List attached devices matching the vendor and product ID.
    List,
    /// Write settings to the device, then reset it.
    Configure(ConfigureArgs),
    /// Reset the device.
    Reset,
}
