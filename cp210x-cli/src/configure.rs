use clap::Args;
use cp210x_config::common::DescriptorString;
use cp210x_config::{CP210x, ConfigurationRequest, ControlTransferChannel};

use crate::util;

/// Settings to write. At least one is required.
#[derive(Debug, Args)]
#[group(required = true, multiple = true)]
pub(crate) struct ConfigureArgs {
    /// New USB vendor ID in hexadecimal.
    #[arg(long, value_parser = util::u16_from_hex)]
    pub(crate) set_vid: Option<u16>,
    /// New USB product ID in hexadecimal.
    #[arg(long, value_parser = util::u16_from_hex)]
    pub(crate) set_pid: Option<u16>,
    /// New USB product string.
    ///
    /// At most 126 ASCII characters.
    #[arg(long)]
    pub(crate) name: Option<DescriptorString>,
    /// New USB serial number string.
    ///
    /// At most 63 ASCII characters.
    #[arg(long)]
    pub(crate) serial: Option<DescriptorString>,
    /// New flush byte, decimal or 0x-prefixed hexadecimal.
    #[arg(long, value_parser = util::u8_from_str)]
    pub(crate) flush: Option<u8>,
    /// New mode word, decimal or 0x-prefixed hexadecimal.
    #[arg(long, value_parser = util::u16_from_str)]
    pub(crate) mode: Option<u16>,
}

impl ConfigureArgs {
    pub(crate) fn to_request(&self) -> ConfigurationRequest {
        let mut request = ConfigurationRequest::new();
        if let Some(vid) = self.set_vid {
            request.with_vendor_id(vid);
        }
        if let Some(pid) = self.set_pid {
            request.with_product_id(pid);
        }
        if let Some(name) = &self.name {
            request.with_name(name.as_str());
        }
        if let Some(serial) = &self.serial {
            request.with_serial(serial.as_str());
        }
        if let Some(flush) = self.flush {
            request.with_flush(flush);
        }
        if let Some(mode) = self.mode {
            request.with_mode(mode);
        }
        request
    }
}

pub(crate) fn action<C: ControlTransferChannel>(
    device: &mut CP210x<C>,
    args: &ConfigureArgs,
) -> Result<(), cp210x_config::Error> {
    let request = args.to_request();
    device.configure(&request)?;
    println!("Device configured and reset.");
    Ok(())
}
