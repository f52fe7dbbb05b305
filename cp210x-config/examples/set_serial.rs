//! # Serial numbering example
//!
//! Gives the only attached CP210x the serial number passed as the first argument,
//! for example when labelling a batch of adapters so they can be told apart by
//! their `/dev/serial/by-id` links.
//!
//! The serial number is checked before the device is touched: it must be ASCII
//! and at most 63 characters. The device is reset afterwards and re-enumerates
//! with the new serial number.
use cp210x_config::{CP210x, ConfigurationRequest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(serial) = std::env::args().nth(1) else {
        eprintln!("Usage: set_serial <SERIAL>");
        std::process::exit(2);
    };

    let mut device = CP210x::connect()?;
    let info = device.usb_device_info()?;
    println!(
        "Found {:04x}:{:04x} on bus {:03} address {:03}, serial was {}",
        info.vendor_id,
        info.product_id,
        info.bus,
        info.address,
        info.serial_number.as_deref().unwrap_or("unknown"),
    );

    let mut request = ConfigurationRequest::new();
    request.with_serial(serial.as_str());
    device.configure(&request)?;
    println!("Serial number set to {serial}.");

    Ok(())
}
