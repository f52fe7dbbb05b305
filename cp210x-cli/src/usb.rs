use cp210x_config::{DeviceFilter, UsbDeviceInfo};

pub(crate) fn list(filters: &[DeviceFilter]) -> Result<(), cp210x_config::Error> {
    let devices = cp210x_config::list_devices(filters)?;
    if devices.is_empty() {
        println!("No matching devices found.");
    }
    for info in &devices {
        print_info(info);
    }
    Ok(())
}

fn print_info(info: &UsbDeviceInfo) {
    println!(
        "Bus {:03} Address {:03}: ID {:04x}:{:04x} {} {} (serial: {})",
        info.bus,
        info.address,
        info.vendor_id,
        info.product_id,
        info.manufacturer.as_deref().unwrap_or("?"),
        info.product.as_deref().unwrap_or("?"),
        info.serial_number.as_deref().unwrap_or("?"),
    );
}
