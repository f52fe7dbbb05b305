//! Tests against a real CP210x.
//!
//! These need exactly one CP210x with factory default IDs attached, and permission
//! to open it. Run them with `cargo test -- --ignored --test-threads=1`. They only
//! reset the device and never write to its configuration memory.
use cp210x_config::{CP210x, ControlTransferChannel, Error};

#[test]
#[ignore = "needs a CP210x attached"]
fn reads_device_info() -> Result<(), Error> {
    let device = CP210x::connect()?;
    let info = device.usb_device_info()?;
    assert_eq!(info.vendor_id, 0x10C4);
    assert!(matches!(info.product_id, 0xEA60 | 0xEA70));
    Ok(())
}

#[test]
#[ignore = "needs a CP210x attached"]
fn reset_only() -> Result<(), Error> {
    let mut device = CP210x::connect()?;
    device.channel_mut().open()?;
    device.reset()?;
    device.channel_mut().close()
}
