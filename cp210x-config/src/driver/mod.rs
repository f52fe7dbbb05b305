use log::{debug, info, warn};

use crate::commands::{self, EncodedRequest};
use crate::configuration::ConfigurationRequest;
use crate::constants::CONFIG_REQUEST;
use crate::error::Error;
use crate::transfer::{ControlTransferChannel, TransferResult};

use session::OpenSession;

mod session;
mod usb;

pub use usb::{
    CP210X_FILTERS, DeviceFilter, UsbChannel, UsbDeviceInfo, find_devices, list_devices,
};

/// Driver for configuring a CP210x.
///
/// # Quick start
///
/// Connect to the only CP210x plugged in with [`CP210x::connect`], describe the
/// changes with a [`ConfigurationRequest`] and apply them with
/// [`CP210x::configure`], which writes each setting and then resets the device so
/// it re-enumerates with its new identity.
///
/// ```rust,no_run
/// # use cp210x_config::{CP210x, ConfigurationRequest};
/// # fn main() -> Result<(), cp210x_config::Error> {
/// let mut device = CP210x::connect()?;
/// let mut request = ConfigurationRequest::new();
/// request.with_name("Weather Station").with_serial("WS-17");
/// device.configure(&request)?;
/// # Ok(())
/// # }
/// ```
///
/// The driver is generic over the [`ControlTransferChannel`] that carries the
/// transfers. [`CP210x::connect`] uses [`UsbChannel`], backed by `rusb`.
///
/// Settings are stored in the CP210x's one-time or multiple-time programmable
/// memory, so be careful when experimenting. Changing the vendor or product ID
/// means the device will no longer be found with the default filters.
#[derive(Debug)]
pub struct CP210x<C> {
    /// Transport used to reach the device.
    channel: C,
}

impl<C: ControlTransferChannel> CP210x<C> {
    /// Create a driver around an existing channel.
    ///
    /// The channel may be open or closed.
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Shared reference to the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Mutable reference to the underlying channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Consume the driver, returning the underlying channel.
    pub fn into_inner(self) -> C {
        self.channel
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Batched configuration
    ////////////////////////////////////////////////////////////////////////////////

    /// Apply a set of changes and reset the device.
    ///
    /// All settings are validated before anything is sent. If the channel is closed
    /// it is opened for the duration of the call and closed again afterwards,
    /// whether or not the configuration succeeded. A channel that was already open
    /// is left open.
    ///
    /// Settings are written one at a time in a fixed order (vendor ID, product ID,
    /// name, serial number, flush, mode), followed by a device reset. The reset is
    /// issued even if the request is empty.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before the device is opened. Otherwise the
    /// first failed transfer aborts the session and later settings are not written.
    /// Settings written before the failure are not rolled back.
    pub fn configure(&mut self, request: &ConfigurationRequest) -> Result<(), Error> {
        let requests = request.encode()?;

        let mut session = OpenSession::begin(&mut self.channel)?;
        for request in &requests {
            write_config(&mut *session, request)?;
        }

        info!("Resetting device");
        session.reset()?;
        session.finish()
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Single settings
    //
    // These do not open or close the channel.
    ////////////////////////////////////////////////////////////////////////////////

    /// Change the USB vendor ID.
    ///
    /// The device must be reset for the change to take effect.
    pub fn set_vid(&mut self, vid: u16) -> Result<TransferResult, Error> {
        write_config(&mut self.channel, &commands::encode_vendor_id(vid)?)
    }

    /// Change the USB product ID.
    ///
    /// The device must be reset for the change to take effect.
    pub fn set_pid(&mut self, pid: u16) -> Result<TransferResult, Error> {
        write_config(&mut self.channel, &commands::encode_product_id(pid)?)
    }

    /// Change the USB product string.
    ///
    /// At most 126 ASCII characters. The device must be reset for the change to take
    /// effect.
    pub fn set_name(&mut self, name: &str) -> Result<TransferResult, Error> {
        write_config(&mut self.channel, &commands::encode_name(name)?)
    }

    /// Change the USB serial number string.
    ///
    /// At most 63 ASCII characters. The device must be reset for the change to take
    /// effect.
    pub fn set_serial(&mut self, serial: &str) -> Result<TransferResult, Error> {
        write_config(&mut self.channel, &commands::encode_serial(serial)?)
    }

    /// Change the flush byte.
    pub fn set_flush(&mut self, flush: u8) -> Result<TransferResult, Error> {
        write_config(&mut self.channel, &commands::encode_flush(flush)?)
    }

    /// Change the mode word.
    pub fn set_mode(&mut self, mode: u16) -> Result<TransferResult, Error> {
        write_config(&mut self.channel, &commands::encode_mode(mode)?)
    }

    /// Reset the device.
    ///
    /// The CP210x re-enumerates after a reset, picking up any changed settings.
    pub fn reset(&mut self) -> Result<(), Error> {
        if !self.channel.is_open() {
            return Err(Error::DeviceNotOpen);
        }
        info!("Resetting device");
        self.channel.reset()
    }
}

/// Send one encoded configuration write to the device.
///
/// Any status other than `Ok` is an error.
fn write_config<C>(channel: &mut C, request: &EncodedRequest) -> Result<TransferResult, Error>
where
    C: ControlTransferChannel + ?Sized,
{
    if !channel.is_open() {
        return Err(Error::DeviceNotOpen);
    }

    debug!(
        "Writing {} (value: {:#06X}, index: {:#06X}, data: {:02X?})",
        request.item(),
        request.value(),
        request.index(),
        request.payload()
    );
    let result = channel.control_out(
        CONFIG_REQUEST,
        request.value(),
        request.index(),
        request.payload(),
    )?;

    if !result.is_ok() {
        return Err(Error::TransferFailed {
            item: request.item(),
            status: result.status,
            bytes_written: result.bytes_written,
        });
    }
    if result.bytes_written != request.payload().len() {
        warn!(
            "Short write of {}: {} of {} bytes",
            request.item(),
            result.bytes_written,
            request.payload().len()
        );
    }
    Ok(result)
}
