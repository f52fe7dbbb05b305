use std::time::Duration;

use log::{debug, info, warn};
use rusb::{Context, Device, DeviceHandle, Direction, Recipient, RequestType, UsbContext};

use super::CP210x;
use crate::Error;
use crate::constants::{CP210X_PID, CP2105_PID, DEFAULT_TIMEOUT, SILABS_VID};
use crate::transfer::{ControlTransferChannel, TransferResult, TransferStatus};

/// Vendor and product ID pair used to pick out devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFilter {
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
}

impl DeviceFilter {
    /// Filter matching exactly this vendor and product ID.
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }

    /// True if the IDs match this filter.
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}

/// Filters for CP210x devices with factory default IDs.
pub const CP210X_FILTERS: [DeviceFilter; 2] = [
    DeviceFilter::new(SILABS_VID, CP210X_PID),
    DeviceFilter::new(SILABS_VID, CP2105_PID),
];

/// List the USB devices matching any of the filters.
///
/// # Errors
///
/// An error will be returned if the host's USB devices cannot be listed.
pub fn find_devices(
    context: &Context,
    filters: &[DeviceFilter],
) -> Result<Vec<Device<Context>>, Error> {
    let devices = context
        .devices()?
        .iter()
        .filter(|device| {
            let Ok(descriptor) = device.device_descriptor() else {
                return false;
            };
            let (vid, pid) = (descriptor.vendor_id(), descriptor.product_id());
            filters.iter().any(|filter| filter.matches(vid, pid))
        })
        .collect();
    Ok(devices)
}

/// Read information about every USB device matching any of the filters.
///
/// # Errors
///
/// An error will be returned if the host's USB devices cannot be listed.
pub fn list_devices(filters: &[DeviceFilter]) -> Result<Vec<UsbDeviceInfo>, Error> {
    let context = Context::new()?;
    find_devices(&context, filters)?
        .iter()
        .map(UsbDeviceInfo::read)
        .collect()
}

/// Pick the only device out of a list of matches.
fn select_one<T>(mut devices: Vec<T>) -> Result<T, Error> {
    match devices.len() {
        0 => Err(Error::DeviceNotFound),
        1 => Ok(devices.remove(0)),
        n => Err(Error::MultipleDevices(n)),
    }
}

/// Identifying information about a USB device, for listing.
#[derive(Debug, Clone)]
pub struct UsbDeviceInfo {
    /// Bus the device is attached to.
    pub bus: u8,
    /// Address of the device on its bus.
    pub address: u8,
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// Manufacturer string, if it could be read.
    pub manufacturer: Option<String>,
    /// Product string, if it could be read.
    pub product: Option<String>,
    /// Serial number string, if it could be read.
    pub serial_number: Option<String>,
}

impl UsbDeviceInfo {
    /// Read device information, briefly opening the device to read its strings.
    ///
    /// The strings are left empty if the device cannot be opened, which is common
    /// when the user lacks permission to access it.
    ///
    /// # Errors
    ///
    /// An error will be returned if the device descriptor cannot be read.
    pub fn read(device: &Device<Context>) -> Result<Self, Error> {
        let descriptor = device.device_descriptor()?;
        let mut info = Self {
            bus: device.bus_number(),
            address: device.address(),
            vendor_id: descriptor.vendor_id(),
            product_id: descriptor.product_id(),
            manufacturer: None,
            product: None,
            serial_number: None,
        };

        match device.open() {
            Ok(handle) => {
                info.manufacturer = handle.read_manufacturer_string_ascii(&descriptor).ok();
                info.product = handle.read_product_string_ascii(&descriptor).ok();
                info.serial_number = handle.read_serial_number_string_ascii(&descriptor).ok();
            }
            Err(e) => debug!(
                "Cannot open device {:03}:{:03} to read strings: {e}",
                info.bus, info.address
            ),
        }
        Ok(info)
    }
}

/// [`ControlTransferChannel`] over a `rusb` device.
///
/// The channel starts closed. [`CP210x::configure`] opens and closes it as needed,
/// while the single-setting methods expect it to have been opened already.
#[derive(Debug)]
pub struct UsbChannel {
    device: Device<Context>,
    handle: Option<DeviceHandle<Context>>,
    timeout: Duration,
}

impl UsbChannel {
    /// Wrap a device, without opening it.
    pub fn new(device: Device<Context>) -> Self {
        Self {
            device,
            handle: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Find the only device matching any of the filters.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceNotFound`] if no device matches, and [`Error::MultipleDevices`]
    /// if more than one does.
    pub fn find(filters: &[DeviceFilter]) -> Result<Self, Error> {
        let context = Context::new()?;
        let device = select_one(find_devices(&context, filters)?)?;
        Ok(Self::new(device))
    }

    /// Find the device matching the filters at the given bus and address.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceNotFound`] if there is no matching device at that location.
    pub fn find_at(filters: &[DeviceFilter], bus: u8, address: u8) -> Result<Self, Error> {
        let context = Context::new()?;
        let devices = find_devices(&context, filters)?
            .into_iter()
            .filter(|device| device.bus_number() == bus && device.address() == address)
            .collect();
        let device = select_one(devices)?;
        Ok(Self::new(device))
    }

    /// Change the timeout applied to each control transfer.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying `rusb` device.
    pub fn device(&self) -> &Device<Context> {
        &self.device
    }

    fn handle(&mut self) -> Result<&mut DeviceHandle<Context>, Error> {
        self.handle.as_mut().ok_or(Error::DeviceNotOpen)
    }
}

impl ControlTransferChannel for UsbChannel {
    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn open(&mut self) -> Result<(), Error> {
        if self.handle.is_none() {
            self.handle = Some(self.device.open()?);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        // libusb closes the handle when it is dropped.
        self.handle = None;
        Ok(())
    }

    fn control_out(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<TransferResult, Error> {
        let request_type =
            rusb::request_type(Direction::Out, RequestType::Vendor, Recipient::Device);
        let timeout = self.timeout;
        let handle = self.handle()?;
        let result = handle.write_control(request_type, request, value, index, data, timeout);
        transfer_result(result)
    }

    fn reset(&mut self) -> Result<(), Error> {
        let handle = self.handle()?;
        if reset_result(handle.reset())? {
            self.handle = None;
        }
        Ok(())
    }
}

/// Convert the outcome of a control transfer into a [`TransferResult`].
///
/// Errors the device reports on the bus become a status. Errors of the host's USB
/// stack are returned as [`Error::Usb`].
fn transfer_result(result: rusb::Result<usize>) -> Result<TransferResult, Error> {
    match result {
        Ok(written) => Ok(TransferResult::ok(written)),
        Err(rusb::Error::Pipe) => Ok(TransferResult {
            status: TransferStatus::Stall,
            bytes_written: 0,
        }),
        Err(rusb::Error::Overflow) => Ok(TransferResult {
            status: TransferStatus::Babble,
            bytes_written: 0,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Check the outcome of a device reset.
///
/// Returns true if the device re-enumerated with different descriptors, in which
/// case the handle is no longer valid and must be dropped.
fn reset_result(result: rusb::Result<()>) -> Result<bool, Error> {
    match result {
        Ok(()) => Ok(false),
        Err(rusb::Error::NotFound | rusb::Error::NoDevice) => {
            info!("Device re-enumerated after reset");
            Ok(true)
        }
        Err(e) => {
            warn!("Device reset failed: {e}");
            Err(e.into())
        }
    }
}

/// # USB device functionality
impl CP210x<UsbChannel> {
    /// Find the only CP210x attached with factory default vendor and product IDs.
    ///
    /// The default VID is 0x10C4, with PID 0xEA60 (most parts) or 0xEA70 (CP2105).
    /// The device is not opened; see [`UsbChannel`].
    ///
    /// # Errors
    ///
    /// An error will be returned if there is not exactly one matching device.
    pub fn connect() -> Result<Self, Error> {
        CP210x::connect_with_filters(&CP210X_FILTERS)
    }

    /// Find the only device matching any of the given filters.
    ///
    /// Use this constructor if you have changed the USB VID or PID of your CP210x.
    ///
    /// # Errors
    ///
    /// An error will be returned if there is not exactly one matching device.
    pub fn connect_with_filters(filters: &[DeviceFilter]) -> Result<Self, Error> {
        Ok(CP210x::new(UsbChannel::find(filters)?))
    }

    /// Get identifying information about the device.
    ///
    /// # Errors
    ///
    /// An error will be returned if the device descriptor cannot be read.
    pub fn usb_device_info(&self) -> Result<UsbDeviceInfo, Error> {
        UsbDeviceInfo::read(self.channel.device())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters() {
        assert!(CP210X_FILTERS.iter().any(|f| f.matches(0x10C4, 0xEA60)));
        assert!(CP210X_FILTERS.iter().any(|f| f.matches(0x10C4, 0xEA70)));
        assert!(!CP210X_FILTERS.iter().any(|f| f.matches(0x10C4, 0xEA61)));
        assert!(!CP210X_FILTERS.iter().any(|f| f.matches(0x1209, 0xEA60)));
    }

    #[test]
    fn select_one_requires_a_single_match() {
        assert!(matches!(
            select_one(Vec::<u8>::new()),
            Err(Error::DeviceNotFound)
        ));
        assert!(matches!(select_one(vec![7u8]), Ok(7)));
        assert!(matches!(
            select_one(vec![1u8, 2]),
            Err(Error::MultipleDevices(2))
        ));
    }

    #[test]
    fn device_errors_become_statuses() {
        assert_eq!(transfer_result(Ok(2)).unwrap(), TransferResult::ok(2));

        let stall = transfer_result(Err(rusb::Error::Pipe)).unwrap();
        assert_eq!(stall.status, TransferStatus::Stall);
        assert_eq!(stall.bytes_written, 0);

        let babble = transfer_result(Err(rusb::Error::Overflow)).unwrap();
        assert_eq!(babble.status, TransferStatus::Babble);
    }

    #[test]
    fn host_errors_are_returned() {
        assert!(matches!(
            transfer_result(Err(rusb::Error::Timeout)),
            Err(Error::Usb(rusb::Error::Timeout))
        ));
        assert!(matches!(
            transfer_result(Err(rusb::Error::Io)),
            Err(Error::Usb(rusb::Error::Io))
        ));
    }

    #[test]
    fn reset_after_re_enumeration() {
        assert!(!reset_result(Ok(())).unwrap());
        assert!(reset_result(Err(rusb::Error::NotFound)).unwrap());
        assert!(reset_result(Err(rusb::Error::NoDevice)).unwrap());
        assert!(matches!(
            reset_result(Err(rusb::Error::Io)),
            Err(Error::Usb(rusb::Error::Io))
        ));
    }
}
