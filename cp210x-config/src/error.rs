use crate::commands::ConfigItem;
use crate::transfer::TransferStatus;

/// Wrapper for problems when configuring the CP210x.
#[derive(Debug)]
pub enum Error {
    /// A numeric setting was outside the range the firmware accepts.
    ///
    /// This is only possible when encoding from an integer type wider than the
    /// setting itself, for example a flush value of 256.
    OutOfRange {
        /// Setting that was rejected.
        item: ConfigItem,
    },
    /// A string is too long to be written as a USB string descriptor.
    ///
    /// Descriptor strings are limited to 126 characters. The serial number is
    /// further limited to 63 characters by the device firmware.
    StringTooLong {
        /// Number of UTF-16 code units in the rejected string.
        length: usize,
        /// Maximum number of code units accepted.
        max: usize,
    },
    /// A string contained a character outside the ASCII range.
    ///
    /// Only ASCII descriptor strings are supported.
    NonAscii {
        /// Position (in UTF-16 code units) of the first offending character.
        position: usize,
    },
    /// The device did not accept a configuration write.
    TransferFailed {
        /// Setting being written when the transfer failed.
        item: ConfigItem,
        /// Status reported for the control transfer.
        status: TransferStatus,
        /// Number of payload bytes the transport reports as written.
        bytes_written: usize,
    },
    /// An operation that needs an open device was attempted on a closed one.
    ///
    /// Only [`CP210x::configure`] opens and closes the device itself.
    ///
    /// [`CP210x::configure`]: crate::CP210x::configure
    DeviceNotOpen,
    /// No USB device matched the vendor and product ID filters.
    DeviceNotFound,
    /// More than one USB device matched the filters.
    ///
    /// The enclosed `usize` is the number of matching devices.
    MultipleDevices(usize),
    /// An error occurred in the underlying USB library.
    Usb(rusb::Error),
}

impl Error {
    /// Whether the error was raised while validating a setting, before anything
    /// was sent to the device.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::OutOfRange { .. } | Error::StringTooLong { .. } | Error::NonAscii { .. }
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfRange { item: ConfigItem::Flush } => {
                write!(f, "Flush value must be unsigned 8 bit")
            }
            Error::OutOfRange { item } => write!(f, "{item} value must be unsigned 16 bit"),
            Error::StringTooLong { length, max } => write!(
                f,
                "Descriptor string is too long ({length} characters, at most {max} allowed)"
            ),
            Error::NonAscii { position } => write!(
                f,
                "Only ASCII descriptor strings supported (non-ASCII character at {position})"
            ),
            Error::TransferFailed {
                item,
                status,
                bytes_written,
            } => write!(
                f,
                "Failed to write {item} (status: {status}, bytes written: {bytes_written})"
            ),
            Error::DeviceNotOpen => write!(f, "USB device is not open"),
            Error::DeviceNotFound => write!(f, "No CP210x device found"),
            Error::MultipleDevices(n) => {
                write!(f, "{n} matching devices found, select one by bus and address")
            }
            Error::Usb(e) => write!(f, "USB error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Usb(e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<rusb::Error> for Error {
    fn from(value: rusb::Error) -> Self {
        Self::Usb(value)
    }
}
