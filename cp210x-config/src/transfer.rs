//! The USB transport used to reach the CP210x.

use crate::Error;

/// Outcome of a control transfer as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// The transfer completed.
    Ok,
    /// The device stalled the control pipe, rejecting the request.
    Stall,
    /// The device sent more data than expected.
    Babble,
    /// Any other failure reported by the transport.
    Other,
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransferStatus::Ok => "ok",
            TransferStatus::Stall => "stall",
            TransferStatus::Babble => "babble",
            TransferStatus::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// Result of a host-to-device control transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResult {
    /// Transfer status.
    pub status: TransferStatus,
    /// Number of data stage bytes written.
    pub bytes_written: usize,
}

impl TransferResult {
    /// A completed transfer of `bytes_written` bytes.
    pub fn ok(bytes_written: usize) -> Self {
        Self {
            status: TransferStatus::Ok,
            bytes_written,
        }
    }

    /// True if the status is [`TransferStatus::Ok`].
    pub fn is_ok(&self) -> bool {
        self.status == TransferStatus::Ok
    }
}

/// A handle to a USB device that can issue vendor control transfers.
///
/// [`UsbChannel`](crate::UsbChannel) implements this over `rusb`. Implement it
/// yourself to drive the CP210x through another USB stack.
///
/// Transfers are issued one at a time and each call blocks until the transfer has
/// completed. Timeouts and retries, if any, belong to the implementation.
pub trait ControlTransferChannel {
    /// Whether the device is currently open.
    fn is_open(&self) -> bool;

    /// Open the device.
    fn open(&mut self) -> Result<(), Error>;

    /// Close the device.
    fn close(&mut self) -> Result<(), Error>;

    /// Issue a vendor request to the device, host-to-device.
    ///
    /// A transfer the device rejects should be reported through
    /// [`TransferResult::status`] rather than as an `Err`. Errors are for failures
    /// of the transport itself.
    fn control_out(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<TransferResult, Error>;

    /// Reset the device, causing it to re-enumerate.
    fn reset(&mut self) -> Result<(), Error>;
}

impl<C: ControlTransferChannel + ?Sized> ControlTransferChannel for &mut C {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn open(&mut self) -> Result<(), Error> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }

    fn control_out(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<TransferResult, Error> {
        (**self).control_out(request, value, index, data)
    }

    fn reset(&mut self) -> Result<(), Error> {
        (**self).reset()
    }
}
