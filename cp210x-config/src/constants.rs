//! USB identifiers and protocol constants.

use std::time::Duration;

/// Silicon Labs USB vendor ID.
pub const SILABS_VID: u16 = 0x10C4;

/// Factory product ID of the CP2102, CP2102N, CP2104 and most other single-port parts.
pub const CP210X_PID: u16 = 0xEA60;

/// Factory product ID of the dual-port CP2105.
pub const CP2105_PID: u16 = 0xEA70;

/// Vendor request code used for every configuration item.
///
/// The item being written is selected by the `wValue` field of the setup packet,
/// see [`ConfigItem`](crate::commands::ConfigItem).
pub const CONFIG_REQUEST: u8 = 0xFF;

/// String descriptor type tag, written to byte 1 of every encoded string.
pub(crate) const STRING_DESCRIPTOR_TYPE: u8 = 0x03;

/// Maximum number of characters in a USB string descriptor.
///
/// The descriptor length byte is `2 + 2 * len`, which must fit in a `u8`.
pub const MAX_DESCRIPTOR_CHARS: usize = 126;

/// Largest descriptor length byte the firmware accepts for the serial number.
pub const MAX_SERIAL_DESCRIPTOR_LEN: u8 = 128;

/// Timeout applied by [`UsbChannel`](crate::UsbChannel) to each control transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
