//! Encoding of configuration items into vendor control transfers.
//!
//! Every item is written with the same vendor request code
//! ([`CONFIG_REQUEST`](crate::constants::CONFIG_REQUEST)). The item itself is
//! selected by `wValue`, and its data travels either in `wIndex` (vendor and product
//! ID) or in the data stage (everything else).

use bit_field::BitField;

use crate::Error;
use crate::common::encode_descriptor_string;
use crate::constants::MAX_SERIAL_DESCRIPTOR_LEN;

/// Configuration item understood by the CP210x firmware.
///
/// The discriminant is the `wValue` of the control transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ConfigItem {
    /// USB vendor ID (VID).
    VendorId = 0x3701,
    /// USB product ID (PID).
    ProductId = 0x3702,
    /// USB product string descriptor.
    Name = 0x3703,
    /// USB serial number string descriptor.
    Serial = 0x3704,
    /// Buffer flush behaviour byte.
    Flush = 0x370D,
    /// Port mode word.
    Mode = 0x3711,
}

impl ConfigItem {
    /// The `wValue` that selects this item.
    pub fn value(self) -> u16 {
        self as u16
    }
}

impl std::fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfigItem::VendorId => "Vendor ID",
            ConfigItem::ProductId => "Product ID",
            ConfigItem::Name => "Product name",
            ConfigItem::Serial => "Serial number",
            ConfigItem::Flush => "Flush",
            ConfigItem::Mode => "Mode",
        };
        write!(f, "{name}")
    }
}

/// A configuration write ready to be sent to the device.
///
/// The payload is exactly as long as the data the firmware expects. Vendor and
/// product ID writes have no data stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    item: ConfigItem,
    index: u16,
    payload: Option<Vec<u8>>,
}

impl EncodedRequest {
    fn new(item: ConfigItem, index: u16, payload: Option<Vec<u8>>) -> Self {
        Self {
            item,
            index,
            payload,
        }
    }

    /// Item being written.
    pub fn item(&self) -> ConfigItem {
        self.item
    }

    /// `wValue` of the setup packet.
    pub fn value(&self) -> u16 {
        self.item.value()
    }

    /// `wIndex` of the setup packet.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Data stage bytes, empty if there is none.
    pub fn payload(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }
}

/// Encode a USB vendor ID write. The ID is sent in `wIndex`.
///
/// # Errors
///
/// [`Error::OutOfRange`] if the value does not fit in a `u16`.
pub fn encode_vendor_id<T: TryInto<u16>>(vid: T) -> Result<EncodedRequest, Error> {
    let vid = vid.try_into().map_err(|_| Error::OutOfRange {
        item: ConfigItem::VendorId,
    })?;
    Ok(EncodedRequest::new(ConfigItem::VendorId, vid, None))
}

/// Encode a USB product ID write. The ID is sent in `wIndex`.
///
/// # Errors
///
/// [`Error::OutOfRange`] if the value does not fit in a `u16`.
pub fn encode_product_id<T: TryInto<u16>>(pid: T) -> Result<EncodedRequest, Error> {
    let pid = pid.try_into().map_err(|_| Error::OutOfRange {
        item: ConfigItem::ProductId,
    })?;
    Ok(EncodedRequest::new(ConfigItem::ProductId, pid, None))
}

/// Encode a flush byte write.
///
/// ```rust
/// # use cp210x_config::commands::encode_flush;
/// assert_eq!(encode_flush(0xFF).unwrap().payload(), [0xFF]);
/// assert!(encode_flush(256).is_err());
/// ```
///
/// # Errors
///
/// [`Error::OutOfRange`] if the value is outside `0..=255`.
pub fn encode_flush<T: TryInto<u8>>(flush: T) -> Result<EncodedRequest, Error> {
    let flush = flush.try_into().map_err(|_| Error::OutOfRange {
        item: ConfigItem::Flush,
    })?;
    Ok(EncodedRequest::new(ConfigItem::Flush, 0, Some(vec![flush])))
}

/// Encode a mode word write. The word is sent big-endian.
///
/// ```rust
/// # use cp210x_config::commands::encode_mode;
/// assert_eq!(encode_mode(0x1234).unwrap().payload(), [0x12, 0x34]);
/// ```
///
/// # Errors
///
/// [`Error::OutOfRange`] if the value is outside `0..=65535`.
pub fn encode_mode<T: TryInto<u16>>(mode: T) -> Result<EncodedRequest, Error> {
    let mode: u16 = mode.try_into().map_err(|_| Error::OutOfRange {
        item: ConfigItem::Mode,
    })?;
    let high = mode.get_bits(8..16) as u8;
    let low = mode.get_bits(0..8) as u8;
    Ok(EncodedRequest::new(ConfigItem::Mode, 0, Some(vec![high, low])))
}

/// Encode a USB product string write.
///
/// # Errors
///
/// See [`encode_descriptor_string`].
pub fn encode_name(name: &str) -> Result<EncodedRequest, Error> {
    let descriptor = encode_descriptor_string(name)?;
    Ok(EncodedRequest::new(ConfigItem::Name, 0, Some(descriptor)))
}

/// Encode a USB serial number string write.
///
/// The firmware accepts serial number descriptors of at most 128 bytes, so the
/// serial number can be at most 63 characters.
///
/// # Errors
///
/// See [`encode_descriptor_string`]. Additionally [`Error::StringTooLong`] if the
/// serial number is longer than 63 characters.
pub fn encode_serial(serial: &str) -> Result<EncodedRequest, Error> {
    let descriptor = encode_descriptor_string(serial)?;
    if descriptor[0] > MAX_SERIAL_DESCRIPTOR_LEN {
        return Err(Error::StringTooLong {
            length: (descriptor.len() - 2) / 2,
            max: (MAX_SERIAL_DESCRIPTOR_LEN as usize - 2) / 2,
        });
    }
    Ok(EncodedRequest::new(ConfigItem::Serial, 0, Some(descriptor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_values() {
        assert_eq!(ConfigItem::VendorId.value(), 0x3701);
        assert_eq!(ConfigItem::ProductId.value(), 0x3702);
        assert_eq!(ConfigItem::Name.value(), 0x3703);
        assert_eq!(ConfigItem::Serial.value(), 0x3704);
        assert_eq!(ConfigItem::Flush.value(), 0x370D);
        assert_eq!(ConfigItem::Mode.value(), 0x3711);
    }

    #[test]
    fn ids_travel_in_index() {
        let vid = encode_vendor_id(0x1209u16).unwrap();
        assert_eq!(vid.item(), ConfigItem::VendorId);
        assert_eq!(vid.index(), 0x1209);
        assert!(vid.payload().is_empty());

        let pid = encode_product_id(0xFFFFu16).unwrap();
        assert_eq!(pid.value(), 0x3702);
        assert_eq!(pid.index(), 0xFFFF);
        assert!(pid.payload().is_empty());
    }

    #[test]
    fn ids_out_of_range() {
        assert!(matches!(
            encode_vendor_id(0x10000u32),
            Err(Error::OutOfRange {
                item: ConfigItem::VendorId
            })
        ));
        assert!(matches!(
            encode_product_id(-1i32),
            Err(Error::OutOfRange {
                item: ConfigItem::ProductId
            })
        ));
    }

    #[test]
    fn mode_is_big_endian() {
        assert_eq!(encode_mode(0x1234).unwrap().payload(), [0x12, 0x34]);
        assert_eq!(encode_mode(0).unwrap().payload(), [0x00, 0x00]);
        assert_eq!(encode_mode(0xFFFF).unwrap().payload(), [0xFF, 0xFF]);
        let mode = encode_mode(1u16).unwrap();
        assert_eq!(mode.index(), 0);
        assert_eq!(mode.value(), 0x3711);
    }

    #[test]
    fn mode_out_of_range() {
        assert!(encode_mode(0x10000).unwrap_err().is_validation());
        assert!(encode_mode(-1).unwrap_err().is_validation());
    }

    #[test]
    fn flush_byte() {
        let flush = encode_flush(255).unwrap();
        assert_eq!(flush.payload(), [0xFF]);
        assert_eq!(flush.index(), 0);
        assert_eq!(flush.item(), ConfigItem::Flush);
        assert!(matches!(
            encode_flush(256),
            Err(Error::OutOfRange {
                item: ConfigItem::Flush
            })
        ));
        assert!(encode_flush(-1).is_err());
    }

    #[test]
    fn name_payload_is_descriptor() {
        let name = encode_name("UART").unwrap();
        assert_eq!(name.item(), ConfigItem::Name);
        assert_eq!(name.index(), 0);
        assert_eq!(
            name.payload(),
            [10, 0x03, b'U', 0, b'A', 0, b'R', 0, b'T', 0]
        );
    }

    #[test]
    fn serial_ceiling() {
        let ok = "9".repeat(63);
        let serial = encode_serial(&ok).unwrap();
        assert_eq!(serial.payload()[0], 128);
        assert_eq!(serial.payload().len(), 128);

        let long = "9".repeat(64);
        assert!(matches!(
            encode_serial(&long),
            Err(Error::StringTooLong {
                length: 64,
                max: 63
            })
        ));
        // The same string is fine as a product name.
        assert!(encode_name(&long).is_ok());
    }

    #[test]
    fn serial_uses_descriptor_limits_first() {
        let s = "9".repeat(127);
        assert!(matches!(
            encode_serial(&s),
            Err(Error::StringTooLong { max: 126, .. })
        ));
    }
}
