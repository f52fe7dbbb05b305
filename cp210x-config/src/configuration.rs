//! Batched configuration changes.

use crate::Error;
use crate::commands::{self, EncodedRequest};

/// Changes to be written to the CP210x in a single session.
///
/// Every setting is optional, and settings that are not set are left untouched on
/// the device. An empty request is valid: [`CP210x::configure`] will still reset the
/// device.
///
/// [`CP210x::configure`]: crate::CP210x::configure
///
/// ```rust
/// # use cp210x_config::ConfigurationRequest;
/// let mut request = ConfigurationRequest::new();
/// request
///     .with_vendor_id(0x1209)
///     .with_product_id(0x0001)
///     .with_name("Widget Console")
///     .with_serial("WC-0042");
/// assert!(!request.is_empty());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigurationRequest {
    /// USB vendor ID.
    vendor_id: Option<u16>,
    /// USB product ID.
    product_id: Option<u16>,
    /// USB product string.
    name: Option<String>,
    /// USB serial number string.
    serial: Option<String>,
    /// Flush byte.
    flush: Option<u8>,
    /// Mode word.
    mode: Option<u16>,
}

impl ConfigurationRequest {
    /// Create an empty set of changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the USB vendor ID.
    pub fn with_vendor_id(&mut self, vid: u16) -> &mut Self {
        self.vendor_id = Some(vid);
        self
    }

    /// Change the USB product ID.
    pub fn with_product_id(&mut self, pid: u16) -> &mut Self {
        self.product_id = Some(pid);
        self
    }

    /// Change the USB product string.
    ///
    /// Must be at most 126 ASCII characters. This is checked when the request is
    /// encoded.
    pub fn with_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Change the USB serial number string.
    ///
    /// Must be at most 63 ASCII characters. This is checked when the request is
    /// encoded.
    pub fn with_serial(&mut self, serial: impl Into<String>) -> &mut Self {
        self.serial = Some(serial.into());
        self
    }

    /// Change the flush byte.
    pub fn with_flush(&mut self, flush: u8) -> &mut Self {
        self.flush = Some(flush);
        self
    }

    /// Change the mode word.
    pub fn with_mode(&mut self, mode: u16) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    /// True if no settings are to be changed.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Encode every requested change.
    ///
    /// Requests are returned in the order they are written to the device: vendor ID,
    /// product ID, name, serial number, flush, mode.
    ///
    /// # Errors
    ///
    /// The first setting that fails validation.
    pub fn encode(&self) -> Result<Vec<EncodedRequest>, Error> {
        let mut requests = Vec::with_capacity(6);
        if let Some(vid) = self.vendor_id {
            requests.push(commands::encode_vendor_id(vid)?);
        }
        if let Some(pid) = self.product_id {
            requests.push(commands::encode_product_id(pid)?);
        }
        if let Some(name) = &self.name {
            requests.push(commands::encode_name(name)?);
        }
        if let Some(serial) = &self.serial {
            requests.push(commands::encode_serial(serial)?);
        }
        if let Some(flush) = self.flush {
            requests.push(commands::encode_flush(flush)?);
        }
        if let Some(mode) = self.mode {
            requests.push(commands::encode_mode(mode)?);
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ConfigItem;

    #[test]
    fn empty_request_encodes_nothing() {
        let request = ConfigurationRequest::new();
        assert!(request.is_empty());
        assert!(request.encode().unwrap().is_empty());
    }

    #[test]
    fn fixed_order_regardless_of_builder_order() {
        let mut request = ConfigurationRequest::new();
        request
            .with_mode(0x0102)
            .with_flush(0x3C)
            .with_serial("S1")
            .with_name("N1")
            .with_product_id(0xEA60)
            .with_vendor_id(0x10C4);
        let items: Vec<_> = request
            .encode()
            .unwrap()
            .iter()
            .map(EncodedRequest::item)
            .collect();
        assert_eq!(
            items,
            [
                ConfigItem::VendorId,
                ConfigItem::ProductId,
                ConfigItem::Name,
                ConfigItem::Serial,
                ConfigItem::Flush,
                ConfigItem::Mode,
            ]
        );
    }

    #[test]
    fn invalid_serial_fails_whole_request() {
        let mut request = ConfigurationRequest::new();
        request.with_name("ok").with_serial("x".repeat(64));
        assert!(matches!(
            request.encode(),
            Err(Error::StringTooLong { max: 63, .. })
        ));
    }
}
