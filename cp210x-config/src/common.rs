//! USB string descriptors.

use bit_field::BitField;

use crate::Error;
use crate::constants::{MAX_DESCRIPTOR_CHARS, STRING_DESCRIPTOR_TYPE};

/// Encode a string as a USB string descriptor.
///
/// The result is exactly `2 + 2 * len` bytes long: the total length, the string
/// descriptor type (`0x03`), then each character as little-endian UTF-16. Only ASCII
/// is supported, so every high byte is zero.
///
/// ```rust
/// # use cp210x_config::common::encode_descriptor_string;
/// # fn main() -> Result<(), cp210x_config::Error> {
/// let encoded = encode_descriptor_string("Hi")?;
/// assert_eq!(encoded, [6, 0x03, b'H', 0, b'i', 0]);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// [`Error::StringTooLong`] if the string is longer than 126 characters, and
/// [`Error::NonAscii`] if any character is outside the ASCII range. Length is
/// checked first.
pub fn encode_descriptor_string(s: &str) -> Result<Vec<u8>, Error> {
    let length = s.encode_utf16().count();
    if length > MAX_DESCRIPTOR_CHARS {
        return Err(Error::StringTooLong {
            length,
            max: MAX_DESCRIPTOR_CHARS,
        });
    }

    let mut out = Vec::with_capacity(2 + 2 * length);
    // Cannot overflow, length is at most 126.
    out.push((2 + 2 * length) as u8);
    out.push(STRING_DESCRIPTOR_TYPE);

    for (position, unit) in s.encode_utf16().enumerate() {
        if unit.get_bits(7..16) != 0 {
            return Err(Error::NonAscii { position });
        }
        out.extend_from_slice(&unit.to_le_bytes());
    }

    Ok(out)
}

/// ASCII string that fits in a USB string descriptor.
///
/// Product name and serial number strings written to the CP210x are limited to
/// 126 ASCII characters. Serial numbers are limited further, to 63 characters,
/// which is checked when the serial number is written.
///
/// Create a `DescriptorString` by calling [`str::parse`] on a string slice, or
/// [`DescriptorString::try_from`] with an owned `String`.
///
/// ```rust
/// # use cp210x_config::common::DescriptorString;
/// # fn main() -> Result<(), cp210x_config::Error> {
/// let name: DescriptorString = "Widget Programmer v2".parse()?;
///
/// let serial = String::from("WP2-000113");
/// let serial: DescriptorString = serial.try_into()?;
/// # Ok(())
/// # }
/// ```
///
/// ```rust
/// # use cp210x_config::common::DescriptorString;
/// let result: Result<DescriptorString, _> = "café".parse();
/// assert!(result.is_err(), "Only ASCII is supported.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorString(String);

impl TryFrom<String> for DescriptorString {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        encode_descriptor_string(&value)?;
        Ok(Self(value))
    }
}

impl std::str::FromStr for DescriptorString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl DescriptorString {
    /// The string as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DescriptorString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_layout() {
        let s = "CP2102N USB to UART Bridge Controller";
        let encoded = encode_descriptor_string(s).unwrap();
        assert_eq!(encoded.len(), 2 + 2 * s.len());
        assert_eq!(encoded[0] as usize, encoded.len());
        assert_eq!(encoded[1], 0x03);
        for (i, c) in s.bytes().enumerate() {
            assert_eq!(encoded[2 + 2 * i], c);
            assert_eq!(encoded[2 + 2 * i + 1], 0);
        }
    }

    #[test]
    fn empty_string() {
        assert_eq!(encode_descriptor_string("").unwrap(), [2, 0x03]);
    }

    #[test]
    fn longest_string_fills_length_byte() {
        let s = "x".repeat(126);
        let encoded = encode_descriptor_string(&s).unwrap();
        assert_eq!(encoded[0], 254);
        assert_eq!(encoded.len(), 254);
    }

    #[test]
    fn too_long() {
        let s = "x".repeat(127);
        let err = encode_descriptor_string(&s).unwrap_err();
        assert!(matches!(
            err,
            Error::StringTooLong {
                length: 127,
                max: 126
            }
        ));
        assert!(err.is_validation());
    }

    #[test]
    fn non_ascii_rejected() {
        let err = encode_descriptor_string("café").unwrap_err();
        assert!(matches!(err, Error::NonAscii { position: 3 }));
        // Code units above 0xFF are rejected too, not truncated.
        assert!(encode_descriptor_string("\u{0100}").is_err());
    }

    #[test]
    fn length_is_checked_before_ascii() {
        let s = format!("é{}", "x".repeat(126));
        assert!(matches!(
            encode_descriptor_string(&s),
            Err(Error::StringTooLong { length: 127, .. })
        ));
    }

    #[test]
    fn newtype_validates_like_free_function() {
        let s: DescriptorString = "Bridge".parse().unwrap();
        assert_eq!(s.as_str(), "Bridge");
        assert_eq!(s.to_string(), "Bridge");
        assert!(matches!(
            "x".repeat(127).parse::<DescriptorString>(),
            Err(Error::StringTooLong { .. })
        ));
        assert!(matches!(
            DescriptorString::try_from(String::from("naïve")),
            Err(Error::NonAscii { position: 2 })
        ));
    }
}
