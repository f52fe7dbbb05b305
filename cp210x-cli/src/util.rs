/// Parse a hexadecimal `u16`, with or without a `0x` prefix.
pub(crate) fn u16_from_hex(value: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(strip_hex_prefix(value).unwrap_or(value), 16)
}

/// Parse a `u8`, as hexadecimal if prefixed with `0x`, otherwise as decimal.
pub(crate) fn u8_from_str(value: &str) -> Result<u8, std::num::ParseIntError> {
    match strip_hex_prefix(value) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

/// Parse a `u16`, as hexadecimal if prefixed with `0x`, otherwise as decimal.
pub(crate) fn u16_from_str(value: &str) -> Result<u16, std::num::ParseIntError> {
    match strip_hex_prefix(value) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

fn strip_hex_prefix(value: &str) -> Option<&str> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
}
