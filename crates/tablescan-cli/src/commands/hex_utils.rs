//! Hex offset/address parsing and formatting.

use anyhow::{Context, Result};

fn strip_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s)
}

/// Parse a hex file offset (`0x1A2B2`, `$1A2B2` or `1A2B2`).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_offset("0x1A2B2").unwrap(), 0x1A2B2);
/// assert_eq!(parse_offset("1A2B2").unwrap(), 0x1A2B2);
/// ```
pub fn parse_offset(s: &str) -> Result<usize> {
    usize::from_str_radix(strip_prefix(s), 16).with_context(|| format!("Invalid hex offset: {s}"))
}

/// Parse a 16-bit CPU address (`$A2A2`, `0xA2A2` or `A2A2`).
pub fn parse_hex_u16(s: &str) -> Result<u16> {
    u16::from_str_radix(strip_prefix(s), 16).with_context(|| format!("Invalid CPU address: {s}"))
}

/// Six-digit file offset, the width every ROM listing here uses.
pub fn format_offset(offset: usize) -> String {
    format!("0x{:06X}", offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset_with_prefix() {
        assert_eq!(parse_offset("0x1A2B2").unwrap(), 0x1A2B2);
        assert_eq!(parse_offset("0X1a2b2").unwrap(), 0x1A2B2);
        assert_eq!(parse_offset("$1A2B2").unwrap(), 0x1A2B2);
    }

    #[test]
    fn test_parse_offset_without_prefix() {
        assert_eq!(parse_offset("1A2B2").unwrap(), 0x1A2B2);
        assert_eq!(parse_offset("10").unwrap(), 0x10);
    }

    #[test]
    fn test_parse_offset_invalid() {
        assert!(parse_offset("GHIJK").is_err());
        assert!(parse_offset("0xZZZ").is_err());
        assert!(parse_offset("").is_err());
    }

    #[test]
    fn test_parse_hex_u16() {
        assert_eq!(parse_hex_u16("$A2A2").unwrap(), 0xA2A2);
        assert_eq!(parse_hex_u16("8000").unwrap(), 0x8000);
        assert!(parse_hex_u16("10000").is_err());
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0x1A2B2), "0x01A2B2");
        assert_eq!(format_offset(0), "0x000000");
    }
}
