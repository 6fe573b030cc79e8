//! Hexdump command implementation.
//!
//! Displays raw image bytes in traditional hexdump format, with absolute
//! file offsets so rows can be matched against table offsets.
//!
//! # Output Format
//!
//! ```text
//! 0x01A2B0: 00 00 64 00 32 00 20 00  0A 08 05 00 00 00 00 00  |..d.2. .........|
//! ```

use std::path::Path;

use anyhow::{Result, bail};

use super::hex_utils::format_offset;
use super::load_rom;

/// Run the hexdump command
pub fn run(path: &Path, offset: usize, size: usize, ascii: bool) -> Result<()> {
    let rom = load_rom(path)?;
    if offset >= rom.len() {
        bail!(
            "Offset {} is beyond the image ({} bytes)",
            format_offset(offset),
            rom.len()
        );
    }

    let end = offset.saturating_add(size).min(rom.len());
    let bytes = &rom.as_bytes()[offset..end];

    println!("Hexdump at {} ({} bytes):", format_offset(offset), bytes.len());
    println!();
    print!("{}", format_dump(bytes, offset, ascii));

    Ok(())
}

/// Render `bytes` as hexdump rows, labelling the first row `base`.
pub fn format_dump(bytes: &[u8], base: usize, ascii: bool) -> String {
    let mut out = String::new();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        out.push_str(&format!("{}: ", format_offset(base + i * 16)));

        // Hex bytes
        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                out.push(' ');
            }
            out.push_str(&format!("{:02X} ", byte));
        }

        // Padding for incomplete lines
        for j in chunk.len()..16 {
            if j == 8 {
                out.push(' ');
            }
            out.push_str("   ");
        }

        if ascii {
            out.push_str(" |");
            for &byte in chunk {
                out.push(if (0x20..0x7F).contains(&byte) { byte as char } else { '.' });
            }
            for _ in chunk.len()..16 {
                out.push(' ');
            }
            out.push('|');
        }

        // trailing space of the hex column is not significant
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_row() {
        let bytes: Vec<u8> = b"Hello World".iter().copied().chain([0u8; 5]).collect();
        let out = format_dump(&bytes, 0x1A2B0, true);
        assert_eq!(
            out,
            "0x01A2B0: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|\n"
        );
    }

    #[test]
    fn test_partial_row_is_padded() {
        let out = format_dump(&[0x41, 0x42], 0, true);
        let line = out.lines().next().unwrap();
        assert!(line.starts_with("0x000000: 41 42 "));
        assert!(line.ends_with("|AB              |"));
    }

    #[test]
    fn test_without_ascii() {
        let out = format_dump(&[0u8; 20], 0x10, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "0x000020: 00 00 00 00");
        assert!(!out.contains('|'));
    }
}
