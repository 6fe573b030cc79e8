//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod confirm;
pub mod export;
pub mod header;
pub mod hex_utils;
pub mod hexdump;
pub mod map;
pub mod scan;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use tablescan_core::{BankLayout, Console, Container, RomImage};
use tracing::debug;

/// Read a whole image into memory.
pub fn load_rom(path: &Path) -> Result<RomImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let rom = RomImage::from(bytes);
    debug!("Loaded {} ({} bytes, {:?})", path.display(), rom.len(), rom.container());
    Ok(rom)
}

/// Bank layout from the image header, or the configured console for raw images.
pub fn bank_layout(rom: &RomImage, console: Console) -> BankLayout {
    match rom.container() {
        Container::Raw => console.bank_layout(),
        _ => rom.detect_layout(),
    }
}
