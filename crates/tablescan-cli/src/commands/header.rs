//! Container header summary.

use std::path::Path;

use anyhow::Result;
use tablescan_core::Container;

use super::hex_utils::format_offset;
use super::load_rom;

/// Run the header command
pub fn run(path: &Path) -> Result<()> {
    let rom = load_rom(path)?;

    println!("File: {}", path.display());
    println!("Size: {} bytes ({})", rom.len(), format_offset(rom.len()));

    match rom.container() {
        Container::Ines(header) => {
            println!("Container: iNES");
            println!(
                "  PRG-ROM: {} x 16 KiB = {} bytes",
                header.prg_banks,
                header.prg_size()
            );
            println!(
                "  CHR-ROM: {} x 8 KiB = {} bytes",
                header.chr_banks,
                header.chr_size()
            );
            println!("  Mapper: {}", header.mapper);
            println!("  Mirroring: {}", header.mirroring);
            println!("  Battery: {}", if header.has_battery { "yes" } else { "no" });
            println!("  Trainer: {}", if header.has_trainer { "yes" } else { "no" });

            let expected = header.data_start() as usize + header.prg_size() + header.chr_size();
            if expected != rom.len() {
                println!(
                    "  Warning: header implies {} bytes, file has {}",
                    expected,
                    rom.len()
                );
            }
        }
        Container::SnesCopier => println!("Container: SNES with 512-byte copier header"),
        Container::Raw => println!("Container: none detected"),
    }

    let layout = rom.detect_layout();
    println!(
        "Bank layout: {:#X}-byte banks at ${:04X}-${:04X}, data starts at {}",
        layout.bank_size,
        layout.window_base,
        layout.window_end(),
        format_offset(layout.header_size as usize)
    );

    Ok(())
}
