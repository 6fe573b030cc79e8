//! Confirm command: validate the table at a known start offset.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tablescan_core::monster::field;
use tablescan_core::{
    BankLayout, ExportFormat, IndexedRecord, JsonExporter, MonsterRecord, RecordTable, RomImage,
    SearchRange, TableLocator, to_bank_address,
};
use tracing::{info, warn};

use super::hex_utils::format_offset;
use super::{bank_layout, load_rom};
use crate::config::TablescanConfig;

/// Run the confirm command
pub fn run(config: &TablescanConfig, path: &Path, fallback: bool, json: bool) -> Result<()> {
    let rom = load_rom(path)?;
    let layout = bank_layout(&rom, config.console);
    let table = locate_table(config, &rom, &layout, fallback)?;
    let rows = table.decode_all(rom.as_bytes(), &config.source_layout)?;

    if json {
        print!("{}", JsonExporter.format_rows(&rows));
        return Ok(());
    }

    println!(
        "Table at {} ({}): {} record(s) of {} bytes, ends at {}",
        format_offset(table.start_offset),
        to_bank_address(table.start_offset, &layout),
        table.count,
        table.stride,
        format_offset(table.end_offset())
    );
    println!();
    for row in &rows {
        println!("{}", format_row(row));
    }

    Ok(())
}

/// Confirm the configured table start, optionally searching around it when
/// the start does not hold a plausible record.
pub fn locate_table(
    config: &TablescanConfig,
    rom: &RomImage,
    layout: &BankLayout,
    fallback: bool,
) -> Result<RecordTable> {
    let expected = config
        .table
        .resolve(layout, rom.len())?
        .context("No table location configured; pass --offset or set [table] in the config")?;

    let confirm = TableLocator::new(
        rom.as_bytes(),
        &config.source_layout,
        &config.confirm_window,
        config.locator,
    )?;

    let err = match confirm.confirm_table(expected) {
        Ok(table) => {
            info!(
                "Confirmed {} record(s) at {}",
                table.count,
                format_offset(table.start_offset)
            );
            return Ok(table);
        }
        Err(err) => err,
    };

    if !fallback {
        return Err(err).with_context(|| format!("No table at {}", format_offset(expected)));
    }
    warn!("{}; searching nearby", err);

    let discover = TableLocator::new(
        rom.as_bytes(),
        &config.source_layout,
        &config.scan_window,
        config.locator,
    )?;
    let range = SearchRange::around(expected, config.table.search_distance);
    let report = discover.rank_candidates(range, None);

    for candidate in report.likely() {
        if let Ok(table) = confirm.confirm_table(candidate.offset) {
            info!(
                "Found {} record(s) at {} (expected {})",
                table.count,
                format_offset(table.start_offset),
                format_offset(expected)
            );
            return Ok(table);
        }
    }

    bail!(
        "No table within {:#X} bytes of {} ({} candidate(s) checked)",
        config.table.search_distance,
        format_offset(expected),
        report.candidates.len()
    )
}

fn format_row(row: &IndexedRecord) -> String {
    match MonsterRecord::from_record(&row.record) {
        Ok(m) => format!(
            "${:02X} {}  HP={:>4} ATK={:>3} DEF={:>3} AGI={:>3} EXP={:>5} GOLD={:>5} DROP=${:02X}{}",
            row.index,
            format_offset(row.offset),
            m.hp,
            m.attack,
            m.defense,
            m.agility,
            m.experience,
            m.gold,
            m.item_drop_id,
            if m.is_metal() { " metal" } else { "" }
        ),
        // custom source layout
        Err(_) => format!(
            "${:02X} {}  HP={}",
            row.index,
            format_offset(row.offset),
            row.record.int(field::HP).unwrap_or(0)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescan_core::monster::SOURCE_STRIDE;

    fn monster_bytes(hp: u16) -> Vec<u8> {
        let m = MonsterRecord {
            experience: 10,
            gold: 5,
            hp,
            attack: 12,
            defense: 6,
            agility: 4,
            ..Default::default()
        };
        m.encode()
    }

    /// 16-byte iNES header followed by `count` monsters at `start`.
    fn image(start: usize, count: usize) -> RomImage {
        let mut bytes = vec![0u8; 0x8010];
        bytes[..4].copy_from_slice(b"NES\x1A");
        bytes[4] = 2;
        for i in 0..count {
            let offset = start + i * SOURCE_STRIDE;
            bytes[offset..offset + SOURCE_STRIDE].copy_from_slice(&monster_bytes(20 + i as u16));
        }
        RomImage::from(bytes)
    }

    fn config_at(offset: usize) -> TablescanConfig {
        TablescanConfig::builder().file_offset(Some(offset)).build()
    }

    #[test]
    fn test_locate_at_configured_offset() {
        let rom = image(0x400, 8);
        let table = locate_table(&config_at(0x400), &rom, &BankLayout::NES, false).unwrap();
        assert_eq!(table.start_offset, 0x400);
        assert_eq!(table.count, 8);
    }

    #[test]
    fn test_wrong_offset_without_fallback_fails() {
        let rom = image(0x400, 8);
        assert!(locate_table(&config_at(0x300), &rom, &BankLayout::NES, false).is_err());
    }

    #[test]
    fn test_fallback_finds_nearby_table() {
        let rom = image(0x400, 8);
        let table = locate_table(&config_at(0x300), &rom, &BankLayout::NES, true).unwrap();
        assert_eq!(table.start_offset, 0x400);
        assert_eq!(table.count, 8);
    }

    #[test]
    fn test_format_row() {
        let rows = RecordTable {
            start_offset: 0x400,
            stride: SOURCE_STRIDE,
            count: 1,
        }
        .decode_all(image(0x400, 1).as_bytes(), &tablescan_core::monster::source_layout())
        .unwrap();
        let line = format_row(&rows[0]);
        assert!(line.starts_with("$00 0x000400  HP=  20"));
        assert!(!line.contains("metal"));
    }
}
