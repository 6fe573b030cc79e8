//! Verify command: read destination-layout records back out of a built image.

use std::path::Path;

use anyhow::{Context, Result};
use tablescan_core::{ExportFormat, IndexedRecord, JsonExporter, TableLocator, TargetRecord};

use super::hex_utils::format_offset;
use super::load_rom;
use crate::config::TablescanConfig;

/// Run the verify command
pub fn run(
    config: &TablescanConfig,
    path: &Path,
    offset: usize,
    count: Option<usize>,
    json: bool,
) -> Result<()> {
    let image = load_rom(path)?;
    let rows = read_table(config, image.as_bytes(), offset, count)?;

    if json {
        print!("{}", JsonExporter.format_rows(&rows));
        return Ok(());
    }

    println!(
        "{} '{}' record(s) at {}",
        rows.len(),
        config.target_layout.name,
        format_offset(offset)
    );
    println!();
    for row in &rows {
        let m = TargetRecord::from_record(&row.record);
        println!(
            "${:02X} {}  HP={:>4} EXP={:>5} GOLD={:>5} ATK={:>3} DEF={:>3} AGI={:>3} DROP=${:02X}/${:02X}",
            row.index,
            format_offset(row.offset),
            m.hp,
            m.experience,
            m.gold,
            m.attack,
            m.defense,
            m.agility,
            m.item_drop_id,
            m.drop_rate_flags
        );
    }

    Ok(())
}

/// Plausible destination records from `offset`, at most `count` of them.
pub fn read_table(
    config: &TablescanConfig,
    image: &[u8],
    offset: usize,
    count: Option<usize>,
) -> Result<Vec<IndexedRecord>> {
    let options = config
        .locator
        .with_max_records(count.or(config.locator.max_records));
    let locator = TableLocator::new(
        image,
        &config.target_layout,
        &config.target_window,
        options,
    )?;
    let table = locator
        .confirm_table(offset)
        .with_context(|| format!("No destination records at {}", format_offset(offset)))?;
    Ok(table.decode_all(image, &config.target_layout)?)
}
