//! Export command: confirm the source table, remap each record and write
//! the destination table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tablescan_core::{
    ExportFormat, ExportKind, IndexedRecord, JsonExporter, PasmExporter, RecordTable, encode,
};
use tracing::info;

use super::confirm::locate_table;
use super::hex_utils::format_offset;
use super::{bank_layout, load_rom};
use crate::config::TablescanConfig;

/// Run the export command
pub fn run(
    config: &TablescanConfig,
    path: &Path,
    fallback: bool,
    format: ExportKind,
    output: Option<PathBuf>,
) -> Result<()> {
    let rom = load_rom(path)?;
    let layout = bank_layout(&rom, config.console);
    let table = locate_table(config, &rom, &layout, fallback)?;
    let rows = remap_table(config, rom.as_bytes(), &table)?;

    let contents = render(config, &table, &rows, format);
    let output = output.unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("monsters.{}", format.extension()))
    });
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(&output, contents).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Wrote {} record(s) ({} bytes each) to {}",
        rows.len(),
        config.target_layout.stride,
        output.display()
    );
    Ok(())
}

/// Decode every source record and remap it into the destination layout.
/// Offsets stay those of the source records.
pub fn remap_table(
    config: &TablescanConfig,
    rom: &[u8],
    table: &RecordTable,
) -> Result<Vec<IndexedRecord>> {
    let source = table.decode_all(rom, &config.source_layout)?;
    Ok(source
        .into_iter()
        .map(|row| IndexedRecord {
            record: config.mapping.apply(&row.record),
            ..row
        })
        .collect())
}

fn render(
    config: &TablescanConfig,
    table: &RecordTable,
    rows: &[IndexedRecord],
    format: ExportKind,
) -> Vec<u8> {
    match format {
        ExportKind::Pasm => PasmExporter::monsters(config.target_layout.clone())
            .with_banner_line(format!(
                "source {} @ {}, mapping v{}",
                config.source_layout.name,
                format_offset(table.start_offset),
                config.mapping.version
            ))
            .format_rows(rows)
            .into_bytes(),
        ExportKind::Json => JsonExporter.format_rows(rows).into_bytes(),
        ExportKind::Bin => encode_table(config, rows),
    }
}

/// Destination bytes for the whole table, concatenated.
pub fn encode_table(config: &TablescanConfig, rows: &[IndexedRecord]) -> Vec<u8> {
    rows.iter()
        .flat_map(|row| encode(&row.record, &config.target_layout))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescan_core::monster::{SOURCE_STRIDE, TARGET_STRIDE};
    use tablescan_core::MonsterRecord;

    fn rom_with(monsters: &[MonsterRecord]) -> Vec<u8> {
        let mut bytes = vec![0u8; 0x40];
        for m in monsters {
            bytes.extend(m.encode());
        }
        bytes.extend([0u8; 0x40]);
        bytes
    }

    fn slime() -> MonsterRecord {
        MonsterRecord {
            experience: 100,
            gold: 50,
            hp: 32,
            attack: 10,
            defense: 8,
            agility: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_remap_table_worked_example() {
        let config = TablescanConfig::default();
        let rom = rom_with(&[slime(), slime()]);
        let table = RecordTable {
            start_offset: 0x40,
            stride: SOURCE_STRIDE,
            count: 2,
        };
        let rows = remap_table(&config, &rom, &table).unwrap();
        assert_eq!(rows[1].offset, 0x40 + SOURCE_STRIDE);

        let bytes = encode_table(&config, &rows);
        assert_eq!(bytes.len(), 2 * TARGET_STRIDE);
        assert_eq!(
            &bytes[..9],
            &[0x20, 0x00, 0x64, 0x00, 0x32, 0x00, 0x0A, 0x08, 0x05]
        );
        assert!(bytes[9..TARGET_STRIDE].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_export_writes_pasm() {
        let dir = tempfile::tempdir().unwrap();
        let rom_path = dir.path().join("dw4.nes");
        fs::write(&rom_path, rom_with(&[slime(), slime(), slime()])).unwrap();
        let out = dir.path().join("nested").join("monsters.pasm");

        let config = TablescanConfig::builder().file_offset(Some(0x40)).build();
        run(&config, &rom_path, false, ExportKind::Pasm, Some(out.clone())).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("MONSTER_COUNT = $003"));
        assert!(text.contains("monster_02:"));
        assert!(text.contains("; source dw4-monster @ 0x000040, mapping v1"));
        assert!(text.trim_end().ends_with("MONSTER_TABLE_END:"));
    }

    #[test]
    fn test_export_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let rom_path = dir.path().join("dw4.nes");
        fs::write(&rom_path, rom_with(&[slime()])).unwrap();
        let out = dir.path().join("monsters.json");

        let config = TablescanConfig::builder().file_offset(Some(0x40)).build();
        run(&config, &rom_path, false, ExportKind::Json, Some(out.clone())).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed[0]["offset"], 0x40);
        assert_eq!(parsed[0]["fields"]["hp"], 32);
        assert_eq!(parsed[0]["fields"]["skill_head"], serde_json::json!([0, 0]));
    }

    #[test]
    fn test_export_writes_bin() {
        let dir = tempfile::tempdir().unwrap();
        let rom_path = dir.path().join("dw4.nes");
        fs::write(&rom_path, rom_with(&[slime(), slime()])).unwrap();
        let out = dir.path().join("monsters.bin");

        let config = TablescanConfig::builder().file_offset(Some(0x40)).build();
        run(&config, &rom_path, false, ExportKind::Bin, Some(out.clone())).unwrap();

        let bytes = fs::read(&out).unwrap();
        assert_eq!(bytes.len(), 2 * TARGET_STRIDE);
        assert_eq!(&bytes[TARGET_STRIDE..TARGET_STRIDE + 2], &[0x20, 0x00]);
    }
}
