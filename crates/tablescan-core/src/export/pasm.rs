//! Assembler data listing (`.pasm`)

use std::fmt::Write;

use crate::codec::{FieldSpec, FieldValue, FieldWidth, RecordLayout};
use crate::locate::IndexedRecord;

use super::format::ExportFormat;

/// Emits one labelled block of `.word`/`.byte` directives per record, laid
/// out exactly as `layout` places the fields. Gaps and trailing reserved
/// bytes are written as `$00` so every block assembles to `layout.stride`
/// bytes.
#[derive(Debug, Clone)]
pub struct PasmExporter {
    layout: RecordLayout,
    /// Uppercased for `<SYMBOL>_COUNT` / `<SYMBOL>_TABLE`
    symbol: String,
    /// Per-record label prefix, e.g. `monster` → `monster_0A:`
    label: String,
    banner: Vec<String>,
}

impl PasmExporter {
    pub fn new(layout: RecordLayout, symbol: &str, label: &str) -> Self {
        Self {
            layout,
            symbol: symbol.to_uppercase(),
            label: label.to_string(),
            banner: Vec::new(),
        }
    }

    pub fn monsters(layout: RecordLayout) -> Self {
        Self::new(layout, "MONSTER", "monster")
    }

    /// Extra comment line for the banner.
    pub fn with_banner_line(mut self, line: impl Into<String>) -> Self {
        self.banner.push(line.into());
        self
    }

    fn sorted_fields(&self) -> Vec<&FieldSpec> {
        let mut fields: Vec<&FieldSpec> = self.layout.fields.iter().collect();
        fields.sort_by_key(|f| f.offset);
        fields
    }

    fn write_field(out: &mut String, field: &FieldSpec, value: Option<&FieldValue>) {
        let int = value.and_then(FieldValue::as_int).unwrap_or(0);
        let _ = match field.width {
            FieldWidth::U8 => writeln!(out, "\t.byte ${:02x}\t\t; {} {}", int & 0xFF, field.name, int & 0xFF),
            FieldWidth::U16 => {
                writeln!(out, "\t.word ${:04x}\t\t; {} {}", int & 0xFFFF, field.name, int & 0xFFFF)
            }
            FieldWidth::U24 => {
                writeln!(out, "\t.long ${:06x}\t\t; {} {}", int & 0xFF_FFFF, field.name, int & 0xFF_FFFF)
            }
            FieldWidth::U32 => writeln!(out, "\t.dword ${int:08x}\t\t; {} {int}", field.name),
            FieldWidth::Bytes(n) => {
                let bytes = value.and_then(FieldValue::as_bytes).unwrap_or_default();
                let list = (0..n)
                    .map(|i| format!("${:02x}", bytes.get(i).copied().unwrap_or(0)))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(out, "\t.byte {list}\t\t; {}", field.name)
            }
        };
    }

    fn write_padding(out: &mut String, len: usize) {
        if len == 0 {
            return;
        }
        let list = vec!["$00"; len].join(", ");
        let _ = writeln!(out, "\t.byte {list}\t\t; reserved");
    }
}

impl ExportFormat for PasmExporter {
    fn header(&self, count: usize) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "; {} table ({})", self.label, self.layout.name);
        let _ = writeln!(out, "; {count} records, {} bytes each", self.layout.stride);
        for line in &self.banner {
            let _ = writeln!(out, "; {line}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}_COUNT = ${count:03X}", self.symbol);
        let _ = writeln!(out);
        let _ = write!(out, "{}_TABLE:", self.symbol);
        Some(out)
    }

    fn format_row(&self, row: &IndexedRecord) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "; ${:02X} (source {:#08x})", row.index, row.offset);
        let _ = writeln!(out, "{}_{:02X}:", self.label, row.index);

        let mut cursor = 0;
        for field in self.sorted_fields() {
            if field.offset > cursor {
                Self::write_padding(&mut out, field.offset - cursor);
            }
            Self::write_field(&mut out, field, row.record.get(&field.name));
            cursor = cursor.max(field.offset + field.width.len());
        }
        Self::write_padding(&mut out, self.layout.stride.saturating_sub(cursor));

        // drop the final newline; format_rows adds one
        out.pop();
        out
    }

    fn footer(&self) -> Option<String> {
        Some(format!("\n{}_TABLE_END:", self.symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Record;
    use crate::monster::{TargetRecord, target_layout};

    fn row(index: usize, hp: u16) -> IndexedRecord {
        let target = TargetRecord {
            hp,
            experience: 100,
            gold: 50,
            attack: 10,
            defense: 8,
            agility: 5,
            ..Default::default()
        };
        IndexedRecord {
            index,
            offset: 0x1A2B2 + index * 27,
            record: target.to_record(),
        }
    }

    #[test]
    fn test_header_and_footer() {
        let exporter = PasmExporter::monsters(target_layout());
        let out = exporter.format_rows(&[row(0, 32), row(1, 40)]);

        assert!(out.starts_with("; monster table (dq4r-monster)\n"));
        assert!(out.contains("MONSTER_COUNT = $002\n"));
        assert!(out.contains("MONSTER_TABLE:\n"));
        assert!(out.contains("monster_00:\n"));
        assert!(out.contains("monster_01:\n"));
        assert!(out.trim_end().ends_with("MONSTER_TABLE_END:"));
    }

    #[test]
    fn test_row_directives_follow_layout() {
        let exporter = PasmExporter::monsters(target_layout());
        let out = exporter.format_row(&row(10, 32));
        let directives: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with('\t'))
            .map(|l| l.split('\t').nth(1).unwrap_or_default())
            .collect();

        assert!(out.contains("monster_0A:"));
        assert_eq!(directives[0], ".word $0020");
        assert_eq!(directives[1], ".word $0064");
        assert_eq!(directives[2], ".word $0032");
        assert_eq!(directives[3], ".byte $0a");
        assert_eq!(directives[8], ".byte $00, $00");
        // 17 reserved bytes close the block
        assert_eq!(directives.last().map(|d| d.matches("$00").count()), Some(17));
    }

    #[test]
    fn test_gaps_are_padded() {
        let layout = RecordLayout::new(
            "gappy",
            6,
            vec![
                FieldSpec::new("a", 0, FieldWidth::U8),
                FieldSpec::new("b", 3, FieldWidth::U8),
            ],
        );
        let exporter = PasmExporter::new(layout, "thing", "thing");
        let out = exporter.format_row(&IndexedRecord {
            index: 0,
            offset: 0,
            record: Record::new().with("a", 1u32).with("b", 2u32),
        });
        let bytes: usize = out.lines().filter(|l| l.starts_with('\t')).map(|l| l.matches('$').count()).sum();
        assert_eq!(bytes, 6);
    }

    #[test]
    fn test_banner_lines() {
        let exporter = PasmExporter::monsters(target_layout()).with_banner_line("mapping v1");
        let header = exporter.header(0).unwrap();
        assert!(header.contains("; mapping v1\n"));
        assert!(header.contains("MONSTER_COUNT = $000"));
    }

    #[test]
    fn test_count_is_uppercase_hex() {
        let header = PasmExporter::monsters(target_layout()).header(0xC3).unwrap();
        assert!(header.contains("MONSTER_COUNT = $0C3\n"));
    }
}
