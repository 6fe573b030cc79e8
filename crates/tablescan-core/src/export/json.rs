//! JSON export format implementation

use serde_json::{Value as JsonValue, json};

use crate::locate::IndexedRecord;

use super::format::ExportFormat;

/// JSON exporter. Rows are single-line objects; a whole table is a pretty
/// printed array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportFormat for JsonExporter {
    fn header(&self, _count: usize) -> Option<String> {
        None
    }

    fn format_row(&self, row: &IndexedRecord) -> String {
        format_json_entry(row).to_string()
    }

    fn format_rows(&self, rows: &[IndexedRecord]) -> String {
        let array = JsonValue::Array(rows.iter().map(format_json_entry).collect());
        format!("{array:#}\n")
    }
}

/// `{index, offset, fields}` for one record
pub fn format_json_entry(row: &IndexedRecord) -> JsonValue {
    json!({
        "index": row.index,
        "offset": row.offset,
        "fields": row.record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Record;

    fn row(index: usize) -> IndexedRecord {
        IndexedRecord {
            index,
            offset: 0x100 + index * 27,
            record: Record::new().with("hp", 32u32).with("skill_head", vec![1u8, 2]),
        }
    }

    #[test]
    fn test_entry_shape() {
        let value = format_json_entry(&row(1));
        assert_eq!(value["index"], 1);
        assert_eq!(value["offset"], 0x100 + 27);
        assert_eq!(value["fields"]["hp"], 32);
        assert_eq!(value["fields"]["skill_head"], json!([1, 2]));
    }

    #[test]
    fn test_rows_are_an_array() {
        let out = JsonExporter.format_rows(&[row(0), row(1)]);
        let parsed: JsonValue = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        assert_eq!(parsed[1]["index"], 1);
        assert!(out.starts_with("[\n  {"));
        assert!(out.ends_with("]\n"));

        assert_eq!(JsonExporter.format_rows(&[]), "[]\n");
    }

    #[test]
    fn test_single_row_is_one_line() {
        let line = JsonExporter.format_row(&row(0));
        assert!(!line.contains('\n'));
    }
}
