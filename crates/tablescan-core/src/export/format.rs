//! ExportFormat trait definition

use crate::locate::IndexedRecord;

/// Trait for export format implementations
///
/// Provides a common interface for different export formats (assembly listing, JSON)
pub trait ExportFormat {
    /// Lines written before the first row (none for headerless formats)
    fn header(&self, count: usize) -> Option<String>;

    /// Format a single record
    fn format_row(&self, row: &IndexedRecord) -> String;

    /// Lines written after the last row
    fn footer(&self) -> Option<String> {
        None
    }

    /// Format a whole table
    fn format_rows(&self, rows: &[IndexedRecord]) -> String {
        let mut output = String::new();
        if let Some(header) = self.header(rows.len()) {
            output.push_str(&header);
            output.push('\n');
        }
        for row in rows {
            output.push_str(&self.format_row(row));
            output.push('\n');
        }
        if let Some(footer) = self.footer() {
            output.push_str(&footer);
            output.push('\n');
        }
        output
    }
}
