use serde::{Deserialize, Serialize};

use crate::codec::{Record, RecordLayout, decode};
use crate::error::{CodecError, Error, Result};

use super::constants::*;

/// Policy knobs for confirm and discover mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    /// Minimum run a confirmed table must have
    pub min_run: usize,
    /// Records after a candidate that must also be plausible for it to be a likely start
    pub confirm_steps: usize,
    /// Upper bound on records walked from one start offset
    pub max_records: Option<usize>,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            min_run: DEFAULT_MIN_RUN,
            confirm_steps: DEFAULT_CONFIRM_STEPS,
            max_records: None,
        }
    }
}

impl LocatorOptions {
    pub fn with_min_run(mut self, min_run: usize) -> Self {
        self.min_run = min_run;
        self
    }

    pub fn with_confirm_steps(mut self, steps: usize) -> Self {
        self.confirm_steps = steps;
        self
    }

    pub fn with_max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max;
        self
    }
}

/// Half-open range of candidate start offsets for discovery.
///
/// `start <= end` always holds; deserializing an inverted range fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSearchRange")]
pub struct SearchRange {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Deserialize)]
struct RawSearchRange {
    start: usize,
    end: usize,
}

impl TryFrom<RawSearchRange> for SearchRange {
    type Error = Error;

    fn try_from(raw: RawSearchRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl SearchRange {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidConfig(format!(
                "search range is inverted ({:#x} > {:#x})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole image; the locator clamps the end.
    pub fn full() -> Self {
        Self {
            start: 0,
            end: usize::MAX,
        }
    }

    /// `center ± distance`, saturating at both ends.
    pub fn around(center: usize, distance: usize) -> Self {
        Self {
            start: center.saturating_sub(distance),
            end: center.saturating_add(distance),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A contiguous run of records found in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    pub start_offset: usize,
    pub stride: usize,
    pub count: usize,
}

impl RecordTable {
    /// Offset one past the last record.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.count * self.stride
    }

    pub fn offset_of(&self, index: usize) -> Option<usize> {
        (index < self.count).then(|| self.start_offset + index * self.stride)
    }

    /// Decode every record of the table, in order.
    pub fn decode_all(&self, rom: &[u8], layout: &RecordLayout) -> std::result::Result<Vec<IndexedRecord>, CodecError> {
        (0..self.count)
            .map(|index| {
                let offset = self.start_offset + index * self.stride;
                let bytes = rom.get(offset..).unwrap_or_default();
                let record = decode(bytes, layout)?;
                Ok(IndexedRecord {
                    index,
                    offset,
                    record,
                })
            })
            .collect()
    }
}

/// A decoded record with its position in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedRecord {
    pub index: usize,
    pub offset: usize,
    #[serde(rename = "fields")]
    pub record: Record,
}

/// A byte position whose record passed the plausibility window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOffset {
    pub offset: usize,
    pub record: Record,
}

/// A discovery candidate scored by its stride-spaced run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub offset: usize,
    pub record: Record,
    pub run_length: usize,
    pub likely_table_start: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Longest run first, ties broken by lowest offset
    pub candidates: Vec<RankedCandidate>,
    pub positions_scanned: usize,
    pub cancelled: bool,
}

impl ScanReport {
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }

    pub fn likely(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.candidates.iter().filter(|c| c.likely_table_start)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub(crate) fn sort(&mut self) {
        self.candidates
            .sort_by(|a, b| b.run_length.cmp(&a.run_length).then(a.offset.cmp(&b.offset)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FieldSpec, FieldWidth};

    #[test]
    fn test_search_range() {
        assert!(SearchRange::new(10, 5).is_err());
        assert!(SearchRange::new(5, 5).unwrap().is_empty());
        assert_eq!(SearchRange::new(2, 10).unwrap().len(), 8);

        let around = SearchRange::around(0x10, 0x20);
        assert_eq!(around.start(), 0);
        assert_eq!(around.end(), 0x30);
    }

    #[test]
    fn test_search_range_from_json() {
        let range: SearchRange = serde_json::from_str(r#"{ "start": 2, "end": 6 }"#).unwrap();
        assert_eq!(range, SearchRange::new(2, 6).unwrap());

        let err = serde_json::from_str::<SearchRange>(r#"{ "start": 6, "end": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn test_record_table_offsets() {
        let table = RecordTable {
            start_offset: 0x100,
            stride: 27,
            count: 3,
        };
        assert_eq!(table.end_offset(), 0x100 + 81);
        assert_eq!(table.offset_of(2), Some(0x100 + 54));
        assert_eq!(table.offset_of(3), None);
    }

    #[test]
    fn test_decode_all() {
        let layout = RecordLayout::new("b", 2, vec![FieldSpec::new("v", 0, FieldWidth::U16)]);
        let rom = [0xFF, 1, 0, 2, 0];
        let table = RecordTable {
            start_offset: 1,
            stride: 2,
            count: 2,
        };
        let records = table.decode_all(&rom, &layout).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].offset, 3);
        assert_eq!(records[1].record.int("v"), Some(2));
    }

    #[test]
    fn test_report_sort_order() {
        let candidate = |offset, run_length| RankedCandidate {
            offset,
            record: Record::new(),
            run_length,
            likely_table_start: false,
        };
        let mut report = ScanReport {
            candidates: vec![candidate(30, 1), candidate(20, 4), candidate(10, 1), candidate(40, 4)],
            ..Default::default()
        };
        report.sort();
        let order: Vec<_> = report.candidates.iter().map(|c| c.offset).collect();
        assert_eq!(order, [20, 40, 10, 30]);
    }
}
