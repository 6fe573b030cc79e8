//! Declarative record layouts.
//!
//! A layout lists every field of a fixed-stride record by name, byte offset,
//! width and byte order. The generic codec and the plausibility window both
//! work from this description, so adding a table means adding a layout, not
//! field-extraction code.

use std::collections::HashSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Width of a field. Integer widths decode to `u32`; `Bytes` is an opaque run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    U8,
    U16,
    U24,
    U32,
    Bytes(usize),
}

impl FieldWidth {
    pub fn len(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U24 => 3,
            Self::U32 => 4,
            Self::Bytes(n) => *n,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Bytes(_))
    }

    /// Largest value an integer field can hold.
    pub fn max_value(&self) -> u32 {
        match self {
            Self::U8 => 0xFF,
            Self::U16 => 0xFFFF,
            Self::U24 => 0xFF_FFFF,
            Self::U32 | Self::Bytes(_) => u32::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub offset: usize,
    pub width: FieldWidth,
    #[serde(default)]
    pub endian: Endian,
}

impl FieldSpec {
    pub fn new(name: &str, offset: usize, width: FieldWidth) -> Self {
        Self {
            name: name.to_string(),
            offset,
            width,
            endian: Endian::Little,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.width.len())
    }

    /// Offset one past the field, `None` if it does not fit in `usize`.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.width.len())
    }

    /// Read this integer field out of a record-sized slice.
    ///
    /// Returns `None` for byte runs or when the slice is too short.
    pub fn read_int(&self, record: &[u8]) -> Option<u32> {
        if !self.width.is_integer() {
            return None;
        }
        let bytes = record.get(self.offset..self.end()?)?;
        Some(self.int_from(bytes))
    }

    /// Assemble an integer from exactly this field's bytes.
    pub(crate) fn int_from(&self, bytes: &[u8]) -> u32 {
        match self.endian {
            Endian::Little => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
            Endian::Big => bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
        }
    }

    /// Write an integer into this field, wrapping modulo the field width.
    pub fn write_int(&self, record: &mut [u8], value: u32) {
        let len = self.width.len().min(4);
        let Some(out) = self
            .offset
            .checked_add(len)
            .and_then(|end| record.get_mut(self.offset..end))
        else {
            return;
        };
        let le = value.to_le_bytes();
        match self.endian {
            Endian::Little => out.copy_from_slice(&le[..len]),
            Endian::Big => {
                for (dst, src) in out.iter_mut().zip(le[..len].iter().rev()) {
                    *dst = *src;
                }
            }
        }
    }
}

/// A fixed-stride record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    pub name: String,
    pub stride: usize,
    pub fields: Vec<FieldSpec>,
}

impl RecordLayout {
    pub fn new(name: &str, stride: usize, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.to_string(),
            stride,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reject layouts the codec cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::InvalidConfig(format!(
                "layout '{}' has a stride of zero",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "layout '{}' declares field '{}' twice",
                    self.name, field.name
                )));
            }
            if field.width.len() == 0 {
                return Err(Error::InvalidConfig(format!(
                    "field '{}' in layout '{}' has zero width",
                    field.name, self.name
                )));
            }
            if field.end().is_none_or(|end| end > self.stride) {
                return Err(Error::InvalidConfig(format!(
                    "field '{}' ({}..{}) extends past the {}-byte stride of layout '{}'",
                    field.name,
                    field.range().start,
                    field.range().end,
                    self.stride,
                    self.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_int_endianness() {
        let bytes = [0x34, 0x12, 0x56];
        let le = FieldSpec::new("a", 0, FieldWidth::U16);
        assert_eq!(le.read_int(&bytes), Some(0x1234));

        let be = FieldSpec {
            endian: Endian::Big,
            ..FieldSpec::new("a", 0, FieldWidth::U16)
        };
        assert_eq!(be.read_int(&bytes), Some(0x3412));

        let u24 = FieldSpec::new("a", 0, FieldWidth::U24);
        assert_eq!(u24.read_int(&bytes), Some(0x561234));
    }

    #[test]
    fn test_read_int_rejects_bytes_and_short_input() {
        let run = FieldSpec::new("run", 0, FieldWidth::Bytes(2));
        assert_eq!(run.read_int(&[1, 2]), None);

        let word = FieldSpec::new("w", 1, FieldWidth::U16);
        assert_eq!(word.read_int(&[1, 2]), None);
    }

    #[test]
    fn test_write_int_wraps() {
        let mut out = [0u8; 3];
        FieldSpec::new("b", 0, FieldWidth::U8).write_int(&mut out, 0x1FF);
        assert_eq!(out, [0xFF, 0, 0]);

        let be = FieldSpec {
            endian: Endian::Big,
            ..FieldSpec::new("w", 1, FieldWidth::U16)
        };
        be.write_int(&mut out, 0x12_3456);
        assert_eq!(out, [0xFF, 0x34, 0x56]);
    }

    #[test]
    fn test_validate() {
        let ok = RecordLayout::new("ok", 3, vec![FieldSpec::new("a", 1, FieldWidth::U16)]);
        assert!(ok.validate().is_ok());

        let zero = RecordLayout::new("zero", 0, vec![]);
        assert!(zero.validate().is_err());

        let past = RecordLayout::new("past", 2, vec![FieldSpec::new("a", 1, FieldWidth::U16)]);
        assert!(past.validate().is_err());

        let overflow = RecordLayout::new(
            "overflow",
            4,
            vec![FieldSpec::new("a", usize::MAX, FieldWidth::U16)],
        );
        assert!(overflow.validate().is_err());

        let dup = RecordLayout::new(
            "dup",
            4,
            vec![
                FieldSpec::new("a", 0, FieldWidth::U8),
                FieldSpec::new("a", 1, FieldWidth::U8),
            ],
        );
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_layout_from_json() {
        let json = r#"{
            "name": "tiny",
            "stride": 4,
            "fields": [
                { "name": "hp", "offset": 0, "width": "u16" },
                { "name": "flags", "offset": 2, "width": { "bytes": 2 }, "endian": "big" }
            ]
        }"#;
        let layout: RecordLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.stride, 4);
        assert_eq!(layout.fields[1].width, FieldWidth::Bytes(2));
        assert_eq!(layout.fields[1].endian, Endian::Big);
        assert!(layout.validate().is_ok());
    }
}
