//! Source → destination field correspondence.
//!
//! The destination layout cannot be inferred from the source, so the mapping
//! is data: a versioned list of `target ← source` entries. Destination fields
//! with no entry are zero when encoded.

use serde::{Deserialize, Serialize};

use crate::codec::{FieldValue, Record, RecordLayout};
use crate::error::{Error, Result};

use super::layouts::field;

/// Version of [`FieldMapping::monster_v1`]. Bump when the table changes.
pub const MONSTER_MAPPING_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    /// Copy a source field unchanged
    Field(String),
    /// Take `len` bytes of a source byte run starting at `start`
    Slice {
        field: String,
        start: usize,
        len: usize,
    },
    /// Explicit zero
    Zero,
}

impl MappingSource {
    fn source_field(&self) -> Option<&str> {
        match self {
            Self::Field(name) | Self::Slice { field: name, .. } => Some(name),
            Self::Zero => None,
        }
    }

    fn resolve(&self, source: &Record) -> Option<FieldValue> {
        match self {
            Self::Field(name) => source.get(name).cloned(),
            Self::Slice { field, start, len } => {
                let bytes = match source.get(field)? {
                    FieldValue::Bytes(b) => b.clone(),
                    FieldValue::Int(v) => v.to_le_bytes().to_vec(),
                };
                let end = start.saturating_add(*len).min(bytes.len());
                let slice = bytes.get(*start..end).unwrap_or_default();
                Some(FieldValue::Bytes(slice.to_vec()))
            }
            Self::Zero => Some(FieldValue::Int(0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub target: String,
    pub source: MappingSource,
}

impl MappingEntry {
    pub fn field(target: &str, source: &str) -> Self {
        Self {
            target: target.to_string(),
            source: MappingSource::Field(source.to_string()),
        }
    }

    pub fn slice(target: &str, source: &str, start: usize, len: usize) -> Self {
        Self {
            target: target.to_string(),
            source: MappingSource::Slice {
                field: source.to_string(),
                start,
                len,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub version: u32,
    pub entries: Vec<MappingEntry>,
}

impl FieldMapping {
    /// Monster mapping, version 1.
    ///
    /// | target          | source                |
    /// |-----------------|-----------------------|
    /// | hp              | hp                    |
    /// | experience      | experience            |
    /// | gold            | gold                  |
    /// | attack          | attack                |
    /// | defense         | defense               |
    /// | agility         | agility               |
    /// | item_drop_id    | item_drop_id          |
    /// | drop_rate_flags | drop_rate_flags       |
    /// | skill_head      | skill_data[0..2]      |
    /// | behavior_head   | behavior_data[0..2]   |
    pub fn monster_v1() -> Self {
        use field::*;
        Self {
            version: MONSTER_MAPPING_VERSION,
            entries: vec![
                MappingEntry::field(HP, HP),
                MappingEntry::field(EXPERIENCE, EXPERIENCE),
                MappingEntry::field(GOLD, GOLD),
                MappingEntry::field(ATTACK, ATTACK),
                MappingEntry::field(DEFENSE, DEFENSE),
                MappingEntry::field(AGILITY, AGILITY),
                MappingEntry::field(ITEM_DROP_ID, ITEM_DROP_ID),
                MappingEntry::field(DROP_RATE_FLAGS, DROP_RATE_FLAGS),
                MappingEntry::slice(SKILL_HEAD, SKILL_DATA, 0, 2),
                MappingEntry::slice(BEHAVIOR_HEAD, BEHAVIOR_DATA, 0, 2),
            ],
        }
    }

    /// Check every entry against the layouts it will be used with.
    pub fn validate(&self, source: &RecordLayout, target: &RecordLayout) -> Result<()> {
        for entry in &self.entries {
            if target.field(&entry.target).is_none() {
                return Err(Error::InvalidConfig(format!(
                    "mapping v{} targets '{}' which layout '{}' does not have",
                    self.version, entry.target, target.name
                )));
            }
            let Some(name) = entry.source.source_field() else {
                continue;
            };
            let Some(spec) = source.field(name) else {
                return Err(Error::InvalidConfig(format!(
                    "mapping v{} reads '{}' which layout '{}' does not have",
                    self.version, name, source.name
                )));
            };
            if let MappingSource::Slice { start, len, .. } = &entry.source {
                let width = spec.width.len();
                if start.checked_add(*len).is_none_or(|end| end > width) {
                    return Err(Error::InvalidConfig(format!(
                        "mapping v{} slices '{}' at {}+{} but the field is {} byte(s) wide",
                        self.version, name, start, len, width
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build a destination record from a decoded source record.
    pub fn apply(&self, source: &Record) -> Record {
        let mut out = Record::new();
        for entry in &self.entries {
            if let Some(value) = entry.source.resolve(source) {
                out.set(&entry.target, value);
            }
        }
        out
    }
}
