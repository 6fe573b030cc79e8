//! Plausibility windows.
//!
//! A window is a list of inclusive integer ranges keyed by field name. A
//! record is plausible only when every windowed field is in range; fields the
//! window does not mention are unconstrained.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::codec::{FieldSpec, Record, RecordLayout};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRange {
    pub field: String,
    pub min: u32,
    pub max: u32,
}

impl FieldRange {
    pub fn new(field: &str, min: u32, max: u32) -> Self {
        Self {
            field: field.to_string(),
            min,
            max,
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibilityWindow {
    pub ranges: Vec<FieldRange>,
}

impl PlausibilityWindow {
    pub fn new(ranges: Vec<FieldRange>) -> Self {
        Self { ranges }
    }

    /// Builder-style range append.
    pub fn with(mut self, field: &str, min: u32, max: u32) -> Self {
        self.ranges.push(FieldRange::new(field, min, max));
        self
    }

    /// Check an already decoded record. Missing or non-integer fields fail.
    pub fn contains(&self, record: &Record) -> bool {
        self.ranges
            .iter()
            .all(|range| record.int(&range.field).is_some_and(|v| range.contains(v)))
    }

    /// Resolve field names against a layout so raw bytes can be checked
    /// without decoding a full record.
    pub fn compile(&self, layout: &RecordLayout) -> Result<CompiledWindow> {
        let mut checks = Vec::with_capacity(self.ranges.len());
        for range in &self.ranges {
            if range.min > range.max {
                return Err(Error::InvalidConfig(format!(
                    "window range for '{}' is inverted ({} > {})",
                    range.field, range.min, range.max
                )));
            }
            let spec = layout.field(&range.field).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "window names field '{}' which layout '{}' does not have",
                    range.field, layout.name
                ))
            })?;
            if !spec.width.is_integer() {
                return Err(Error::InvalidConfig(format!(
                    "window field '{}' is a byte run, not an integer",
                    range.field
                )));
            }
            checks.push((spec.clone(), range.min..=range.max));
        }
        Ok(CompiledWindow { checks })
    }
}

/// A window bound to a specific layout.
#[derive(Debug, Clone)]
pub struct CompiledWindow {
    checks: Vec<(FieldSpec, RangeInclusive<u32>)>,
}

impl CompiledWindow {
    /// Check a record-sized byte slice.
    pub fn accepts(&self, record: &[u8]) -> bool {
        self.checks
            .iter()
            .all(|(spec, range)| spec.read_int(record).is_some_and(|v| range.contains(&v)))
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
