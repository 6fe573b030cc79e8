//! Generic record codec driven by [`RecordLayout`].
//!
//! Multi-byte integers follow the field's declared byte order (little-endian
//! for every built-in layout). `encode` is total: absent fields are zero and
//! oversized integers wrap modulo the field width, the same way the target
//! hardware would store them.

mod layout;
mod record;

pub use layout::*;
pub use record::*;

use crate::error::CodecError;

/// Decode one record from the start of `bytes`.
///
/// Fails with [`CodecError::Truncated`] when fewer than `stride` bytes are
/// available and with [`CodecError::FieldOutOfRange`] when the layout puts a
/// field past its own stride; a partial record is never produced.
pub fn decode(bytes: &[u8], layout: &RecordLayout) -> Result<Record, CodecError> {
    let Some(window) = bytes.get(..layout.stride) else {
        return Err(CodecError::Truncated {
            needed: layout.stride,
            available: bytes.len(),
        });
    };

    let mut record = Record::new();
    for field in &layout.fields {
        let raw = field
            .end()
            .and_then(|end| window.get(field.offset..end))
            .ok_or_else(|| CodecError::FieldOutOfRange {
                field: field.name.clone(),
                stride: layout.stride,
            })?;
        let value = match field.width {
            FieldWidth::Bytes(_) => FieldValue::Bytes(raw.to_vec()),
            _ => FieldValue::Int(field.int_from(raw)),
        };
        record.set(&field.name, value);
    }

    Ok(record)
}

/// Encode a record into exactly `stride` bytes.
pub fn encode(record: &Record, layout: &RecordLayout) -> Vec<u8> {
    let mut out = vec![0u8; layout.stride];

    for field in &layout.fields {
        let Some(value) = record.get(&field.name) else {
            continue;
        };
        match (value, field.width) {
            (FieldValue::Int(v), FieldWidth::Bytes(_)) => {
                let le = v.to_le_bytes();
                write_run(&mut out, field, &le);
            }
            (FieldValue::Int(v), _) => field.write_int(&mut out, *v),
            (FieldValue::Bytes(b), _) => write_run(&mut out, field, b),
        }
    }

    out
}

/// Copy a byte run into a field, truncating or leaving the tail zeroed.
fn write_run(out: &mut [u8], field: &FieldSpec, bytes: &[u8]) {
    let Some(dst) = out.get_mut(field.range()) else {
        return;
    };
    let n = dst.len().min(bytes.len());
    dst[..n].copy_from_slice(&bytes[..n]);
}
