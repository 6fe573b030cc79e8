//! Bank/CPU address to flat file offset arithmetic.
//!
//! ```text
//! file offset = header_size + bank * bank_size + (cpu_address - window_base)
//! ```
//!
//! For the NES monster table at Bank 6 $A2A2:
//! `0x10 + 6 * 0x4000 + 0x2A2A = 0x1A2B2`.

mod console;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

pub use console::*;

/// A bank/CPU address pair together with the layout it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpec {
    pub bank: u32,
    pub cpu_address: u16,
    pub bank_size: u32,
    pub header_size: u32,
    pub window_base: u16,
}

impl AddressSpec {
    pub fn new(bank: u32, cpu_address: u16, layout: &BankLayout) -> Self {
        Self {
            bank,
            cpu_address,
            bank_size: layout.bank_size,
            header_size: layout.header_size,
            window_base: layout.window_base,
        }
    }

    pub fn layout(&self) -> BankLayout {
        BankLayout {
            bank_size: self.bank_size,
            window_base: self.window_base,
            header_size: self.header_size,
        }
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bank {} ${:04X}", self.bank, self.cpu_address)
    }
}

/// Diagnostic inverse of [`to_file_offset`].
///
/// `bank` is negative when the offset points into the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BankAddress {
    pub bank: i64,
    pub cpu_address: u16,
}

impl BankAddress {
    pub fn is_in_range(&self) -> bool {
        self.bank >= 0 && self.bank <= i64::from(u32::MAX)
    }

    /// Convert back into an [`AddressSpec`], if the bank is representable.
    pub fn to_spec(&self, layout: &BankLayout) -> Option<AddressSpec> {
        let bank = u32::try_from(self.bank).ok()?;
        Some(AddressSpec::new(bank, self.cpu_address, layout))
    }
}

impl fmt::Display for BankAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_in_range() {
            write!(f, "Bank {} ${:04X}", self.bank, self.cpu_address)
        } else {
            write!(f, "Bank ?? ${:04X} (header)", self.cpu_address)
        }
    }
}

/// Convert a bank/CPU address pair into a flat file offset.
///
/// When `image_len` is supplied the offset must address a byte inside the image.
pub fn to_file_offset(spec: &AddressSpec, image_len: Option<usize>) -> Result<usize, AddressError> {
    let layout = spec.layout();
    if layout.bank_size == 0 {
        return Err(AddressError::ZeroBankSize);
    }
    if !layout.contains_cpu_address(spec.cpu_address) {
        return Err(AddressError::OutsideWindow {
            cpu_address: spec.cpu_address,
            window_start: layout.window_base,
            window_end: layout.window_end(),
        });
    }

    let within_bank = u64::from(spec.cpu_address - spec.window_base);
    let offset = u64::from(spec.header_size)
        + u64::from(spec.bank) * u64::from(spec.bank_size)
        + within_bank;
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);

    if let Some(image_len) = image_len {
        if offset >= image_len {
            return Err(AddressError::BeyondImage { offset, image_len });
        }
    }

    Ok(offset)
}

/// Convert a flat file offset back into a bank/CPU address pair.
pub fn to_bank_address(file_offset: usize, layout: &BankLayout) -> BankAddress {
    let bank_size = i64::from(layout.bank_size.max(1));
    let relative = file_offset as i64 - i64::from(layout.header_size);
    let bank = relative.div_euclid(bank_size);
    let within_bank = relative.rem_euclid(bank_size);
    let cpu_address = (i64::from(layout.window_base) + within_bank).min(i64::from(u16::MAX)) as u16;

    BankAddress { bank, cpu_address }
}
