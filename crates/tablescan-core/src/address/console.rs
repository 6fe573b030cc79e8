//! Bank layouts for the consoles the tables come from and go to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Size of the iNES container header
pub const INES_HEADER_SIZE: u32 = 16;
/// Size of the trainer block that may follow an iNES header
pub const INES_TRAINER_SIZE: u32 = 512;
/// Size of the copier header some SNES dumps carry
pub const SNES_COPIER_HEADER_SIZE: u32 = 512;

/// How a console maps ROM banks into its CPU address space.
///
/// `window_base` is the first CPU address of the switchable slot; a bank
/// occupies `window_base..window_base + bank_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankLayout {
    pub bank_size: u32,
    pub window_base: u16,
    pub header_size: u32,
}

impl BankLayout {
    /// NES PRG-ROM: 16 KiB banks switched in at $8000, behind a 16-byte iNES header.
    pub const NES: BankLayout = BankLayout {
        bank_size: 0x4000,
        window_base: 0x8000,
        header_size: INES_HEADER_SIZE,
    };

    /// SNES LoROM: 32 KiB banks in the upper half of each bank, headerless dump.
    pub const SNES_LOROM: BankLayout = BankLayout {
        bank_size: 0x8000,
        window_base: 0x8000,
        header_size: 0,
    };

    /// Same layout with a different container header size.
    pub fn with_header_size(self, header_size: u32) -> Self {
        Self {
            header_size,
            ..self
        }
    }

    /// Last CPU address inside the banked window (inclusive).
    pub fn window_end(&self) -> u16 {
        let end = u32::from(self.window_base) + self.bank_size.saturating_sub(1);
        end.min(u32::from(u16::MAX)) as u16
    }

    pub fn contains_cpu_address(&self, cpu_address: u16) -> bool {
        self.bank_size > 0 && (self.window_base..=self.window_end()).contains(&cpu_address)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Console {
    #[default]
    #[strum(serialize = "nes")]
    Nes,
    #[strum(serialize = "snes-lorom")]
    #[serde(rename = "snes-lorom")]
    SnesLoRom,
}

impl Console {
    pub fn bank_layout(&self) -> BankLayout {
        match self {
            Self::Nes => BankLayout::NES,
            Self::SnesLoRom => BankLayout::SNES_LOROM,
        }
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_nes_window() {
        let layout = BankLayout::NES;
        assert_eq!(layout.window_end(), 0xBFFF);
        assert!(layout.contains_cpu_address(0x8000));
        assert!(layout.contains_cpu_address(0xBFFF));
        assert!(!layout.contains_cpu_address(0xC000));
        assert!(!layout.contains_cpu_address(0x7FFF));
    }

    #[test]
    fn test_lorom_window_saturates() {
        assert_eq!(BankLayout::SNES_LOROM.window_end(), 0xFFFF);
    }

    #[test]
    fn test_console_from_str() {
        assert_eq!(Console::from_str("nes").unwrap(), Console::Nes);
        assert_eq!(Console::from_str("snes-lorom").unwrap(), Console::SnesLoRom);
        assert!(Console::from_str("gba").is_err());
        assert_eq!(Console::SnesLoRom.short_name(), "snes-lorom");
    }
}
