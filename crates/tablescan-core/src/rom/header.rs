//! Container header interpretation.
//!
//! Only the fields needed to turn a bank/address pair into a file offset are
//! interpreted; the rest are carried for the `header` diagnostic.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::address::{BankLayout, INES_HEADER_SIZE, INES_TRAINER_SIZE, SNES_COPIER_HEADER_SIZE};

/// iNES magic: "NES" followed by MS-DOS EOF
pub const INES_MAGIC: &[u8; 4] = b"NES\x1A";
/// PRG-ROM bank unit (16 KiB)
pub const PRG_BANK_SIZE: usize = 0x4000;
/// CHR-ROM bank unit (8 KiB)
pub const CHR_BANK_SIZE: usize = 0x2000;

const FLAG6_VERTICAL_MIRRORING: u8 = 0x01;
const FLAG6_BATTERY: u8 = 0x02;
const FLAG6_TRAINER: u8 = 0x04;
const FLAG6_FOUR_SCREEN: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InesHeader {
    pub prg_banks: u8,
    pub chr_banks: u8,
    pub flags6: u8,
    pub flags7: u8,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    pub has_trainer: bool,
}

impl InesHeader {
    /// Parse the 16-byte header at the start of `bytes`, if present.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < INES_HEADER_SIZE as usize || !bytes.starts_with(INES_MAGIC) {
            return None;
        }

        let flags6 = bytes[6];
        let flags7 = bytes[7];
        let mirroring = if flags6 & FLAG6_FOUR_SCREEN != 0 {
            Mirroring::FourScreen
        } else if flags6 & FLAG6_VERTICAL_MIRRORING != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Some(Self {
            prg_banks: bytes[4],
            chr_banks: bytes[5],
            flags6,
            flags7,
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
            mirroring,
            has_battery: flags6 & FLAG6_BATTERY != 0,
            has_trainer: flags6 & FLAG6_TRAINER != 0,
        })
    }

    pub fn prg_size(&self) -> usize {
        usize::from(self.prg_banks) * PRG_BANK_SIZE
    }

    pub fn chr_size(&self) -> usize {
        usize::from(self.chr_banks) * CHR_BANK_SIZE
    }

    /// Bytes in front of PRG bank 0
    pub fn data_start(&self) -> u32 {
        if self.has_trainer {
            INES_HEADER_SIZE + INES_TRAINER_SIZE
        } else {
            INES_HEADER_SIZE
        }
    }

    pub fn bank_layout(&self) -> BankLayout {
        BankLayout::NES.with_header_size(self.data_start())
    }
}

/// What wraps the raw ROM data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Container {
    Ines(InesHeader),
    SnesCopier,
    Raw,
}

impl Container {
    pub fn detect(bytes: &[u8]) -> Self {
        if let Some(header) = InesHeader::parse(bytes) {
            return Self::Ines(header);
        }
        if bytes.len() % 0x8000 == SNES_COPIER_HEADER_SIZE as usize {
            return Self::SnesCopier;
        }
        Self::Raw
    }

    pub fn header_size(&self) -> u32 {
        match self {
            Self::Ines(header) => header.data_start(),
            Self::SnesCopier => SNES_COPIER_HEADER_SIZE,
            Self::Raw => 0,
        }
    }

    /// Best-guess bank layout for the container; raw images are treated as LoROM.
    pub fn bank_layout(&self) -> BankLayout {
        match self {
            Self::Ines(header) => header.bank_layout(),
            Self::SnesCopier => BankLayout::SNES_LOROM.with_header_size(SNES_COPIER_HEADER_SIZE),
            Self::Raw => BankLayout::SNES_LOROM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ines_bytes(prg: u8, chr: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 16];
        bytes[..4].copy_from_slice(INES_MAGIC);
        bytes[4] = prg;
        bytes[5] = chr;
        bytes[6] = flags6;
        bytes[7] = flags7;
        bytes
    }

    #[test]
    fn test_parse_mmc1_header() {
        // 32 x 16KB PRG, no CHR, mapper 1, battery
        let header = InesHeader::parse(&ines_bytes(32, 0, 0x12, 0x00)).unwrap();
        assert_eq!(header.prg_size(), 512 * 1024);
        assert_eq!(header.chr_size(), 0);
        assert_eq!(header.mapper, 1);
        assert!(header.has_battery);
        assert!(!header.has_trainer);
        assert_eq!(header.mirroring, Mirroring::Horizontal);
        assert_eq!(header.data_start(), 16);
    }

    #[test]
    fn test_parse_mapper_high_nibble_and_trainer() {
        let header = InesHeader::parse(&ines_bytes(8, 4, 0x45, 0x10)).unwrap();
        assert_eq!(header.mapper, 0x14);
        assert!(header.has_trainer);
        assert_eq!(header.mirroring, Mirroring::Vertical);
        assert_eq!(header.data_start(), 16 + 512);
        assert_eq!(header.bank_layout().header_size, 528);
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut bytes = ines_bytes(1, 1, 0, 0);
        bytes[3] = 0;
        assert!(InesHeader::parse(&bytes).is_none());
        assert!(InesHeader::parse(&bytes[..8]).is_none());
    }

    #[test]
    fn test_detect_containers() {
        assert!(matches!(
            Container::detect(&ines_bytes(2, 1, 0, 0)),
            Container::Ines(_)
        ));
        assert_eq!(
            Container::detect(&vec![0u8; 0x8000 * 4 + 512]),
            Container::SnesCopier
        );
        assert_eq!(Container::detect(&vec![0u8; 0x8000 * 4]), Container::Raw);
        assert_eq!(Container::SnesCopier.bank_layout().header_size, 512);
    }
}
