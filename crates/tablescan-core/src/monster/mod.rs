//! Monster records: the 27-byte NES table and its 32-byte destination form.
//!
//! [`MonsterRecord`] and [`TargetRecord`] are typed views over the generic
//! [`Record`]; the byte positions live in [`source_layout`] and
//! [`target_layout`], never in this file.

mod layouts;
mod mapping;

pub use layouts::*;
pub use mapping::*;

use serde::{Deserialize, Serialize};

use crate::codec::{self, FieldValue, Record};
use crate::error::CodecError;

fn require_int(record: &Record, name: &str) -> Result<u32, CodecError> {
    record.int(name).ok_or_else(|| CodecError::MissingField {
        field: name.to_string(),
    })
}

fn require_bytes<const N: usize>(record: &Record, name: &str) -> Result<[u8; N], CodecError> {
    let bytes = record.bytes(name).ok_or_else(|| CodecError::MissingField {
        field: name.to_string(),
    })?;
    let mut out = [0u8; N];
    let n = bytes.len().min(N);
    out[..n].copy_from_slice(&bytes[..n]);
    Ok(out)
}

fn int_or_zero(record: &Record, name: &str) -> u32 {
    record.int(name).unwrap_or(0)
}

fn bytes_or_zero<const N: usize>(record: &Record, name: &str) -> [u8; N] {
    require_bytes(record, name).unwrap_or([0u8; N])
}

/// One entry of the NES monster table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub experience: u16,
    pub gold: u16,
    pub hp: u16,
    pub attack: u8,
    pub defense: u8,
    pub agility: u8,
    pub skill_data: [u8; 6],
    pub behavior_data: [u8; 4],
    pub item_drop_id: u8,
    pub unknown_20: u8,
    pub unknown_21: u8,
    pub metal_flags: u8,
    pub drop_rate_flags: u8,
    pub status_vulnerability: u8,
    pub unknown_25: u8,
    pub unknown_26: u8,
}

impl MonsterRecord {
    /// Decode from at least [`SOURCE_STRIDE`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_record(&codec::decode(bytes, &source_layout())?)
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(&self.to_record(), &source_layout())
    }

    pub fn from_record(record: &Record) -> Result<Self, CodecError> {
        use field::*;
        Ok(Self {
            experience: require_int(record, EXPERIENCE)? as u16,
            gold: require_int(record, GOLD)? as u16,
            hp: require_int(record, HP)? as u16,
            attack: require_int(record, ATTACK)? as u8,
            defense: require_int(record, DEFENSE)? as u8,
            agility: require_int(record, AGILITY)? as u8,
            skill_data: require_bytes(record, SKILL_DATA)?,
            behavior_data: require_bytes(record, BEHAVIOR_DATA)?,
            item_drop_id: require_int(record, ITEM_DROP_ID)? as u8,
            unknown_20: require_int(record, UNKNOWN_20)? as u8,
            unknown_21: require_int(record, UNKNOWN_21)? as u8,
            metal_flags: require_int(record, METAL_FLAGS)? as u8,
            drop_rate_flags: require_int(record, DROP_RATE_FLAGS)? as u8,
            status_vulnerability: require_int(record, STATUS_VULNERABILITY)? as u8,
            unknown_25: require_int(record, UNKNOWN_25)? as u8,
            unknown_26: require_int(record, UNKNOWN_26)? as u8,
        })
    }

    pub fn to_record(&self) -> Record {
        use field::*;
        Record::new()
            .with(EXPERIENCE, u32::from(self.experience))
            .with(GOLD, u32::from(self.gold))
            .with(HP, u32::from(self.hp))
            .with(ATTACK, u32::from(self.attack))
            .with(DEFENSE, u32::from(self.defense))
            .with(AGILITY, u32::from(self.agility))
            .with(SKILL_DATA, self.skill_data.to_vec())
            .with(BEHAVIOR_DATA, self.behavior_data.to_vec())
            .with(ITEM_DROP_ID, u32::from(self.item_drop_id))
            .with(UNKNOWN_20, u32::from(self.unknown_20))
            .with(UNKNOWN_21, u32::from(self.unknown_21))
            .with(METAL_FLAGS, u32::from(self.metal_flags))
            .with(DROP_RATE_FLAGS, u32::from(self.drop_rate_flags))
            .with(STATUS_VULNERABILITY, u32::from(self.status_vulnerability))
            .with(UNKNOWN_25, u32::from(self.unknown_25))
            .with(UNKNOWN_26, u32::from(self.unknown_26))
    }

    /// Metal slimes and kin carry bit 0 of the metal flags.
    pub fn is_metal(&self) -> bool {
        self.metal_flags & 0x01 != 0
    }
}

/// One entry of the destination table. Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub hp: u16,
    pub experience: u16,
    pub gold: u16,
    pub attack: u8,
    pub defense: u8,
    pub agility: u8,
    pub item_drop_id: u8,
    pub drop_rate_flags: u8,
    pub skill_head: [u8; 2],
    pub behavior_head: [u8; 2],
}

impl TargetRecord {
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(Self::from_record(&codec::decode(bytes, &target_layout())?))
    }

    /// Always [`TARGET_STRIDE`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode(&self.to_record(), &target_layout())
    }

    pub fn from_record(record: &Record) -> Self {
        use field::*;
        Self {
            hp: int_or_zero(record, HP) as u16,
            experience: int_or_zero(record, EXPERIENCE) as u16,
            gold: int_or_zero(record, GOLD) as u16,
            attack: int_or_zero(record, ATTACK) as u8,
            defense: int_or_zero(record, DEFENSE) as u8,
            agility: int_or_zero(record, AGILITY) as u8,
            item_drop_id: int_or_zero(record, ITEM_DROP_ID) as u8,
            drop_rate_flags: int_or_zero(record, DROP_RATE_FLAGS) as u8,
            skill_head: bytes_or_zero(record, SKILL_HEAD),
            behavior_head: bytes_or_zero(record, BEHAVIOR_HEAD),
        }
    }

    pub fn to_record(&self) -> Record {
        use field::*;
        Record::new()
            .with(HP, u32::from(self.hp))
            .with(EXPERIENCE, u32::from(self.experience))
            .with(GOLD, u32::from(self.gold))
            .with(ATTACK, u32::from(self.attack))
            .with(DEFENSE, u32::from(self.defense))
            .with(AGILITY, u32::from(self.agility))
            .with(ITEM_DROP_ID, u32::from(self.item_drop_id))
            .with(DROP_RATE_FLAGS, u32::from(self.drop_rate_flags))
            .with(SKILL_HEAD, FieldValue::Bytes(self.skill_head.to_vec()))
            .with(BEHAVIOR_HEAD, FieldValue::Bytes(self.behavior_head.to_vec()))
    }
}

/// Remap with the built-in v1 mapping.
pub fn remap(source: &MonsterRecord) -> TargetRecord {
    remap_with(source, &FieldMapping::monster_v1())
}

pub fn remap_with(source: &MonsterRecord, mapping: &FieldMapping) -> TargetRecord {
    TargetRecord::from_record(&mapping.apply(&source.to_record()))
}
