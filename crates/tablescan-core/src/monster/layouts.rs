//! Built-in layouts and plausibility windows for the monster tables.

use crate::codec::{FieldSpec, FieldWidth, RecordLayout};
use crate::locate::PlausibilityWindow;

/// Source record size (NES)
pub const SOURCE_STRIDE: usize = 27;
/// Destination record size (SNES)
pub const TARGET_STRIDE: usize = 32;

/// Field names shared by layouts, windows and mappings
pub mod field {
    pub const EXPERIENCE: &str = "experience";
    pub const GOLD: &str = "gold";
    pub const HP: &str = "hp";
    pub const ATTACK: &str = "attack";
    pub const DEFENSE: &str = "defense";
    pub const AGILITY: &str = "agility";
    pub const SKILL_DATA: &str = "skill_data";
    pub const BEHAVIOR_DATA: &str = "behavior_data";
    pub const ITEM_DROP_ID: &str = "item_drop_id";
    pub const UNKNOWN_20: &str = "unknown_20";
    pub const UNKNOWN_21: &str = "unknown_21";
    pub const METAL_FLAGS: &str = "metal_flags";
    pub const DROP_RATE_FLAGS: &str = "drop_rate_flags";
    pub const STATUS_VULNERABILITY: &str = "status_vulnerability";
    pub const UNKNOWN_25: &str = "unknown_25";
    pub const UNKNOWN_26: &str = "unknown_26";
    pub const SKILL_HEAD: &str = "skill_head";
    pub const BEHAVIOR_HEAD: &str = "behavior_head";
}

/// Dragon Warrior IV (NES) monster record, 27 bytes.
///
/// ```text
/// 00 experience   u16     0F-12 behavior_data x4
/// 02 gold         u16     13    item_drop_id
/// 04 hp           u16     14-15 unknown
/// 06 attack       u8      16    metal_flags
/// 07 defense      u8      17    drop_rate_flags
/// 08 agility      u8      18    status_vulnerability
/// 09 skill_data   x6      19-1A unknown
/// ```
pub fn source_layout() -> RecordLayout {
    use field::*;
    RecordLayout::new(
        "dw4-monster",
        SOURCE_STRIDE,
        vec![
            FieldSpec::new(EXPERIENCE, 0, FieldWidth::U16),
            FieldSpec::new(GOLD, 2, FieldWidth::U16),
            FieldSpec::new(HP, 4, FieldWidth::U16),
            FieldSpec::new(ATTACK, 6, FieldWidth::U8),
            FieldSpec::new(DEFENSE, 7, FieldWidth::U8),
            FieldSpec::new(AGILITY, 8, FieldWidth::U8),
            FieldSpec::new(SKILL_DATA, 9, FieldWidth::Bytes(6)),
            FieldSpec::new(BEHAVIOR_DATA, 15, FieldWidth::Bytes(4)),
            FieldSpec::new(ITEM_DROP_ID, 19, FieldWidth::U8),
            FieldSpec::new(UNKNOWN_20, 20, FieldWidth::U8),
            FieldSpec::new(UNKNOWN_21, 21, FieldWidth::U8),
            FieldSpec::new(METAL_FLAGS, 22, FieldWidth::U8),
            FieldSpec::new(DROP_RATE_FLAGS, 23, FieldWidth::U8),
            FieldSpec::new(STATUS_VULNERABILITY, 24, FieldWidth::U8),
            FieldSpec::new(UNKNOWN_25, 25, FieldWidth::U8),
            FieldSpec::new(UNKNOWN_26, 26, FieldWidth::U8),
        ],
    )
}

/// Destination monster record, 32 bytes. Bytes 15..32 are reserved.
pub fn target_layout() -> RecordLayout {
    use field::*;
    RecordLayout::new(
        "dq4r-monster",
        TARGET_STRIDE,
        vec![
            FieldSpec::new(HP, 0, FieldWidth::U16),
            FieldSpec::new(EXPERIENCE, 2, FieldWidth::U16),
            FieldSpec::new(GOLD, 4, FieldWidth::U16),
            FieldSpec::new(ATTACK, 6, FieldWidth::U8),
            FieldSpec::new(DEFENSE, 7, FieldWidth::U8),
            FieldSpec::new(AGILITY, 8, FieldWidth::U8),
            FieldSpec::new(ITEM_DROP_ID, 9, FieldWidth::U8),
            FieldSpec::new(DROP_RATE_FLAGS, 10, FieldWidth::U8),
            FieldSpec::new(SKILL_HEAD, 11, FieldWidth::Bytes(2)),
            FieldSpec::new(BEHAVIOR_HEAD, 13, FieldWidth::Bytes(2)),
        ],
    )
}

/// Window for discovery: tight enough that noise rarely survives a run.
pub fn scan_window() -> PlausibilityWindow {
    use field::*;
    PlausibilityWindow::default()
        .with(HP, 1, 300)
        .with(ATTACK, 0, 255)
        .with(DEFENSE, 0, 255)
        .with(AGILITY, 0, 50)
        .with(EXPERIENCE, 1, 5000)
        .with(GOLD, 1, 5000)
}

/// Window for confirming a known table start; late-game monsters exceed the
/// discovery limits.
pub fn confirm_window() -> PlausibilityWindow {
    use field::*;
    PlausibilityWindow::default()
        .with(HP, 1, 999)
        .with(ATTACK, 0, 255)
        .with(DEFENSE, 0, 255)
}

/// Window for reading destination records back out of a built image.
pub fn target_window() -> PlausibilityWindow {
    PlausibilityWindow::default().with(field::HP, 1, 999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts_are_valid() {
        assert!(source_layout().validate().is_ok());
        assert!(target_layout().validate().is_ok());
    }

    #[test]
    fn test_source_layout_covers_every_byte_once() {
        let layout = source_layout();
        let mut covered = [0u8; SOURCE_STRIDE];
        for field in &layout.fields {
            for i in field.range() {
                covered[i] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_builtin_windows_compile() {
        assert!(scan_window().compile(&source_layout()).is_ok());
        assert!(confirm_window().compile(&source_layout()).is_ok());
        assert!(target_window().compile(&target_layout()).is_ok());
    }
}
