//! # tablescan-core
//!
//! Locate and decode fixed-stride record tables inside ROM images.
//!
//! This crate provides:
//! - Bank/CPU address ↔ file offset arithmetic for NES and SNES LoROM images
//! - iNES / SNES copier header detection
//! - A declarative record layout with a generic decoder and encoder
//! - Table confirmation and candidate discovery driven by plausibility windows
//! - The NES monster table layouts and their remap to a 32-byte destination form
//! - `.pasm` and JSON export of decoded tables

pub mod address;
pub mod codec;
pub mod error;
pub mod export;
pub mod locate;
pub mod monster;
pub mod rom;

pub use address::{
    AddressSpec, BankAddress, BankLayout, Console, to_bank_address, to_file_offset,
};
pub use codec::{FieldSpec, FieldValue, FieldWidth, Record, RecordLayout, decode, encode};
pub use error::{AddressError, CodecError, Error, LocateError, Result};
pub use export::{ExportFormat, ExportKind, JsonExporter, PasmExporter};
pub use locate::{
    CancelToken, IndexedRecord, LocatorOptions, PlausibilityWindow, RankedCandidate, RecordTable,
    ScanReport, SearchRange, TableLocator,
};
pub use monster::{FieldMapping, MonsterRecord, TargetRecord, remap};
pub use rom::{Container, InesHeader, RomImage};
