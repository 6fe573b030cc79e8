//! Address mapping command.

use anyhow::{Result, bail};
use tablescan_core::{AddressSpec, to_bank_address, to_file_offset};

use super::hex_utils::format_offset;
use crate::config::TablescanConfig;

/// Run the map command
///
/// With `offset` the conversion goes file offset → bank address; otherwise
/// bank/address (falling back to the configured table location) → offset.
pub fn run(
    config: &TablescanConfig,
    bank: Option<u32>,
    address: Option<u16>,
    offset: Option<usize>,
    header_size: Option<u32>,
) -> Result<()> {
    let mut layout = config.console.bank_layout();
    if let Some(header_size) = header_size {
        layout = layout.with_header_size(header_size);
    }

    if let Some(offset) = offset {
        let bank_address = to_bank_address(offset, &layout);
        println!("{} -> {}", format_offset(offset), bank_address);
        return Ok(());
    }

    let (Some(bank), Some(cpu_address)) = (
        bank.or(config.table.bank),
        address.or(config.table.cpu_address),
    ) else {
        bail!("Need --bank and --address, or --offset");
    };

    let spec = AddressSpec::new(bank, cpu_address, &layout);
    let offset = to_file_offset(&spec, None)?;
    println!(
        "{} -> {} ({}, header {} bytes)",
        spec,
        format_offset(offset),
        config.console,
        layout.header_size
    );
    Ok(())
}
