//! Scan command: discover and rank candidate table starts.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tablescan_core::monster::field;
use tablescan_core::{BankLayout, CancelToken, RankedCandidate, SearchRange, TableLocator, to_bank_address};
use tracing::{info, warn};

use super::hex_utils::format_offset;
use super::{bank_layout, load_rom};
use crate::config::TablescanConfig;

/// Run the scan command
pub fn run(
    config: &TablescanConfig,
    path: &Path,
    start: Option<usize>,
    end: Option<usize>,
    limit: usize,
    workers: usize,
    json: bool,
) -> Result<()> {
    let rom = load_rom(path)?;
    let layout = bank_layout(&rom, config.console);

    let cancel = CancelToken::new();
    let cancel_ctrlc = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Received interrupt, stopping scan...");
        cancel_ctrlc.cancel();
    })?;

    let range = SearchRange::new(start.unwrap_or(0), end.unwrap_or(rom.len()))?;
    let locator = TableLocator::new(
        rom.as_bytes(),
        &config.source_layout,
        &config.scan_window,
        config.locator,
    )?;

    info!(
        "Scanning {}..{} for '{}' ({} worker(s))",
        format_offset(range.start()),
        format_offset(range.end().min(rom.len())),
        config.source_layout.name,
        workers.max(1)
    );
    let report = locator.rank_candidates_parallel(range, workers, Some(&cancel));
    if report.cancelled {
        warn!("Scan interrupted; results are partial");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} candidate(s), {} likely, {} position(s) scanned",
        report.candidates.len(),
        report.likely().count(),
        report.positions_scanned
    );
    if report.is_empty() {
        return Ok(());
    }
    println!();
    for candidate in report.candidates.iter().take(limit) {
        let line = format_candidate(candidate, &layout);
        if candidate.likely_table_start {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
    if report.candidates.len() > limit {
        println!("... {} more", report.candidates.len() - limit);
    }

    Ok(())
}

/// One listing line: offset, bank address, run and headline stats.
pub fn format_candidate(candidate: &RankedCandidate, layout: &BankLayout) -> String {
    let stat = |name: &str| {
        candidate
            .record
            .int(name)
            .map_or_else(|| "-".to_string(), |v| v.to_string())
    };
    format!(
        "{}  {:<20} run={:<4} HP={:>4} ATK={:>3} DEF={:>3} AGI={:>3} EXP={:>5} GOLD={:>5}{}",
        format_offset(candidate.offset),
        to_bank_address(candidate.offset, layout).to_string(),
        candidate.run_length,
        stat(field::HP),
        stat(field::ATTACK),
        stat(field::DEFENSE),
        stat(field::AGILITY),
        stat(field::EXPERIENCE),
        stat(field::GOLD),
        if candidate.likely_table_start { "  <- likely table start" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescan_core::Record;

    #[test]
    fn test_format_candidate() {
        let candidate = RankedCandidate {
            offset: 0x1A2B2,
            record: Record::new()
                .with(field::HP, 32u32)
                .with(field::ATTACK, 10u32)
                .with(field::EXPERIENCE, 100u32),
            run_length: 12,
            likely_table_start: true,
        };
        let line = format_candidate(&candidate, &BankLayout::NES);

        assert!(line.starts_with("0x01A2B2  Bank 6 $A2A2"));
        assert!(line.contains("run=12"));
        assert!(line.contains("HP=  32"));
        assert!(line.contains("DEF=  -"));
        assert!(line.ends_with("<- likely table start"));
    }

    #[test]
    fn test_format_unlikely_candidate() {
        let candidate = RankedCandidate {
            offset: 0x20,
            record: Record::new(),
            run_length: 1,
            likely_table_start: false,
        };
        let line = format_candidate(&candidate, &BankLayout::NES);
        assert!(!line.contains("likely"));
    }
}
