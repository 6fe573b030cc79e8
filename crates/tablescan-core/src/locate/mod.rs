//! Record table locator
//!
//! Two ways in:
//!
//! - **Confirm**: a start offset is known (from docs or a bank/address pair).
//!   Walk forward stride by stride until a record falls outside the
//!   plausibility window or the image ends.
//! - **Discover**: the start is unknown. Slide byte by byte over a search
//!   range, keep every position whose record is plausible, then rank those
//!   positions by how many stride-spaced plausible records follow them.

mod cancel;
mod constants;
mod types;
mod window;

use std::panic;
use std::thread::{self, ScopedJoinHandle};

use tracing::{debug, warn};

use crate::codec::{Record, RecordLayout, decode};
use crate::error::{Error, LocateError, Result};

pub use cancel::CancelToken;
pub use constants::*;
pub use types::*;
pub use window::*;

pub struct TableLocator<'a> {
    rom: &'a [u8],
    layout: &'a RecordLayout,
    window: CompiledWindow,
    options: LocatorOptions,
}

impl<'a> TableLocator<'a> {
    /// Bind a layout and window to an image.
    ///
    /// Fails fast on malformed configuration: zero stride, fields past the
    /// stride, window ranges naming unknown fields, or a zero minimum run.
    pub fn new(
        rom: &'a [u8],
        layout: &'a RecordLayout,
        window: &PlausibilityWindow,
        options: LocatorOptions,
    ) -> Result<Self> {
        layout.validate()?;
        let window = window.compile(layout)?;
        if window.is_empty() {
            warn!(
                "Plausibility window for '{}' is empty; every position will match",
                layout.name
            );
        }
        if options.min_run == 0 {
            return Err(Error::InvalidConfig("min_run must be at least 1".to_string()));
        }

        Ok(Self {
            rom,
            layout,
            window,
            options,
        })
    }

    pub fn layout(&self) -> &RecordLayout {
        self.layout
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    fn stride(&self) -> usize {
        self.layout.stride
    }

    /// Whether a full, plausible record starts at `offset`.
    pub fn is_plausible_at(&self, offset: usize) -> bool {
        let Some(end) = offset.checked_add(self.stride()) else {
            return false;
        };
        match self.rom.get(offset..end) {
            Some(bytes) => self.window.accepts(bytes),
            None => false,
        }
    }

    /// Decode the record at `offset` without judging it.
    pub fn record_at(&self, offset: usize) -> Option<Record> {
        decode(self.rom.get(offset..)?, self.layout).ok()
    }

    /// Number of consecutive plausible records at stride spacing from `offset`.
    pub fn run_length(&self, offset: usize) -> usize {
        let cap = self.options.max_records.unwrap_or(usize::MAX);
        let mut count = 0;
        let mut position = offset;

        while count < cap && self.is_plausible_at(position) {
            count += 1;
            position = match position.checked_add(self.stride()) {
                Some(next) => next,
                None => break,
            };
        }

        count
    }

    /// Confirm that a table starts at `candidate_offset`.
    ///
    /// The bounds check happens before any field is decoded.
    pub fn confirm_table(&self, candidate_offset: usize) -> std::result::Result<RecordTable, LocateError> {
        let fits = candidate_offset
            .checked_add(self.stride())
            .is_some_and(|end| end <= self.rom.len());
        if !fits {
            return Err(LocateError::OutOfBounds {
                offset: candidate_offset,
                stride: self.stride(),
                image_len: self.rom.len(),
            });
        }

        let count = self.run_length(candidate_offset);
        debug!(
            "Confirm '{}' at 0x{:X}: {} plausible record(s)",
            self.layout.name, candidate_offset, count
        );

        if count == 0 {
            return Err(LocateError::EmptyTable {
                offset: candidate_offset,
            });
        }
        if count < self.options.min_run {
            return Err(LocateError::RunTooShort {
                offset: candidate_offset,
                found: count,
                required: self.options.min_run,
            });
        }

        Ok(RecordTable {
            start_offset: candidate_offset,
            stride: self.stride(),
            count,
        })
    }

    /// Lazily yield every plausible position in `range`, byte by byte.
    pub fn scan_candidates(&self, range: SearchRange) -> Candidates<'_, 'a> {
        self.candidates_in(range, None)
    }

    /// Like [`scan_candidates`](Self::scan_candidates), stopping early once
    /// `cancel` is triggered.
    pub fn scan_candidates_until(&self, range: SearchRange, cancel: &CancelToken) -> Candidates<'_, 'a> {
        self.candidates_in(range, Some(cancel.clone()))
    }

    fn candidates_in(&self, range: SearchRange, cancel: Option<CancelToken>) -> Candidates<'_, 'a> {
        // last position a whole record fits at, plus one
        let limit = (self.rom.len() + 1).saturating_sub(self.stride());
        let end = range.end.min(limit);
        let start = range.start.min(end);

        Candidates {
            locator: self,
            next: start,
            end,
            cancel,
            positions_scanned: 0,
            cancelled: false,
        }
    }

    /// Discover and rank candidate table starts.
    pub fn rank_candidates(&self, range: SearchRange, cancel: Option<&CancelToken>) -> ScanReport {
        let mut candidates = self.candidates_in(range, cancel.cloned());
        let mut report = ScanReport::default();

        for candidate in candidates.by_ref() {
            report.candidates.push(self.rank(candidate));
        }
        report.positions_scanned = candidates.positions_scanned();
        report.cancelled = candidates.was_cancelled();
        report.sort();

        debug!(
            "Ranked {} candidate(s) for '{}' over {} position(s), {} likely",
            report.candidates.len(),
            self.layout.name,
            report.positions_scanned,
            report.likely().count()
        );
        report
    }

    /// Same ranking as [`rank_candidates`](Self::rank_candidates), with the
    /// range split across `workers` scoped threads.
    pub fn rank_candidates_parallel(
        &self,
        range: SearchRange,
        workers: usize,
        cancel: Option<&CancelToken>,
    ) -> ScanReport {
        let limit = (self.rom.len() + 1).saturating_sub(self.stride());
        let end = range.end.min(limit);
        let start = range.start.min(end);
        let total = end - start;

        if workers <= 1 || total < workers {
            return self.rank_candidates(range, cancel);
        }

        let chunk = total.div_ceil(workers);
        let partials: Vec<ScanReport> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|i| {
                    let sub = SearchRange {
                        start: start + i * chunk,
                        end: (start + (i + 1) * chunk).min(end),
                    };
                    scope.spawn(move || {
                        let mut candidates = self.candidates_in(sub, cancel.cloned());
                        let mut partial = ScanReport::default();
                        for candidate in candidates.by_ref() {
                            partial.candidates.push(self.rank(candidate));
                        }
                        partial.positions_scanned = candidates.positions_scanned();
                        partial.cancelled = candidates.was_cancelled();
                        partial
                    })
                })
                .collect();

            join_all(handles)
        });

        let mut report = ScanReport::default();
        for partial in partials {
            report.candidates.extend(partial.candidates);
            report.positions_scanned += partial.positions_scanned;
            report.cancelled |= partial.cancelled;
        }
        report.sort();
        report
    }

    fn rank(&self, candidate: CandidateOffset) -> RankedCandidate {
        let run_length = self.run_length(candidate.offset);
        RankedCandidate {
            offset: candidate.offset,
            record: candidate.record,
            run_length,
            likely_table_start: run_length > self.options.confirm_steps,
        }
    }
}

/// Join every worker in order, re-raising the first worker panic.
fn join_all<T>(handles: Vec<ScopedJoinHandle<'_, T>>) -> Vec<T> {
    handles
        .into_iter()
        .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
        .collect()
}

/// Lazy, finite sequence of plausible positions. Call the scan again for a
/// fresh sequence; the output is deterministic.
pub struct Candidates<'l, 'a> {
    locator: &'l TableLocator<'a>,
    next: usize,
    end: usize,
    cancel: Option<CancelToken>,
    positions_scanned: usize,
    cancelled: bool,
}

impl Candidates<'_, '_> {
    pub fn positions_scanned(&self) -> usize {
        self.positions_scanned
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Iterator for Candidates<'_, '_> {
    type Item = CandidateOffset;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                self.cancelled = true;
                self.next = self.end;
                return None;
            }

            let offset = self.next;
            self.next += 1;
            self.positions_scanned += 1;

            if !self.locator.is_plausible_at(offset) {
                continue;
            }
            if let Some(record) = self.locator.record_at(offset) {
                return Some(CandidateOffset { offset, record });
            }
        }
        None
    }
}
