//! Locator policy defaults
//!
//! # Run length
//!
//! A 27-byte window with six constrained fields is matched by random bytes
//! often enough that a ROM of a few hundred KB yields dozens of single-record
//! hits. Requiring the following records at stride spacing to match as well
//! multiplies that chance per step:
//!
//! ```text
//!   offset   +0        +27       +54       +81   ...
//!            [ rec 0 ] [ rec 1 ] [ rec 2 ] [ rec 3 ] ...
//!            single hit: p      run of k: ~p^k
//! ```

/// Records a confirmed table must contain unless the caller asks for more
pub const DEFAULT_MIN_RUN: usize = 1;

/// Further stride-spaced records that must be plausible before a discovery
/// candidate counts as a likely table start
pub const DEFAULT_CONFIRM_STEPS: usize = 5;

/// Record cap for walking the monster table
pub const DEFAULT_MAX_RECORDS: usize = 200;
