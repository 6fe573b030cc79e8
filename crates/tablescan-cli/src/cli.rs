//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tablescan_core::{Console, ExportKind};

use crate::commands::hex_utils::{parse_hex_u16, parse_offset};

#[derive(Parser)]
#[command(name = "tablescan")]
#[command(version, about = "Locate, decode and remap record tables in ROM images")]
pub struct Args {
    /// TOML config file
    #[arg(short, long, global = true, env = "TABLESCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Console bank layout for headerless images (nes, snes-lorom)
    #[arg(long, global = true)]
    pub console: Option<Console>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert between bank/CPU addresses and file offsets
    Map {
        /// Bank number
        #[arg(short, long)]
        bank: Option<u32>,

        /// CPU address in hex ($A2A2, 0xA2A2 or A2A2)
        #[arg(short, long, value_parser = parse_hex_u16)]
        address: Option<u16>,

        /// File offset in hex; converts the other way
        #[arg(short, long, value_parser = parse_offset, conflicts_with_all = ["bank", "address"])]
        offset: Option<usize>,

        /// Container header size in bytes (defaults to the console's)
        #[arg(long)]
        header_size: Option<u32>,
    },

    /// Show the container header of an image
    Header {
        rom: PathBuf,
    },

    /// Discover and rank candidate table starts
    Scan {
        rom: PathBuf,

        /// First offset to test (hex)
        #[arg(long, value_parser = parse_offset)]
        start: Option<usize>,

        /// End of the search range, exclusive (hex)
        #[arg(long, value_parser = parse_offset)]
        end: Option<usize>,

        /// Candidates to print
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Worker threads
        #[arg(short, long, default_value = "1")]
        workers: usize,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Confirm the table at the configured (or given) offset
    Confirm {
        rom: PathBuf,

        /// Table start (hex); overrides the config
        #[arg(short, long, value_parser = parse_offset)]
        offset: Option<usize>,

        /// Search around the expected start when confirmation fails
        #[arg(long)]
        fallback: bool,

        /// Minimum records required
        #[arg(long)]
        min_run: Option<usize>,

        /// Print the decoded table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Confirm, remap and write the destination table
    Export {
        rom: PathBuf,

        /// Table start (hex); overrides the config
        #[arg(long, value_parser = parse_offset)]
        offset: Option<usize>,

        /// Search around the expected start when confirmation fails
        #[arg(long)]
        fallback: bool,

        /// Output format (pasm, json, bin)
        #[arg(short, long, default_value = "pasm")]
        format: ExportKind,

        /// Output file (defaults to <output_dir>/monsters.<ext>)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,

        /// Maximum records to export
        #[arg(long)]
        max_records: Option<usize>,
    },

    /// Read destination-layout records back out of a built image
    Verify {
        image: PathBuf,

        /// Table start (hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: usize,

        /// Maximum records to read
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hex/ASCII dump of image bytes
    Hexdump {
        rom: PathBuf,

        /// Start offset (hex)
        #[arg(short, long, value_parser = parse_offset)]
        offset: usize,

        /// Number of bytes
        #[arg(short, long, default_value = "256")]
        size: usize,

        /// Hide the ASCII column
        #[arg(long)]
        no_ascii: bool,
    },
}
