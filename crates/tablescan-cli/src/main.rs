mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use config::TablescanConfig;

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tablescan=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let loaded = TablescanConfig::load_or_default(args.config.as_deref())?;
    let base = TablescanConfig::builder()
        .base(loaded)
        .console(args.console);

    match args.command {
        Command::Map {
            bank,
            address,
            offset,
            header_size,
        } => commands::map::run(&base.build(), bank, address, offset, header_size),
        Command::Header { rom } => commands::header::run(&rom),
        Command::Scan {
            rom,
            start,
            end,
            limit,
            workers,
            json,
        } => commands::scan::run(&base.build(), &rom, start, end, limit, workers, json),
        Command::Confirm {
            rom,
            offset,
            fallback,
            min_run,
            json,
        } => {
            let config = base.file_offset(offset).min_run(min_run).build();
            commands::confirm::run(&config, &rom, fallback, json)
        }
        Command::Export {
            rom,
            offset,
            fallback,
            format,
            output,
            max_records,
        } => {
            let config = base.file_offset(offset).max_records(max_records).build();
            commands::export::run(&config, &rom, fallback, format, output)
        }
        Command::Verify {
            image,
            offset,
            count,
            json,
        } => commands::verify::run(&base.build(), &image, offset, count, json),
        Command::Hexdump {
            rom,
            offset,
            size,
            no_ascii,
        } => commands::hexdump::run(&rom, offset, size, !no_ascii),
    }
}
