//! chd-cd CLI
//!
//! Inspect the CD-ROM / GD-ROM layer of CHD files: table of contents,
//! metadata entries and individual sectors.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use chd_cd::TrackType;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "chd-cd")]
#[command(about = "Inspect CD-ROM and GD-ROM CHD images", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table of contents
    Toc {
        /// CHD file to read
        file: PathBuf,

        /// Emit the TOC as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the metadata entries of a CHD file
    Meta {
        /// CHD file to read
        file: PathBuf,
    },

    /// Read sectors, as a hex dump or into a file
    Read {
        /// CHD file to read
        file: PathBuf,

        /// First sector to read
        sector: u32,

        /// Number of sectors to read
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,

        /// Sector format to return (e.g. mode1, mode2, mode1_raw); the
        /// track's stored format by default
        #[arg(short = 't', long = "type")]
        datatype: Option<TrackType>,

        /// Address sectors physically instead of logically
        #[arg(long)]
        physical: bool,

        /// Write sector data to this file instead of a hex dump
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Toc { file, json } => commands::toc::run_toc(&file, json),
        Commands::Meta { file } => commands::meta::run_meta(&file),
        Commands::Read {
            file,
            sector,
            count,
            datatype,
            physical,
            output,
        } => commands::read::run_read(
            &file,
            sector,
            count,
            chd_cd::ReadOptions {
                datatype,
                physical,
            },
            output.as_deref(),
        ),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn report(err: &CliError) {
    eprintln!(
        "{} {}",
        "\u{2718}".if_supports_color(Stderr, |t| t.red()),
        err,
    );
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
