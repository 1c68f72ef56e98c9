use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "quick-reader",
    version,
    about = "Read text faster by flashing it a few words at a time.",
    long_about = None
)]
pub struct Cli {
    /// Words per minute (overrides the configuration)
    #[clap(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub wpm: Option<u32>,

    /// Words shown at once (overrides the configuration)
    #[clap(short = 'k', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the chunks and exit
    #[clap(short, long)]
    pub dump: bool,

    /// With --dump, print the chunks as JSON
    #[clap(long, requires = "dump")]
    pub json: bool,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Write log lines to FILE
    #[clap(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Text file to read, or "-" for stdin
    #[clap(name = "FILE")]
    pub file: Option<String>,
}
