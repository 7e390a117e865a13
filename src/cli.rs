// CLI structure and argument parsing for the yaptools binary

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yaptools")]
#[command(about = "Natural sorting and logging helpers from the command line")]
#[command(
    long_about = "Natural sorting and logging helpers from the command line\n\nCOMMON EXAMPLES:\n  ls | yaptools sort\n  yaptools sort -r -u versions.txt\n  yaptools log -c logger.json -l warning 'disk almost full'\n  yaptools levels"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sort lines in natural order (img2 before img10)
    Sort(SortArgs),

    /// Log a message through a configured logger
    Log(LogArgs),

    /// List severity level names and values
    Levels,
}

#[derive(Args)]
pub struct SortArgs {
    /// Input files (stdin if not specified, or use "-" to explicitly specify stdin)
    pub files: Vec<String>,

    /// Print lines in descending order
    #[arg(short, long)]
    pub reverse: bool,

    /// Drop repeated lines, keeping the first occurrence
    #[arg(short, long)]
    pub unique: bool,
}

#[derive(Args)]
pub struct LogArgs {
    /// JSON logger configuration file (defaults to a single stderr sink)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Severity level, by name or number
    #[arg(short, long, default_value = "info")]
    pub level: String,

    /// Logger name, overriding the configuration
    #[arg(short, long)]
    pub name: Option<String>,

    /// Message to log; words are joined with spaces
    #[arg(required = true)]
    pub message: Vec<String>,
}
