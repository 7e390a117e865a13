use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process;

use yaptools::logger::{LevelSpec, LOGGING_LEVELS};
use yaptools::{alphanum_cmp, Logger, LoggerConfig};

mod cli;

use cli::{Cli, Command, LogArgs, SortArgs};

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

fn main() {
    // clap exits with status 2 on usage errors
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Sort(args) => run_sort(&args),
        Command::Log(args) => run_log(&args),
        Command::Levels => run_levels(),
    };

    match result {
        Ok(()) => ExitCode::Success.exit(),
        // A reader that stops early (`yaptools sort | head`) is a normal end of output
        Err(e) if is_broken_pipe(&e) => ExitCode::Success.exit(),
        Err(e) => {
            eprintln!("yaptools: error: {:#}", e);
            ExitCode::GeneralError.exit();
        }
    }
}

fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

fn read_lines(files: &[String]) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    if files.is_empty() {
        for line in io::stdin().lock().lines() {
            lines.push(line.context("Failed to read stdin")?);
        }
        return Ok(lines);
    }

    for path in files {
        if path == "-" {
            for line in io::stdin().lock().lines() {
                lines.push(line.context("Failed to read stdin")?);
            }
            continue;
        }
        let file = File::open(path).with_context(|| format!("Failed to open file: {}", path))?;
        for line in BufReader::new(file).lines() {
            lines.push(line.with_context(|| format!("Failed to read file: {}", path))?);
        }
    }

    Ok(lines)
}

fn run_sort(args: &SortArgs) -> Result<()> {
    let mut lines = read_lines(&args.files)?;

    if args.unique {
        let mut seen = HashSet::new();
        lines.retain(|line| seen.insert(line.clone()));
    }

    // Stable in both directions: equal keys keep their input order
    if args.reverse {
        lines.sort_by(|a, b| alphanum_cmp(b, a));
    } else {
        lines.sort_by(|a, b| alphanum_cmp(a, b));
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in &lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

fn parse_level_arg(level: &str) -> LevelSpec {
    match level.parse::<u32>() {
        Ok(value) => LevelSpec::Number(value),
        Err(_) => LevelSpec::Name(level.to_string()),
    }
}

fn run_log(args: &LogArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => LoggerConfig::load_from_path(path)?,
        None => LoggerConfig::default(),
    };
    if let Some(name) = &args.name {
        config.name = Some(name.clone());
    }

    // Unlike Logger::log, the command line rejects unknown level names.
    let level = parse_level_arg(&args.level).resolve()?;
    let logger = Logger::new(config).context("Failed to set up logger")?;
    logger.log(level, args.message.join(" "));
    Ok(())
}

fn run_levels() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (name, level) in LOGGING_LEVELS {
        writeln!(out, "{:<10}{}", name, level.value())?;
    }
    Ok(())
}
