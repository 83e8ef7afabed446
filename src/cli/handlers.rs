//! Command handler for a statistics run.

use super::args::Cli;
use crate::config::Config;
use crate::decompile::Decompiler;
use crate::exit::OpstatExit;
use crate::reporting;
use crate::stats::{Assembler, CorpusResult, FormatStats};
use crate::types::Format;
use anyhow::{Context, Result};
use colored::Colorize;
use std::cell::Cell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[must_use]
pub fn get_root(dir: Option<&Path>) -> PathBuf {
    dir.map_or_else(
        || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        Path::to_path_buf,
    )
}

/// Builds the effective configuration: settings file first, then flags.
///
/// # Errors
/// Returns error if the settings file cannot be read or parsed.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    config.verbose = cli.verbose;
    if let Some(jobs) = cli.jobs {
        config.run.jobs = jobs;
    }
    Ok(config)
}

/// Runs the statistics pipeline and writes JSON to stdout.
///
/// # Errors
/// Returns error if configuration, the corpus walk, or any decompiler fails.
pub fn handle_stats(cli: &Cli) -> Result<OpstatExit> {
    let root = get_root(cli.dir.as_deref());
    if !root.is_dir() {
        eprintln!(
            "{} corpus root {} is not a directory",
            "error:".red().bold(),
            root.display()
        );
        return Ok(OpstatExit::InvalidInput);
    }

    let config = load_config(cli)?;
    let result = gather(&root, cli, &config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    reporting::write_json(&mut out, &result, cli.encoding())?;
    out.flush()?;
    Ok(OpstatExit::Success)
}

fn gather(root: &Path, cli: &Cli, config: &Config) -> Result<CorpusResult> {
    let formats = cli.formats();
    let assembler = Assembler::new(Decompiler::from_config(config), config.jobs());

    let result = if config.verbose {
        let started = Cell::new(Instant::now());
        let on_format = |format: Format, stats: &FormatStats| {
            reporting::print_summary(format, &stats.summary(), started.get().elapsed());
            started.set(Instant::now());
        };
        assembler.gather_with_progress(root, &formats, &reporting::print_location, &on_format)
    } else {
        assembler.gather(root, &formats)
    };

    result.with_context(|| format!("gathering statistics under {}", root.display()))
}
