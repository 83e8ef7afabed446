use crate::reporting::Encoding;
use crate::types::Format;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "opstat",
    version,
    about = "Opcode and register usage statistics across game versions"
)]
pub struct Cli {
    /// Corpus root containing one directory per game. Defaults to cwd.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// Formats to gather. Defaults to all of them.
    #[arg(value_enum, value_name = "FORMAT")]
    pub formats: Vec<Format>,
    /// Minified output with filenames interned into a table
    #[arg(long)]
    pub compressed: bool,
    /// Concurrent decompiler processes (0 = one per CPU)
    #[arg(long, short)]
    pub jobs: Option<usize>,
    /// Settings file. Defaults to ./opstat.toml when present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print every file and a per-format summary to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Requested formats without duplicates, or all formats if none were given.
    #[must_use]
    pub fn formats(&self) -> Vec<Format> {
        if self.formats.is_empty() {
            return Format::ALL.to_vec();
        }
        let mut out: Vec<Format> = Vec::with_capacity(self.formats.len());
        for &f in &self.formats {
            if !out.contains(&f) {
                out.push(f);
            }
        }
        out
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        if self.compressed {
            Encoding::Compact
        } else {
            Encoding::Pretty
        }
    }
}
