//! External decompiler invocation.
//!
//! Each input file is turned into text by the toolchain executable mapped
//! from its format. Any failure is fatal for the caller.

mod runner;

use crate::config::{Config, DecompileConfig, ToolConfig};
use crate::error::Result;
use crate::types::{Format, Location};

pub use runner::{capture_stdout, Invocation};

/// Flag keeping intrinsic sugar expanded into raw instruction tokens.
pub const NO_INTRINSICS_FLAG: &str = "--no-intrinsics";
/// Flag for formats the tool has no instruction signatures for.
pub const NO_ARGUMENTS_FLAG: &str = "--no-arguments";

/// Something that can turn one input file into decompiled text.
pub trait Decompile: Sync {
    /// Returns the decompiled source for `location`.
    ///
    /// # Errors
    /// Returns error if the file cannot be decompiled.
    fn decompile(&self, location: &Location) -> Result<String>;
}

/// Runs the configured toolchain executables.
#[derive(Debug, Clone, Default)]
pub struct Decompiler {
    tools: ToolConfig,
    options: DecompileConfig,
}

impl Decompiler {
    #[must_use]
    pub fn new(tools: ToolConfig, options: DecompileConfig) -> Self {
        Self { tools, options }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tools.clone(), config.decompile.clone())
    }

    /// Builds the command line for `location` without running it.
    #[must_use]
    pub fn invocation(&self, location: &Location) -> Invocation {
        let mut args = vec![
            "decomp".to_string(),
            "--game".to_string(),
            location.game.clone(),
            mode_flag(location.format).to_string(),
        ];
        args.extend(self.options.extra_args.iter().cloned());
        args.push(location.path.to_string_lossy().into_owned());

        Invocation {
            program: self.tools.for_format(location.format).to_string(),
            args,
            env: vec![(self.options.map_env.clone(), String::new())],
            path: location.path.clone(),
        }
    }
}

impl Decompile for Decompiler {
    fn decompile(&self, location: &Location) -> Result<String> {
        capture_stdout(&self.invocation(location))
    }
}

fn mode_flag(format: Format) -> &'static str {
    if format.has_signatures() {
        NO_INTRINSICS_FLAG
    } else {
        NO_ARGUMENTS_FLAG
    }
}
