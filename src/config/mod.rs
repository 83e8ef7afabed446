// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::io::CONFIG_FILE;
pub use self::types::{Config, DecompileConfig, OpstatToml, RunConfig, ToolConfig};
use crate::error::Result;
use std::path::Path;

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `explicit` if given, otherwise `opstat.toml` from the current
    /// directory when present. Defaults are used when no file exists.
    ///
    /// # Errors
    /// Returns error if an explicit file is missing or any file is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::new();
        match explicit {
            Some(path) => io::load_file(&mut config, path)?,
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.is_file() {
                    io::load_file(&mut config, local)?;
                }
            }
        }
        Ok(config)
    }

    pub fn parse_toml(&mut self, content: &str) -> Result<()> {
        let parsed = io::parse_toml(content)?;
        io::apply_toml(self, parsed);
        Ok(())
    }

    /// Effective worker count; `0` resolves to the number of CPUs.
    #[must_use]
    pub fn jobs(&self) -> usize {
        if self.run.jobs == 0 {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            self.run.jobs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Format;

    #[test]
    fn defaults_match_truth_tools() {
        let c = Config::new();
        assert_eq!(c.tools.for_format(Format::Anm), "truanm");
        assert_eq!(c.tools.for_format(Format::Msg), "trumsg");
        assert_eq!(c.tools.for_format(Format::Std), "trustd");
        assert_eq!(c.tools.for_format(Format::End), "trumsg");
        assert_eq!(c.decompile.map_env, "TRUTH_MAP_PATH");
        assert_eq!(c.run.jobs, 0);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let mut c = Config::new();
        c.parse_toml("[tools]\nanm = \"/opt/truth/truanm\"\n[run]\njobs = 3").unwrap();
        assert_eq!(c.tools.anm, "/opt/truth/truanm");
        assert_eq!(c.tools.std, "trustd");
        assert_eq!(c.jobs(), 3);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut c = Config::new();
        assert!(c.parse_toml("[run]\njobs = \"many\"").is_err());
    }

    #[test]
    fn zero_jobs_resolves_to_at_least_one() {
        assert!(Config::new().jobs() >= 1);
    }
}
