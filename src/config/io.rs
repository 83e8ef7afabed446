use super::types::{Config, OpstatToml};
use crate::error::{OpstatError, Result};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "opstat.toml";

/// Parses `opstat.toml` content.
///
/// # Errors
/// Returns [`OpstatError::Config`] on malformed TOML or unknown value types.
pub fn parse_toml(content: &str) -> Result<OpstatToml> {
    toml::from_str(content).map_err(|e| OpstatError::Config(e.to_string()))
}

pub fn apply_toml(config: &mut Config, parsed: OpstatToml) {
    config.tools = parsed.tools;
    config.decompile = parsed.decompile;
    config.run = parsed.run;
}

/// Loads settings from `path` into `config`.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_file(config: &mut Config, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|source| OpstatError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    let parsed = parse_toml(&content).map_err(|e| match e {
        OpstatError::Config(msg) => OpstatError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    apply_toml(config, parsed);
    Ok(())
}
