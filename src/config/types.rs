use crate::types::Format;
use serde::{Deserialize, Serialize};

/// Decompiler executable per format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_anm_tool")]
    pub anm: String,
    #[serde(default = "default_msg_tool")]
    pub msg: String,
    #[serde(default = "default_std_tool")]
    pub std: String,
    #[serde(default = "default_msg_tool")]
    pub end: String,
}

impl ToolConfig {
    #[must_use]
    pub fn for_format(&self, format: Format) -> &str {
        match format {
            Format::Anm => &self.anm,
            Format::Msg => &self.msg,
            Format::Std => &self.std,
            Format::End => &self.end,
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            anm: default_anm_tool(),
            msg: default_msg_tool(),
            std: default_std_tool(),
            end: default_msg_tool(),
        }
    }
}

fn default_anm_tool() -> String { "truanm".to_string() }
fn default_msg_tool() -> String { "trumsg".to_string() }
fn default_std_tool() -> String { "trustd".to_string() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompileConfig {
    /// Environment variable set to the empty string so the tool renames nothing.
    #[serde(default = "default_map_env")]
    pub map_env: String,
    /// Extra arguments placed right before the input path.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for DecompileConfig {
    fn default() -> Self {
        Self {
            map_env: default_map_env(),
            extra_args: Vec::new(),
        }
    }
}

fn default_map_env() -> String { "TRUTH_MAP_PATH".to_string() }

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Worker count for the decompile stage. 0 means one per CPU.
    #[serde(default)]
    pub jobs: usize,
}

/// Contents of `opstat.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpstatToml {
    #[serde(default)]
    pub tools: ToolConfig,
    #[serde(default)]
    pub decompile: DecompileConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Runtime configuration: file settings plus command-line switches.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tools: ToolConfig,
    pub decompile: DecompileConfig,
    pub run: RunConfig,
    pub verbose: bool,
}
