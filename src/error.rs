// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpstatError {
    #[error("decompiler `{tool}` could not be started: {source}")]
    ToolMissing {
        tool: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed on {path} (exit code {exit_code}){}", stderr_suffix(.stderr))]
    ToolFailed {
        command: String,
        path: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    #[error("decompiler `{tool}` produced non-UTF-8 output for {path}")]
    InvalidOutput { tool: String, path: PathBuf },

    #[error("Malformed token match: {0}")]
    MalformedToken(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl OpstatError {
    /// True for the failures that come from invoking the external decompiler.
    #[must_use]
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            Self::ToolMissing { .. } | Self::ToolFailed { .. } | Self::InvalidOutput { .. }
        )
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

pub type Result<T> = std::result::Result<T, OpstatError>;

// Allow `?` on std::io::Error by converting to OpstatError::Io with unknown path.
impl From<std::io::Error> for OpstatError {
    fn from(source: std::io::Error) -> Self {
        OpstatError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
