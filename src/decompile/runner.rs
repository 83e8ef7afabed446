//! Command execution and output capture.

use crate::error::{OpstatError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A fully resolved decompiler command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Input file, for error reporting.
    pub path: PathBuf,
}

impl Invocation {
    /// Display form of the command line.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs `inv` to completion and returns its stdout as UTF-8.
///
/// The child's pipes are owned by [`Command::output`], so they are closed
/// and the process is reaped on every return path.
///
/// # Errors
/// [`OpstatError::ToolMissing`] if the program cannot be started,
/// [`OpstatError::ToolFailed`] on a non-zero exit,
/// [`OpstatError::InvalidOutput`] if stdout is not UTF-8.
pub fn capture_stdout(inv: &Invocation) -> Result<String> {
    let output = Command::new(&inv.program)
        .args(&inv.args)
        .envs(inv.env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .output()
        .map_err(|source| spawn_error(inv, source))?;

    if !output.status.success() {
        return Err(OpstatError::ToolFailed {
            command: inv.display(),
            path: inv.path.clone(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| OpstatError::InvalidOutput {
        tool: inv.program.clone(),
        path: inv.path.clone(),
    })
}

fn spawn_error(inv: &Invocation, source: std::io::Error) -> OpstatError {
    match source.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => OpstatError::ToolMissing {
            tool: inv.program.clone(),
            source,
        },
        _ => OpstatError::Io {
            source,
            path: inv.path.clone(),
        },
    }
}
