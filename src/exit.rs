// src/exit.rs
//! Standardized process exit codes for `opstat`.
//!
//! Provides a stable contract for scripts and automation.

use crate::error::OpstatError;
use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum OpstatExit {
    /// Statistics were written.
    Success = 0,
    /// Generic error (IO, config, walking the corpus).
    Error = 1,
    /// A decompiler could not be started or exited non-zero.
    ToolFailed = 2,
    /// Bad arguments: unknown format or flag, missing corpus root.
    InvalidInput = 3,
}

impl OpstatExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Picks the exit code for a failed run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<OpstatError>() {
            Some(e) if e.is_tool_error() => Self::ToolFailed,
            _ => Self::Error,
        }
    }
}

impl Termination for OpstatExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
