//! Failure taxonomy shared by every tool.
//!
//! Internal helpers return `Result<_, ToolError>` and propagate with `?`.
//! At the operation boundary the error is flattened into
//! [`ToolResult::Error`] via `From`, so nothing escapes to the caller.

use std::io;

use thiserror::Error;

use crate::tools::result::ToolResult;

/// Every way a tool call can fail.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested file path does not exist (read only).
    #[error("File not found.")]
    NotFound,

    /// The child process outlived its deadline and was killed.
    #[error("{label} scan timed out after {seconds} seconds.")]
    Timeout { label: String, seconds: u64 },

    /// The executable could not be started (missing, not executable, ...).
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Any other OS-level failure while talking to a process or the filesystem.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Arguments were rejected before anything was spawned or touched.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        ToolResult::error(err.to_string())
    }
}
