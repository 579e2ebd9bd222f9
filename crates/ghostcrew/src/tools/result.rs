//! The normalized result every tool returns.

use serde::{Deserialize, Serialize};

/// Outcome of one tool call.
///
/// Serialized with an internal `status` tag, so the wire shape is exactly
/// `{"status":"success","output":"..."}` or `{"status":"error","message":"..."}`.
/// The variant decides which field exists; there is no way to build a value
/// with both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult {
    Success { output: String },
    Error { message: String },
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self::Success {
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The `output` field, present only on success.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Success { output } => Some(output),
            Self::Error { .. } => None,
        }
    }

    /// The `message` field, present only on error.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }

    /// Whichever text field is populated.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { output } => output,
            Self::Error { message } => message,
        }
    }

    /// Compact JSON rendering for handing back to an agent runtime.
    pub fn to_json(&self) -> String {
        // A two-variant enum of strings always serializes.
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"status":"error","message":"serialization failed: {e}"}}"#)
        })
    }
}

impl std::fmt::Display for ToolResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
