//! Agent-callable tools with a single normalized result shape.
//!
//! `ghostcrew` is the tool layer an agent runtime binds to. Every operation
//! (spawning an external program, reading a file, writing a file) returns the
//! same [`ToolResult`]: either `{"status": "success", "output": ...}` or
//! `{"status": "error", "message": ...}`. Callers never branch per tool.
//!
//! Each tool is two things:
//!
//! - a typed async function (`files::read_file`, `Invocation::run`, ...) that
//!   never fails, it always produces a [`ToolResult`];
//! - a [`ToolDef`] declaration (name, description, JSON Schema parameters) in
//!   the OpenAI function-calling shape, so any orchestrator can register it.
//!
//! The [`Tool`](tools::core::Tool) trait joins the two, and a
//! [`ToolSet`](tools::core::ToolSet) dispatches raw JSON tool calls by name.
//!
//! ```ignore
//! use ghostcrew::prelude::*;
//!
//! let tools = ToolSet::new().with_file_tools();
//! let defs = tools.definitions(); // hand these to the agent runtime
//!
//! let result = tools
//!     .execute("read_file", r#"{"file_path": "/etc/hostname"}"#)
//!     .await;
//! println!("{}", result.to_json());
//! ```
//!
//! Process-backed tools are built on [`Invocation`](tools::process::Invocation),
//! which enforces a wall-clock deadline and guarantees the child is killed
//! and reaped on every exit path.

pub mod error;
pub mod prelude;
pub mod tools;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::ToolError;
pub use tools::result::ToolResult;

// Re-export schemars for downstream crates.
pub use schemars;

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// This is how tool parameter schemas are produced: the argument struct the
/// tool deserializes into is also the source of its declared schema.
///
/// # Example
///
/// ```
/// use ghostcrew::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct ScanArgs {
///     target: String,
///     #[serde(default)]
///     timeout: Option<u64>,
/// }
///
/// let schema = json_schema_for::<ScanArgs>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"target".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Tool declarations ──────────────────────────────────────────────

/// The type of a tool definition. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// Out-of-band tool declaration (OpenAI function-calling format).
///
/// A plain data record: the orchestrator reads the name, description and
/// parameter schema and decides when to call the tool.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolDef {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: FunctionDef,
}

impl ToolDef {
    /// Create a function-calling tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: ToolType::Function,
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
