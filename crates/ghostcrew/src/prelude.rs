//! Convenience re-exports, meant to be glob-imported:
//!
//! ```ignore
//! use ghostcrew::prelude::*;
//! ```

pub use crate::error::ToolError;
pub use crate::tools::spec::ToolSpec;
pub use crate::tools::{
    DEFAULT_TIMEOUT_SECS, FnTool, Invocation, ReadFile, Tool, ToolCall, ToolFuture, ToolResult,
    ToolSet, WriteFile, parse_tool_args,
};
pub use crate::{ToolDef, json_schema_for};
