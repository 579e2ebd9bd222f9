//! Tool abstractions and the built-in tools.
//!
//! # Submodules
//!
//! - [`result`]: [`ToolResult`], the `{status, output | message}` shape every
//!   tool returns.
//! - [`core`]: [`Tool`] trait, [`ToolSet`] dispatch, [`FnTool`].
//! - [`spec`]: [`ToolSpec`](spec::ToolSpec) builder for structured descriptions.
//! - [`process`]: [`Invocation`] and [`ScopedChild`](process::ScopedChild),
//!   the deadline-bounded external-process runner.
//! - [`files`]: the File Accessor tools, `read_file` and `write_file`.
//! - [`names`]: tool name constants.

pub mod core;
pub mod files;
pub mod names;
pub mod process;
pub mod result;
pub mod spec;

pub use self::core::{
    FnTool, Tool, ToolCall, ToolFuture, ToolSet, parse_tool_args, truncate_output,
};
pub use files::{ReadFile, WriteFile};
pub use process::{DEFAULT_TIMEOUT_SECS, Invocation};
pub use result::ToolResult;
