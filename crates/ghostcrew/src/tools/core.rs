//! Tool abstraction and dispatch.
//!
//! The [`Tool`] trait pairs a static declaration ([`ToolDef`]) with an async
//! `execute` that takes the raw JSON arguments string the agent produced.
//! Tools are collected into a [`ToolSet`], which handles lookup by name,
//! optional schema validation, logging, and concurrent batches.

use crate::ToolDef;
use crate::tools::result::ToolResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, trace};

/// Boxed future returned by [`Tool::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = ToolResult> + Send + 'a>>;

// ── Tool trait ─────────────────────────────────────────────────────

/// A tool an agent can invoke via function-calling.
///
/// `execute` must never panic on bad input: malformed arguments, missing
/// files and failed processes are all reported as [`ToolResult::Error`].
///
/// # Example
///
/// ```ignore
/// struct Uptime;
///
/// impl Tool for Uptime {
///     fn definition(&self) -> ToolDef { /* ... */ }
///
///     fn execute(&self, _arguments: &str) -> ToolFuture<'_> {
///         Box::pin(async move {
///             Invocation::new("Uptime", "uptime").run().await
///         })
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The declaration handed to the agent runtime.
    fn definition(&self) -> ToolDef;

    /// Execute the tool with the given raw JSON arguments string.
    ///
    /// Uses a boxed future so that the trait is dyn-compatible.
    fn execute(&self, arguments: &str) -> ToolFuture<'_>;

    fn name(&self) -> String {
        self.definition().function.name
    }

    /// Whether the tool changes state outside the process (writes files,
    /// sends traffic to a target). Callers that run batches concurrently can
    /// use this to decide what to serialize. Defaults to `false`.
    fn is_mutation(&self) -> bool {
        false
    }
}

// ── ToolCall ───────────────────────────────────────────────────────

/// One requested invocation: a tool name plus its JSON arguments string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: String,
}

fn empty_arguments() -> String {
    "{}".into()
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

// ── ToolSet ────────────────────────────────────────────────────────

/// A collection of tools that can be dispatched by name.
///
/// # Example
///
/// ```ignore
/// let tools = ToolSet::new()
///     .with_file_tools()
///     .with_arg_validation(true)
///     .with(MyTool::new());
///
/// let defs = tools.definitions();
/// let result = tools.execute("read_file", r#"{"file_path": "notes.txt"}"#).await;
/// ```
pub struct ToolSet {
    tools: BTreeMap<String, Box<dyn Tool>>,
    /// Truncate successful output beyond this many bytes. `None` relays it unmodified.
    max_output_bytes: Option<usize>,
    /// Whether to validate tool arguments against JSON Schema before execution.
    validate_args: bool,
    /// Tool names that mutate state (populated from `Tool::is_mutation()`).
    mutation_tools: HashSet<String>,
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("max_output_bytes", &self.max_output_bytes)
            .field("validate_args", &self.validate_args)
            .finish()
    }
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            max_output_bytes: None,
            validate_args: false,
            mutation_tools: HashSet::new(),
        }
    }

    /// Cap successful output at `max` bytes, appending a truncation notice.
    pub fn with_max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = Some(max);
        self
    }

    /// Enable JSON Schema argument validation before tool execution.
    pub fn with_arg_validation(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name();
        if tool.is_mutation() {
            self.mutation_tools.insert(name.clone());
        } else {
            self.mutation_tools.remove(&name);
        }
        self.tools.insert(name, Box::new(tool));
    }

    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// Register `tool` only when `condition` holds, keeping the builder chain intact.
    pub fn with_if(self, condition: bool, tool: impl Tool + 'static) -> Self {
        if condition { self.with(tool) } else { self }
    }

    /// Register the File Accessor tools (`read_file`, `write_file`).
    pub fn with_file_tools(self) -> Self {
        use crate::tools::files::{ReadFile, WriteFile};
        self.with(ReadFile).with(WriteFile)
    }

    /// All declarations, ordered by tool name.
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn is_mutation_tool(&self, tool_name: &str) -> bool {
        self.mutation_tools.contains(tool_name)
    }

    /// Execute one tool call by name.
    ///
    /// Unknown names and (when enabled) schema violations come back as
    /// [`ToolResult::Error`] without touching the tool.
    pub async fn execute(&self, name: &str, arguments: &str) -> ToolResult {
        let Some(tool) = self.tools.get(name) else {
            return ToolResult::error(format!("unknown tool '{name}'"));
        };

        if self.validate_args
            && let Some(error) = validate_tool_arguments(tool.as_ref(), arguments)
        {
            return error;
        }

        log_tool_call(name, arguments);
        let start = std::time::Instant::now();

        let result = tool.execute(arguments).await;

        debug!(
            "Tool {name} finished in {:.0}ms ({}, {} bytes)",
            start.elapsed().as_secs_f64() * 1000.0,
            if result.is_success() { "success" } else { "error" },
            result.text().len()
        );
        trace!("Tool {name} result: {}", preview(result.text(), 300));

        match (result, self.max_output_bytes) {
            (ToolResult::Success { output }, Some(max)) => {
                ToolResult::success(truncate_output(output, max))
            }
            (result, _) => result,
        }
    }

    /// Execute independent calls concurrently.
    ///
    /// Results are returned in the same order as `calls`. No ordering is
    /// imposed between the calls themselves.
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        info!("Executing {} tool calls concurrently", calls.len());
        futures::future::join_all(
            calls
                .iter()
                .map(|call| self.execute(&call.name, &call.arguments)),
        )
        .await
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── FnTool ────────────────────────────────────────────────────────

/// Type-erased async handler for [`FnTool`].
type ErasedToolHandler =
    Box<dyn Fn(String) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> + Send + Sync>;

/// A closure-based tool: typed arguments in, [`ToolResult`] out.
///
/// The JSON arguments string is deserialized into `A` before the handler
/// runs; a parse failure short-circuits with an error result.
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// struct EchoArgs { text: String }
///
/// let echo = FnTool::new(
///     ToolDef::new("echo", "Echo text back", json_schema_for::<EchoArgs>()),
///     |args: EchoArgs| async move { ToolResult::success(args.text) },
/// );
/// ```
pub struct FnTool {
    def: ToolDef,
    handler: ErasedToolHandler,
    mutation: bool,
}

impl FnTool {
    pub fn new<A, F, Fut>(def: ToolDef, handler: F) -> Self
    where
        A: serde::de::DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        let erased = move |raw: String| -> Pin<Box<dyn Future<Output = ToolResult> + Send>> {
            match parse_tool_args::<A>(&raw) {
                Ok(args) => Box::pin(handler(args)),
                Err(error) => Box::pin(async move { error }),
            }
        };

        Self {
            def,
            handler: Box::new(erased),
            mutation: false,
        }
    }

    pub fn mutation(mut self, is_mutation: bool) -> Self {
        self.mutation = is_mutation;
        self
    }
}

impl Tool for FnTool {
    fn definition(&self) -> ToolDef {
        self.def.clone()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        (self.handler)(arguments.to_string())
    }

    fn is_mutation(&self) -> bool {
        self.mutation
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.def.function.name)
            .field("mutation", &self.mutation)
            .finish()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Parse raw JSON arguments into a typed struct, or an error result ready
/// to hand back from [`Tool::execute`].
pub fn parse_tool_args<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T, ToolResult> {
    serde_json::from_str(arguments)
        .map_err(|e| ToolResult::error(format!("invalid tool arguments: {e}")))
}

/// Validate arguments against the tool's declared JSON Schema.
///
/// Returns `None` when valid (or when the schema itself cannot be compiled).
pub fn validate_tool_arguments(tool: &dyn Tool, arguments: &str) -> Option<ToolResult> {
    let args_value: serde_json::Value = match serde_json::from_str(arguments) {
        Ok(v) => v,
        Err(e) => {
            return Some(ToolResult::error(format!(
                "invalid JSON arguments for tool '{}': {e}",
                tool.name()
            )));
        }
    };

    let schema = tool.definition().function.parameters;
    let Ok(validator) = jsonschema::validator_for(&schema) else {
        return None;
    };

    let errors: Vec<String> = validator
        .iter_errors(&args_value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(ToolResult::error(format!(
            "argument validation failed for tool '{}':\n{}",
            tool.name(),
            errors.join("\n")
        )))
    }
}

/// Log a tool call at INFO level with a truncated preview of arguments.
pub fn log_tool_call(name: &str, arguments: &str) {
    let args_preview = preview(arguments, 120);
    info!(
        "[tool] {name}({args_preview}{})",
        if args_preview.len() < arguments.len() { "..." } else { "" }
    );
    trace!("[tool] {name} arguments: {arguments}");
}

/// Truncate to at most `max` bytes (on a char boundary), noting the original size.
pub fn truncate_output(s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let cut = preview(&s, max);
    format!("{cut}...\n[truncated: {} bytes total]", s.len())
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn preview(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.get(..end).unwrap_or_default()
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_schema_for;
    use schemars::JsonSchema;

    #[derive(Deserialize, JsonSchema)]
    struct EchoArgs {
        text: String,
    }

    fn echo_tool() -> FnTool {
        FnTool::new(
            ToolDef::new("echo", "Echo the input", json_schema_for::<EchoArgs>()),
            |args: EchoArgs| async move { ToolResult::success(args.text) },
        )
    }

    struct FailTool;

    impl Tool for FailTool {
        fn definition(&self) -> ToolDef {
            ToolDef::new(
                "fail",
                "Always fails",
                serde_json::json!({"type": "object", "properties": {}}),
            )
        }

        fn execute(&self, _arguments: &str) -> ToolFuture<'_> {
            Box::pin(async { ToolResult::error("intentional failure") })
        }

        fn is_mutation(&self) -> bool {
            true
        }
    }

    #[test]
    fn toolset_register_and_definitions() {
        let set = ToolSet::new().with(echo_tool()).with(FailTool);
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["echo", "fail"]);
        assert!(set.is_mutation_tool("fail"));
        assert!(!set.is_mutation_tool("echo"));
    }

    #[tokio::test]
    async fn toolset_execute_known_tool() {
        let set = ToolSet::new().with(echo_tool());
        let result = set.execute("echo", r#"{"text": "hello"}"#).await;
        assert_eq!(result, ToolResult::success("hello"));
    }

    #[tokio::test]
    async fn toolset_execute_unknown_tool() {
        let set = ToolSet::new().with(echo_tool());
        let result = set.execute("nonexistent", "{}").await;
        assert_eq!(result, ToolResult::error("unknown tool 'nonexistent'"));
    }

    #[tokio::test]
    async fn fn_tool_reports_bad_arguments_as_error() {
        let set = ToolSet::new().with(echo_tool());
        let result = set.execute("echo", r#"{"wrong": 1}"#).await;
        let message = result.message().unwrap();
        assert!(message.starts_with("invalid tool arguments"), "got: {message}");
    }

    #[tokio::test]
    async fn validation_rejects_before_execution() {
        let set = ToolSet::new().with_arg_validation(true).with(echo_tool());
        let result = set.execute("echo", r#"{"text": 42}"#).await;
        let message = result.message().unwrap();
        assert!(
            message.contains("argument validation failed for tool 'echo'"),
            "got: {message}"
        );
    }

    #[tokio::test]
    async fn output_is_untouched_without_a_cap() {
        let long = "a".repeat(50_000);
        let set = ToolSet::new().with(echo_tool());
        let args = serde_json::json!({ "text": long }).to_string();
        let result = set.execute("echo", &args).await;
        assert_eq!(result.output().map(str::len), Some(50_000));
    }

    #[tokio::test]
    async fn output_cap_truncates_success_only() {
        let set = ToolSet::new()
            .with_max_output_bytes(10)
            .with(echo_tool())
            .with(FailTool);

        let args = serde_json::json!({ "text": "a".repeat(200) }).to_string();
        let result = set.execute("echo", &args).await;
        assert!(result.output().unwrap().contains("[truncated: 200 bytes total]"));

        let failed = set.execute("fail", "{}").await;
        assert_eq!(failed, ToolResult::error("intentional failure"));
    }

    #[tokio::test]
    async fn execute_all_preserves_call_order() {
        let set = ToolSet::new().with(echo_tool()).with(FailTool);
        let calls = vec![
            ToolCall::new("echo", r#"{"text": "one"}"#),
            ToolCall::new("fail", "{}"),
            ToolCall::new("echo", r#"{"text": "three"}"#),
        ];
        let results = set.execute_all(&calls).await;
        assert_eq!(
            results,
            vec![
                ToolResult::success("one"),
                ToolResult::error("intentional failure"),
                ToolResult::success("three"),
            ]
        );
    }

    #[test]
    fn tool_call_defaults_to_empty_arguments() {
        let call: ToolCall = serde_json::from_str(r#"{"name": "read_file"}"#).unwrap();
        assert_eq!(call.arguments, "{}");
    }

    #[test]
    fn with_if_false_skips_tool() {
        let set = ToolSet::new().with_if(false, echo_tool());
        assert!(set.is_empty());
    }

    #[test]
    fn with_file_tools_registers_both() {
        let set = ToolSet::new().with_file_tools();
        assert_eq!(set.names(), vec!["read_file", "write_file"]);
        assert!(set.is_mutation_tool("write_file"));
        assert!(!set.is_mutation_tool("read_file"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "é".repeat(10); // 2 bytes each
        let cut = truncate_output(s, 5);
        assert!(cut.starts_with("éé..."));
        assert!(cut.contains("[truncated: 20 bytes total]"));
    }
}
