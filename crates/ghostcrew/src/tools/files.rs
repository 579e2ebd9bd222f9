//! File Accessor: one read or one write per call.
//!
//! Paths are used exactly as supplied. There is no working-directory root,
//! no traversal check and no atomic rename; concurrent calls on the same
//! path may race and that is left to the caller.

use std::io::ErrorKind;

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use crate::ToolDef;
use crate::error::ToolError;
use crate::tools::core::{Tool, ToolFuture, parse_tool_args};
use crate::tools::names;
use crate::tools::result::ToolResult;
use crate::tools::spec::ToolSpec;

/// Typed arguments for `read_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileArgs {
    /// Path of the file to read (e.g. '/etc/hosts', 'loot/creds.txt').
    pub file_path: String,
}

/// Typed arguments for `write_file`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteFileArgs {
    /// Path of the file to create or overwrite.
    pub file_path: String,
    /// Full text content to write.
    pub content: String,
}

/// Read a whole file as text.
///
/// A missing path yields `"File not found."`; every other failure (a
/// directory, permissions, invalid UTF-8) yields the OS error text.
pub async fn read_file(path: &str) -> ToolResult {
    match read_to_string(path).await {
        Ok(content) => ToolResult::success(content),
        Err(err) => err.into(),
    }
}

/// Create or truncate `path` and write `content` in full.
pub async fn write_file(path: &str, content: &str) -> ToolResult {
    match fs::write(path, content).await {
        Ok(()) => {
            debug!(path, bytes = content.len(), "wrote file");
            ToolResult::success(format!("Successfully wrote to {path}"))
        }
        Err(err) => ToolError::Io(err).into(),
    }
}

async fn read_to_string(path: &str) -> Result<String, ToolError> {
    let content = fs::read_to_string(path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => ToolError::NotFound,
        _ => ToolError::Io(err),
    })?;
    debug!(path, bytes = content.len(), "read file");
    Ok(content)
}

// ── ReadFile ────────────────────────────────────────────────────────

/// `read_file` tool.
pub struct ReadFile;

impl Tool for ReadFile {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::READ_FILE)
            .purpose("Read a file from the local filesystem and return its contents")
            .when_to_use(
                "When you need the contents of a file whose path you know: \
                 configuration, wordlists, saved scan output, gathered data",
            )
            .when_not_to_use("When you want to create or change a file, use write_file instead")
            .parameters_for::<ReadFileArgs>()
            .example(
                "read_file(file_path='/etc/hosts')",
                r#"{"status":"success","output":"127.0.0.1 localhost\n..."}"#,
            )
            .example(
                "read_file(file_path='/missing.txt')",
                r#"{"status":"error","message":"File not found."}"#,
            )
            .output_format("Full file text in 'output', or an error 'message'")
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            match parse_tool_args::<ReadFileArgs>(&arguments) {
                Ok(args) => read_file(&args.file_path).await,
                Err(error) => error,
            }
        })
    }
}

// ── WriteFile ───────────────────────────────────────────────────────

/// `write_file` tool.
pub struct WriteFile;

impl Tool for WriteFile {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(names::WRITE_FILE)
            .purpose("Write text to a file, creating it or replacing its contents")
            .when_to_use("When you need to save notes, scan results, scripts or payload files")
            .when_not_to_use("When you only need to look at a file, use read_file instead")
            .parameters_for::<WriteFileArgs>()
            .example(
                "write_file(file_path='notes.txt', content='22/tcp open ssh')",
                r#"{"status":"success","output":"Successfully wrote to notes.txt"}"#,
            )
            .output_format("Confirmation naming the path in 'output', or an error 'message'")
            .to_tool_def()
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            match parse_tool_args::<WriteFileArgs>(&arguments) {
                Ok(args) => write_file(&args.file_path, &args.content).await,
                Err(error) => error,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn read_missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(&path_in(&dir, "nope.txt")).await;
        assert_eq!(result, ToolResult::error("File not found."));
    }

    #[tokio::test]
    async fn read_returns_exact_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "hosts");
        std::fs::write(&path, "10.0.0.1\n10.0.0.2\n\n  trailing  ").unwrap();

        let result = read_file(&path).await;
        assert_eq!(result, ToolResult::success("10.0.0.1\n10.0.0.2\n\n  trailing  "));
    }

    #[tokio::test]
    async fn read_directory_is_a_generic_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(&dir.path().to_string_lossy()).await;
        let message = result.message().unwrap();
        assert_ne!(message, "File not found.");
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "out.txt");

        let written = write_file(&path, "line one\nline two").await;
        assert_eq!(
            written,
            ToolResult::success(format!("Successfully wrote to {path}"))
        );
        assert_eq!(
            read_file(&path).await,
            ToolResult::success("line one\nline two")
        );
    }

    #[tokio::test]
    async fn write_truncates_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "out.txt");
        std::fs::write(&path, "a much longer original body").unwrap();

        write_file(&path, "short").await;
        write_file(&path, "short").await;
        assert_eq!(read_file(&path).await, ToolResult::success("short"));
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "no/such/dir/out.txt");
        let result = write_file(&path, "x").await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn tools_dispatch_through_json_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "via_tool.txt");
        let args = serde_json::json!({ "file_path": path, "content": "hello" }).to_string();

        let written = WriteFile.execute(&args).await;
        assert!(written.output().unwrap().contains(&path));

        let args = serde_json::json!({ "file_path": path }).to_string();
        assert_eq!(ReadFile.execute(&args).await, ToolResult::success("hello"));
    }

    #[tokio::test]
    async fn read_file_requires_file_path() {
        let result = ReadFile.execute("{}").await;
        assert!(result.message().unwrap().contains("file_path"));
    }

    #[test]
    fn schemas_mark_required_fields() {
        let read = crate::json_schema_for::<ReadFileArgs>();
        assert_eq!(read["required"], serde_json::json!(["file_path"]));

        let write = crate::json_schema_for::<WriteFileArgs>();
        let required = write["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("file_path")));
        assert!(required.contains(&serde_json::json!("content")));
    }
}
