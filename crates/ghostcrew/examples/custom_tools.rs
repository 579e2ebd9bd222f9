//! Custom tools example: wrap an external program with `FnTool` and `ToolSpec`.
//!
//! Demonstrates:
//! - Typed argument structs with `Deserialize` + `JsonSchema`
//! - Rich tool descriptions via `ToolSpec::builder()`
//! - Running a program under a deadline with `Invocation`
//! - Dispatching calls concurrently with `ToolSet::execute_all`
//!
//! # Usage
//!
//! ```bash
//! cargo run --example custom_tools
//! ```

use ghostcrew::prelude::*;
use ghostcrew::schemars;
use schemars::JsonSchema;
use serde::Deserialize;

// ── Typed argument structs ──────────────────────────────────────────

/// Arguments for the `dns_lookup` tool.
#[derive(Deserialize, JsonSchema)]
struct DnsLookupArgs {
    /// Host name to resolve.
    host: String,
    /// Seconds before the lookup is killed. Default: 10.
    #[serde(default)]
    timeout: Option<u64>,
}

// ── Tool constructors ───────────────────────────────────────────────

/// Resolve a host name with `getent hosts`.
fn dns_lookup_tool() -> FnTool {
    let def = ToolSpec::builder("dns_lookup")
        .purpose("Resolve a host name to its IP addresses")
        .when_to_use("When you have a host name and need the address to scan")
        .when_not_to_use("When you already have an IP address")
        .parameters_for::<DnsLookupArgs>()
        .example("dns_lookup(host='localhost')", "127.0.0.1 localhost")
        .output_format("Raw getent output, one address per line")
        .to_tool_def();

    FnTool::new(def, |args: DnsLookupArgs| async move {
        if args.host.starts_with('-') {
            return ToolResult::from(ToolError::InvalidArguments(
                "'host' must not start with '-'".into(),
            ));
        }
        Invocation::new("DNS", "getent")
            .arg("hosts")
            .arg(args.host)
            .timeout_secs(args.timeout.unwrap_or(10))
            .run()
            .await
    })
}

#[tokio::main]
async fn main() {
    let tools = ToolSet::new()
        .with_file_tools()
        .with_arg_validation(true)
        .with(dns_lookup_tool());

    for def in tools.definitions() {
        println!("── {} ──\n{}\n", def.function.name, def.function.description);
    }

    let calls = vec![
        ToolCall::new("dns_lookup", r#"{"host": "localhost"}"#),
        ToolCall::new("read_file", r#"{"file_path": "/etc/hostname"}"#),
        ToolCall::new("dns_lookup", r#"{}"#),
    ];
    for (call, result) in calls.iter().zip(tools.execute_all(&calls).await) {
        println!("{}({}) -> {}", call.name, call.arguments, result.to_json());
    }
}
