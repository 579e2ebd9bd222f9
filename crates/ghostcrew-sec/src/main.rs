//! Debugging CLI for the ghostcrew security tools.
//!
//! Exposes the same tool surface an agent sees: list the declarations, or
//! dispatch calls by name with JSON arguments and print the normalized
//! result. Executables and the default timeout come from the `GHOSTCREW_*`
//! environment variables, overridden by the flags below.
//!
//! # Examples
//!
//! ```sh
//! # Tool declarations as a JSON array
//! ghostcrew list
//!
//! # One call; exit code 0 on success, 1 on error
//! ghostcrew call nmap_scan --args '{"target": "10.0.0.5"}'
//! echo '{"file_path": "notes.txt"}' | ghostcrew call read_file --stdin
//!
//! # Several independent calls, run concurrently
//! ghostcrew batch < calls.json
//! ```

use std::io::Read;

use clap::{Parser, Subcommand};
use ghostcrew::tools::core::{ToolCall, ToolSet};
use ghostcrew_sec::SecurityToolsConfig;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run ghostcrew security tools from the command line.
#[derive(Parser)]
#[command(name = "ghostcrew", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// nmap executable.
    #[arg(long, global = true)]
    nmap: Option<String>,

    /// sqlmap executable.
    #[arg(long, global = true)]
    sqlmap: Option<String>,

    /// ffuf executable.
    #[arg(long, global = true)]
    ffuf: Option<String>,

    /// msfconsole executable.
    #[arg(long, global = true)]
    msfconsole: Option<String>,

    /// Timeout in seconds for calls that do not pass one.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Validate arguments against each tool's JSON Schema before running it.
    #[arg(long, global = true)]
    validate_args: bool,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print every tool declaration as a JSON array.
    List,
    /// Run one tool and print its result.
    Call {
        /// Tool name, e.g. `nmap_scan`.
        tool: String,
        /// JSON arguments object.
        #[arg(long, conflicts_with = "stdin")]
        args: Option<String>,
        /// Read the JSON arguments object from stdin.
        #[arg(long)]
        stdin: bool,
    },
    /// Read a JSON array of `{"name", "arguments"}` calls from stdin, run
    /// them concurrently and print the results in order.
    Batch,
}

/// One entry of a `batch` request. `arguments` may be an object or a
/// pre-encoded JSON string.
#[derive(Deserialize)]
struct BatchCall {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

impl BatchCall {
    fn into_tool_call(self) -> ToolCall {
        let arguments = match self.arguments {
            serde_json::Value::Null => "{}".to_string(),
            serde_json::Value::String(raw) => raw,
            other => other.to_string(),
        };
        ToolCall::new(self.name, arguments)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let tools = build_tool_set(&cli);

    let code = match cli.command {
        Command::List => {
            print_json(&tools.definitions());
            0
        }
        Command::Call { tool, args, stdin } => {
            let arguments = match (args, stdin) {
                (Some(args), _) => args,
                (None, true) => read_stdin(),
                (None, false) => "{}".to_string(),
            };
            let result = tools.execute(&tool, &arguments).await;
            println!("{}", result.to_json());
            if result.is_success() { 0 } else { 1 }
        }
        Command::Batch => {
            let calls: Vec<BatchCall> = match serde_json::from_str(&read_stdin()) {
                Ok(calls) => calls,
                Err(e) => {
                    eprintln!("Error: batch input must be a JSON array of calls: {e}");
                    std::process::exit(2);
                }
            };
            let calls: Vec<ToolCall> = calls.into_iter().map(BatchCall::into_tool_call).collect();
            let results = tools.execute_all(&calls).await;
            print_json(&results);
            if results.iter().all(|r| r.is_success()) { 0 } else { 1 }
        }
    };

    std::process::exit(code);
}

fn build_tool_set(cli: &Cli) -> ToolSet {
    let mut config = SecurityToolsConfig::from_env();
    if let Some(nmap) = &cli.nmap {
        config = config.with_nmap(nmap);
    }
    if let Some(sqlmap) = &cli.sqlmap {
        config = config.with_sqlmap(sqlmap);
    }
    if let Some(ffuf) = &cli.ffuf {
        config = config.with_ffuf(ffuf);
    }
    if let Some(msfconsole) = &cli.msfconsole {
        config = config.with_msfconsole(msfconsole);
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_default_timeout(timeout);
    }
    config.build_tool_set().with_arg_validation(cli.validate_args)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_stdin() -> String {
    let mut buf = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
        eprintln!("Error: failed to read stdin: {e}");
        std::process::exit(2);
    }
    buf
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to encode output: {e}");
            std::process::exit(2);
        }
    }
}
