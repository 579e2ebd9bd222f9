//! Security scanner tools.
//!
//! Each wrapper builds a fixed argument vector for one external utility and
//! runs it through [`Invocation`], so all four share the same deadline,
//! kill-on-timeout and result normalization:
//!
//! | Tool | Name | Command |
//! |------|------|---------|
//! | [`NmapScan`] | `nmap_scan` | `nmap -F <target>` |
//! | [`SqlmapScan`] | `sqlmap_scan` | `sqlmap -u <url> --batch` |
//! | [`FfufScan`] | `ffuf_scan` | `ffuf -w <wordlist> -u <url>/FUZZ` |
//! | [`MetasploitScan`] | `metasploit_scan` | `msfconsole -q -x "use <module>; set RHOSTS <target>; <options>; run; exit"` |
//!
//! Required text arguments are checked before anything is spawned: they
//! must be non-empty and must not start with `-`, so a target can never be
//! read by the wrapped program as one of its own flags.

use ghostcrew::ToolDef;
use ghostcrew::error::ToolError;
use ghostcrew::tools::core::{Tool, ToolFuture, parse_tool_args};
use ghostcrew::tools::process::{DEFAULT_TIMEOUT_SECS, Invocation};
use ghostcrew::tools::result::ToolResult;
use ghostcrew::tools::spec::ToolSpec;
use schemars::JsonSchema;
use serde::Deserialize;

/// Placeholder ffuf substitutes with each wordlist entry.
pub const FUZZ_MARKER: &str = "FUZZ";

// ── Argument construction ───────────────────────────────────────────

fn require(field: &str, value: &str) -> Result<(), ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::InvalidArguments(format!(
            "'{field}' must not be empty"
        )));
    }
    if trimmed.starts_with('-') {
        return Err(ToolError::InvalidArguments(format!(
            "'{field}' must not start with '-'"
        )));
    }
    Ok(())
}

/// Console-command fields must stay a single msfconsole statement.
fn require_single_statement(field: &str, value: &str) -> Result<(), ToolError> {
    require(field, value)?;
    if value.contains([';', '\n', '\r']) {
        return Err(ToolError::InvalidArguments(format!(
            "'{field}' must not contain ';' or line breaks"
        )));
    }
    Ok(())
}

/// `-F <target>`: fast scan of the most common ports.
pub fn nmap_argv(target: &str) -> Result<Vec<String>, ToolError> {
    require("target", target)?;
    Ok(vec!["-F".into(), target.into()])
}

/// `-u <url> --batch`: never prompt for input.
pub fn sqlmap_argv(url: &str) -> Result<Vec<String>, ToolError> {
    require("url", url)?;
    Ok(vec!["-u".into(), url.into(), "--batch".into()])
}

/// `-w <wordlist> -u <url>/FUZZ`. A trailing `/` on the URL is not doubled.
pub fn ffuf_argv(url: &str, wordlist: &str) -> Result<Vec<String>, ToolError> {
    require("url", url)?;
    require("wordlist", wordlist)?;
    let base = url.strip_suffix('/').unwrap_or(url);
    Ok(vec![
        "-w".into(),
        wordlist.into(),
        "-u".into(),
        format!("{base}/{FUZZ_MARKER}"),
    ])
}

/// The msfconsole command string: select module, set RHOSTS, apply
/// options (skipped when blank), run, exit.
pub fn metasploit_command(target: &str, module: &str, options: &str) -> Result<String, ToolError> {
    require_single_statement("module", module)?;
    require_single_statement("target", target)?;

    let mut statements = vec![format!("use {module}"), format!("set RHOSTS {target}")];
    let options = options.trim();
    if !options.is_empty() {
        statements.push(options.to_string());
    }
    statements.push("run".into());
    statements.push("exit".into());
    Ok(statements.join("; "))
}

/// `-q -x <command>`: quiet banner, execute the composed command string.
pub fn metasploit_argv(target: &str, module: &str, options: &str) -> Result<Vec<String>, ToolError> {
    let command = metasploit_command(target, module, options)?;
    Ok(vec!["-q".into(), "-x".into(), command])
}

async fn launch(
    label: &str,
    program: &str,
    argv: Result<Vec<String>, ToolError>,
    timeout_secs: u64,
) -> ToolResult {
    match argv {
        Ok(argv) => {
            Invocation::new(label, program)
                .args(argv)
                .timeout_secs(timeout_secs)
                .run()
                .await
        }
        Err(err) => err.into(),
    }
}

// ── NmapScan ────────────────────────────────────────────────────────

/// Arguments for `nmap_scan`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NmapScanArgs {
    /// Host name, IP address, or CIDR range to scan (e.g. '10.0.0.0/24').
    pub target: String,
    /// Seconds before the scan is killed. Default: 60.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Fast port scan (`nmap -F`).
pub struct NmapScan {
    program: String,
    default_timeout_secs: u64,
}

impl NmapScan {
    pub const LABEL: &'static str = "Nmap";

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    pub async fn scan(&self, args: NmapScanArgs) -> ToolResult {
        let timeout = args.timeout.unwrap_or(self.default_timeout_secs);
        launch(Self::LABEL, &self.program, nmap_argv(&args.target), timeout).await
    }
}

impl Tool for NmapScan {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::NMAP_SCAN)
            .purpose("Perform a fast Nmap port scan on a given target")
            .when_to_use(
                "When you need to discover live hosts or which common ports and services \
                 are open on a host or network range",
            )
            .when_not_to_use(
                "When testing a specific web URL, use sqlmap_scan or ffuf_scan instead",
            )
            .parameters_for::<NmapScanArgs>()
            .example(
                "nmap_scan(target='scanme.nmap.org')",
                "Raw nmap report listing open ports",
            )
            .output_format("Raw nmap stdout in 'output', or an error 'message'")
            .disambiguate(
                "Running an exploit or auxiliary module against the host",
                super::METASPLOIT_SCAN,
                "nmap only enumerates ports",
            )
            .to_tool_def()
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            match parse_tool_args::<NmapScanArgs>(&arguments) {
                Ok(args) => self.scan(args).await,
                Err(error) => error,
            }
        })
    }
}

// ── SqlmapScan ──────────────────────────────────────────────────────

/// Arguments for `sqlmap_scan`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SqlmapScanArgs {
    /// Target URL including the parameters to test
    /// (e.g. 'http://testphp.vulnweb.com/listproducts.php?cat=1').
    pub url: String,
    /// Seconds before the scan is killed. Default: 60.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Non-interactive SQL-injection test (`sqlmap --batch`).
pub struct SqlmapScan {
    program: String,
    default_timeout_secs: u64,
}

impl SqlmapScan {
    pub const LABEL: &'static str = "SQLmap";

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    pub async fn scan(&self, args: SqlmapScanArgs) -> ToolResult {
        let timeout = args.timeout.unwrap_or(self.default_timeout_secs);
        launch(Self::LABEL, &self.program, sqlmap_argv(&args.url), timeout).await
    }
}

impl Tool for SqlmapScan {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::SQLMAP_SCAN)
            .purpose("Perform an SQLmap SQL-injection scan on a given target URL")
            .when_to_use("When you need to test URL parameters for SQL injection")
            .when_not_to_use(
                "When you want to discover hidden paths, use ffuf_scan. \
                 When you want to find open ports, use nmap_scan",
            )
            .parameters_for::<SqlmapScanArgs>()
            .example(
                "sqlmap_scan(url='http://testphp.vulnweb.com/listproducts.php?cat=1')",
                "Raw sqlmap log with injection findings",
            )
            .output_format("Raw sqlmap stdout in 'output', or an error 'message'")
            .to_tool_def()
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            match parse_tool_args::<SqlmapScanArgs>(&arguments) {
                Ok(args) => self.scan(args).await,
                Err(error) => error,
            }
        })
    }
}

// ── FfufScan ────────────────────────────────────────────────────────

/// Arguments for `ffuf_scan`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FfufScanArgs {
    /// Base URL to fuzz; '/FUZZ' is appended (e.g. 'http://example.com').
    pub url: String,
    /// Path to the wordlist file on this machine.
    pub wordlist: String,
    /// Seconds before the scan is killed. Default: 60.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Web content discovery (`ffuf`).
pub struct FfufScan {
    program: String,
    default_timeout_secs: u64,
}

impl FfufScan {
    pub const LABEL: &'static str = "FFUF";

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    pub async fn scan(&self, args: FfufScanArgs) -> ToolResult {
        let timeout = args.timeout.unwrap_or(self.default_timeout_secs);
        let argv = ffuf_argv(&args.url, &args.wordlist);
        launch(Self::LABEL, &self.program, argv, timeout).await
    }
}

impl Tool for FfufScan {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::FFUF_SCAN)
            .purpose("Perform an FFUF content-discovery scan on a given target URL")
            .when_to_use(
                "When you need to find hidden directories or files on a web server \
                 using a wordlist",
            )
            .when_not_to_use("When testing parameters for injection, use sqlmap_scan instead")
            .parameters_for::<FfufScanArgs>()
            .example(
                "ffuf_scan(url='http://example.com', wordlist='wordlist.txt')",
                "Raw ffuf results for http://example.com/FUZZ",
            )
            .output_format("Raw ffuf stdout in 'output', or an error 'message'")
            .to_tool_def()
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            match parse_tool_args::<FfufScanArgs>(&arguments) {
                Ok(args) => self.scan(args).await,
                Err(error) => error,
            }
        })
    }
}

// ── MetasploitScan ──────────────────────────────────────────────────

/// Arguments for `metasploit_scan`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MetasploitScanArgs {
    /// Host or range assigned to RHOSTS.
    pub target: String,
    /// Module path (e.g. 'auxiliary/scanner/ssh/ssh_version').
    pub module: String,
    /// Extra console statements applied before 'run' (e.g. 'set RPORT 2222').
    #[serde(default)]
    pub options: String,
    /// Seconds before msfconsole is killed. Default: 60.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Run one Metasploit module non-interactively (`msfconsole -q -x`).
pub struct MetasploitScan {
    program: String,
    default_timeout_secs: u64,
}

impl MetasploitScan {
    pub const LABEL: &'static str = "Metasploit";

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    pub async fn scan(&self, args: MetasploitScanArgs) -> ToolResult {
        let timeout = args.timeout.unwrap_or(self.default_timeout_secs);
        let argv = metasploit_argv(&args.target, &args.module, &args.options);
        launch(Self::LABEL, &self.program, argv, timeout).await
    }
}

impl Tool for MetasploitScan {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::METASPLOIT_SCAN)
            .purpose("Perform a Metasploit scan by running one module against a given target")
            .when_to_use(
                "When you need to run a specific Metasploit auxiliary or exploit module \
                 against a host",
            )
            .when_not_to_use("When you only need an open-port inventory, use nmap_scan instead")
            .parameters_for::<MetasploitScanArgs>()
            .example(
                "metasploit_scan(target='10.0.0.5', module='auxiliary/scanner/ssh/ssh_version')",
                "Raw msfconsole output of the module run",
            )
            .output_format("Raw msfconsole stdout in 'output', or an error 'message'")
            .to_tool_def()
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            match parse_tool_args::<MetasploitScanArgs>(&arguments) {
                Ok(args) => self.scan(args).await,
                Err(error) => error,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmap_uses_fast_scan_flag() {
        assert_eq!(nmap_argv("10.0.0.1").unwrap(), ["-F", "10.0.0.1"]);
    }

    #[test]
    fn sqlmap_runs_in_batch_mode() {
        assert_eq!(
            sqlmap_argv("http://t/x.php?id=1").unwrap(),
            ["-u", "http://t/x.php?id=1", "--batch"]
        );
    }

    #[test]
    fn ffuf_appends_fuzz_marker() {
        let argv = ffuf_argv("http://example.com", "words.txt").unwrap();
        assert_eq!(argv, ["-w", "words.txt", "-u", "http://example.com/FUZZ"]);

        let argv = ffuf_argv("http://example.com/", "words.txt").unwrap();
        assert_eq!(argv[3], "http://example.com/FUZZ");
    }

    #[test]
    fn metasploit_composes_one_command_string() {
        let argv =
            metasploit_argv("10.0.0.5", "auxiliary/scanner/ssh/ssh_version", "set RPORT 2222")
                .unwrap();
        assert_eq!(argv[..2], ["-q", "-x"]);
        assert_eq!(
            argv[2],
            "use auxiliary/scanner/ssh/ssh_version; set RHOSTS 10.0.0.5; set RPORT 2222; run; exit"
        );
    }

    #[test]
    fn metasploit_skips_blank_options() {
        let command = metasploit_command("10.0.0.5", "auxiliary/x", "  ").unwrap();
        assert_eq!(command, "use auxiliary/x; set RHOSTS 10.0.0.5; run; exit");
    }

    #[test]
    fn metasploit_rejects_statement_breaks_in_target() {
        let err = metasploit_command("10.0.0.5; exit", "auxiliary/x", "").unwrap_err();
        assert!(err.to_string().contains("'target'"));
    }

    #[test]
    fn empty_and_flag_like_values_are_rejected() {
        assert_eq!(
            nmap_argv("  ").unwrap_err().to_string(),
            "invalid arguments: 'target' must not be empty"
        );
        assert_eq!(
            sqlmap_argv("--os-shell").unwrap_err().to_string(),
            "invalid arguments: 'url' must not start with '-'"
        );
        assert!(ffuf_argv("http://x", "").is_err());
    }

    #[tokio::test]
    async fn invalid_arguments_never_spawn() {
        // The program does not exist; validation must fail first.
        let tool = NmapScan::new("ghostcrew-missing-nmap");
        let result = tool.execute(r#"{"target": "-oN /tmp/x"}"#).await;
        assert_eq!(
            result.message(),
            Some("invalid arguments: 'target' must not start with '-'")
        );
    }

    #[tokio::test]
    async fn missing_required_argument_is_reported() {
        let result = FfufScan::new("ffuf").execute(r#"{"url": "http://x"}"#).await;
        assert!(result.message().unwrap().contains("wordlist"));
    }

    #[test]
    fn schemas_leave_defaults_optional() {
        let schema = ghostcrew::json_schema_for::<MetasploitScanArgs>();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("target")));
        assert!(required.contains(&serde_json::json!("module")));
        assert!(!required.contains(&serde_json::json!("options")));
        assert!(!required.contains(&serde_json::json!("timeout")));
    }

    #[test]
    fn definitions_use_canonical_names() {
        assert_eq!(NmapScan::new("nmap").name(), "nmap_scan");
        assert_eq!(SqlmapScan::new("sqlmap").name(), "sqlmap_scan");
        assert_eq!(FfufScan::new("ffuf").name(), "ffuf_scan");
        assert_eq!(MetasploitScan::new("msfconsole").name(), "metasploit_scan");
    }
}
