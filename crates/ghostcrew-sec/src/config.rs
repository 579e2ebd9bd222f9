//! Security-tool configuration with sensible defaults.
//!
//! [`SecurityToolsConfig`] names the executables the wrappers launch and the
//! deadline used when a call does not carry its own `timeout`. It converts
//! into a ready [`ToolSet`] via [`build_tool_set`](SecurityToolsConfig::build_tool_set).

use ghostcrew::tools::core::ToolSet;
use ghostcrew::tools::process::DEFAULT_TIMEOUT_SECS;
use tracing::warn;

use crate::tools::SecurityToolsExt;

pub const ENV_NMAP: &str = "GHOSTCREW_NMAP";
pub const ENV_SQLMAP: &str = "GHOSTCREW_SQLMAP";
pub const ENV_FFUF: &str = "GHOSTCREW_FFUF";
pub const ENV_MSFCONSOLE: &str = "GHOSTCREW_MSFCONSOLE";
pub const ENV_TIMEOUT: &str = "GHOSTCREW_TIMEOUT";

/// Executables and default deadline for the security tools.
///
/// Each executable is a bare name resolved through `PATH` or a path to a
/// specific install (or a mock script in tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityToolsConfig {
    /// nmap executable. Default: `"nmap"`.
    pub nmap: String,
    /// sqlmap executable. Default: `"sqlmap"`.
    pub sqlmap: String,
    /// ffuf executable. Default: `"ffuf"`.
    pub ffuf: String,
    /// Metasploit console executable. Default: `"msfconsole"`.
    pub msfconsole: String,
    /// Deadline for calls that omit `timeout`. Default: `60`.
    pub default_timeout_secs: u64,
}

impl Default for SecurityToolsConfig {
    fn default() -> Self {
        Self {
            nmap: "nmap".to_string(),
            sqlmap: "sqlmap".to_string(),
            ffuf: "ffuf".to_string(),
            msfconsole: "msfconsole".to_string(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SecurityToolsConfig {
    /// Defaults overlaid with the `GHOSTCREW_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through
    /// `lookup`. Empty values are treated as unset.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(nmap) = get(ENV_NMAP) {
            config.nmap = nmap;
        }
        if let Some(sqlmap) = get(ENV_SQLMAP) {
            config.sqlmap = sqlmap;
        }
        if let Some(ffuf) = get(ENV_FFUF) {
            config.ffuf = ffuf;
        }
        if let Some(msfconsole) = get(ENV_MSFCONSOLE) {
            config.msfconsole = msfconsole;
        }
        if let Some(raw) = get(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.default_timeout_secs = secs,
                Err(err) => warn!(
                    value = %raw,
                    "ignoring {ENV_TIMEOUT}: {err}, keeping {}s",
                    config.default_timeout_secs
                ),
            }
        }
        config
    }

    pub fn with_nmap(mut self, program: impl Into<String>) -> Self {
        self.nmap = program.into();
        self
    }

    pub fn with_sqlmap(mut self, program: impl Into<String>) -> Self {
        self.sqlmap = program.into();
        self
    }

    pub fn with_ffuf(mut self, program: impl Into<String>) -> Self {
        self.ffuf = program.into();
        self
    }

    pub fn with_msfconsole(mut self, program: impl Into<String>) -> Self {
        self.msfconsole = program.into();
        self
    }

    pub fn with_default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    /// Build a [`ToolSet`] with the four security tools plus
    /// `read_file` / `write_file`.
    pub fn build_tool_set(&self) -> ToolSet {
        ToolSet::new().with_security_tools(self).with_file_tools()
    }
}
