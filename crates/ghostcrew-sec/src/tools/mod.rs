//! Security-tool wrappers for the ghostcrew agent.
//!
//! Provides the four scanner tools and the [`SecurityToolsExt`] trait for
//! registering them on a [`ToolSet`](ghostcrew::tools::core::ToolSet).

pub mod scanners;

pub use scanners::{FfufScan, MetasploitScan, NmapScan, SqlmapScan};

use crate::config::SecurityToolsConfig;

// ── Tool name constants ─────────────────────────────────────────────

pub const NMAP_SCAN: &str = "nmap_scan";
pub const SQLMAP_SCAN: &str = "sqlmap_scan";
pub const FFUF_SCAN: &str = "ffuf_scan";
pub const METASPLOIT_SCAN: &str = "metasploit_scan";

// ── Extension trait ─────────────────────────────────────────────────

/// Extension trait for registering the scanner tools on a
/// [`ToolSet`](ghostcrew::tools::core::ToolSet).
///
/// ```ignore
/// use ghostcrew::tools::core::ToolSet;
/// use ghostcrew_sec::{SecurityToolsConfig, SecurityToolsExt};
///
/// let tools = ToolSet::new()
///     .with_file_tools()
///     .with_security_tools(&SecurityToolsConfig::default());
/// ```
pub trait SecurityToolsExt {
    fn with_security_tools(self, config: &SecurityToolsConfig) -> Self;
}

impl SecurityToolsExt for ghostcrew::tools::core::ToolSet {
    fn with_security_tools(self, config: &SecurityToolsConfig) -> Self {
        let timeout = config.default_timeout_secs;
        self.with(NmapScan::new(config.nmap.clone()).default_timeout(timeout))
            .with(SqlmapScan::new(config.sqlmap.clone()).default_timeout(timeout))
            .with(FfufScan::new(config.ffuf.clone()).default_timeout(timeout))
            .with(MetasploitScan::new(config.msfconsole.clone()).default_timeout(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostcrew::tools::core::ToolSet;

    #[test]
    fn with_security_tools_registers_all_four() {
        let tools = ToolSet::new().with_security_tools(&SecurityToolsConfig::default());
        assert_eq!(
            tools.names(),
            [FFUF_SCAN, METASPLOIT_SCAN, NMAP_SCAN, SQLMAP_SCAN]
        );
        for name in tools.names() {
            assert!(tools.is_mutation_tool(name), "{name} should be a mutation tool");
        }
    }

    #[test]
    fn composes_with_file_tools() {
        let tools = ToolSet::new()
            .with_file_tools()
            .with_security_tools(&SecurityToolsConfig::default());
        assert_eq!(tools.len(), 6);
        assert!(!tools.is_mutation_tool("read_file"));
    }
}
