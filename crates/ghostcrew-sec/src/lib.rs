//! Security-tool wrappers for ghostcrew agents.
//!
//! `ghostcrew-sec` exposes nmap, sqlmap, ffuf and msfconsole as agent tools.
//! Each call spawns the real executable with a fixed argument vector, bounds
//! it with a deadline, and returns the shared
//! [`ToolResult`](ghostcrew::ToolResult) shape. Raw tool output is passed
//! through untouched; interpreting it is the agent's job.
//!
//! # Library usage
//!
//! ```ignore
//! use ghostcrew_sec::{SecurityToolsConfig, SecurityToolsExt};
//! use ghostcrew::tools::core::ToolSet;
//!
//! // Everything at once: four scanners plus read_file / write_file.
//! let tools = SecurityToolsConfig::from_env().build_tool_set();
//!
//! // Or add the scanners to an existing ToolSet.
//! let tools = ToolSet::new().with_security_tools(&SecurityToolsConfig::default());
//! ```
//!
//! # Binary
//!
//! The `ghostcrew` binary drives the same tool surface from a terminal:
//!
//! ```sh
//! ghostcrew list
//! ghostcrew call nmap_scan --args '{"target": "scanme.nmap.org", "timeout": 120}'
//! ```

pub mod config;
pub mod tools;

pub use config::SecurityToolsConfig;
pub use tools::SecurityToolsExt;
