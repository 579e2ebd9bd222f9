//! Canonical names of the built-in tools.

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
