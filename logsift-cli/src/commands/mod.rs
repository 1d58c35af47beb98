//! Command handler for the `logsift` binary.

pub mod analyze;
