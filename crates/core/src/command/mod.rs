//! Command line construction and execution

pub mod placeholders;
pub mod shell_command;

// Re-export commonly used types
pub use placeholders::PathParts;
pub use shell_command::{CommandOutcome, ExitMarker, ShellCommand};
