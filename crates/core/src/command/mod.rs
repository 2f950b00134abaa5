//! External command description and execution

pub mod executor;
pub mod shell_command;

// Re-export commonly used types
pub use executor::{CommandExecutor, CommandOutput, SystemExecutor};
pub use shell_command::ShellCommand;
