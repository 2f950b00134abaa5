//! multitest-core - Runs a Composer test script against every PHP version a
//! project declares
//!
//! This crate provides functionality to:
//! - Resolve the test or spec script from `composer.json`
//! - Resolve the declared PHP versions from `.travis.yml`
//! - Drive phpenv or PHPBrew through the versions, restoring the default
pub mod command;
pub mod config;
pub mod error;
pub mod managers;
pub mod manifest;
pub mod multitest;
pub mod report;
pub mod version;

#[cfg(test)]
mod testing;

/// Command line flag disabling the missing-versions prerequisite
pub const SKIP_MISSING_VERSIONS_OPTION: &str = "--skip-missing-versions";

// Re-export commonly used types and traits
pub use error::{Error, Result};

pub use command::{CommandExecutor, CommandOutput, ShellCommand, SystemExecutor};
pub use config::{Config, OutputMode, Settings};
pub use managers::{ManagerKind, PhpBrew, Phpenv, VersionManager};
pub use manifest::{Script, ScriptResolver, VersionResolver};
pub use multitest::{Multitest, RunPlan};
pub use report::{ConsoleReporter, Reporter};
