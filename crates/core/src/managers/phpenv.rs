//! phpenv: `phpenv versions` lists `  5.6.1` / `* 7.0.1 (set by ...)`, and
//! versions are switched locally when the project pins one.

use std::path::PathBuf;

use super::{strip_default_marker, ListedVersion, ManagerKind, ManagerState, VersionManager};
use crate::{
    command::{CommandExecutor, ShellCommand, SystemExecutor},
    config::Settings,
};

pub struct Phpenv {
    program: String,
    working_dir: PathBuf,
    version_file: PathBuf,
    state: ManagerState,
}

impl Phpenv {
    pub fn new(settings: &Settings) -> Self {
        Self::with_executor(settings, Box::new(SystemExecutor))
    }

    pub fn with_executor(settings: &Settings, executor: Box<dyn CommandExecutor>) -> Self {
        Self {
            program: settings.phpenv_command.clone(),
            working_dir: settings.working_dir.clone(),
            version_file: settings.phpenv_version_file(),
            state: ManagerState::new(executor, settings.output),
        }
    }

    /// A non-blank `.phpenv-version` in the project pins the version locally
    pub fn has_local_version_file(&self) -> bool {
        std::fs::read_to_string(&self.version_file)
            .map(|contents| !contents.trim().is_empty())
            .unwrap_or(false)
    }

    fn command<I, S>(&self, args: I) -> ShellCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ShellCommand::new(self.program.clone(), args).with_working_dir(self.working_dir.clone())
    }
}

impl VersionManager for Phpenv {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Phpenv
    }

    fn state(&self) -> &ManagerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ManagerState {
        &mut self.state
    }

    fn probe_command(&self) -> ShellCommand {
        ShellCommand::bare(self.program.clone()).with_working_dir(self.working_dir.clone())
    }

    fn list_command(&self) -> ShellCommand {
        self.command(["versions"])
    }

    fn switch_command(&self, version: &str) -> ShellCommand {
        let scope = if self.has_local_version_file() {
            "local"
        } else {
            "global"
        };
        self.command([scope, version])
    }

    fn parse_listing_line(&self, line: &str) -> Option<ListedVersion> {
        let (version, is_default) = strip_default_marker(line)?;
        let version = if is_default {
            // "7.0.1 (set by /home/user/.phpenv/version)"
            version
                .split(" (")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        } else {
            version
        };

        Some(ListedVersion {
            version,
            is_default,
        })
    }
}
