//! PHPBrew: `phpbrew list` prints `  php-7.0.4` / `* php-5.6.19` and
//! versions are switched with `phpbrew use`.

use std::path::PathBuf;

use super::{strip_default_marker, ListedVersion, ManagerKind, ManagerState, VersionManager};
use crate::{
    command::{CommandExecutor, ShellCommand, SystemExecutor},
    config::Settings,
};

pub struct PhpBrew {
    program: String,
    working_dir: PathBuf,
    state: ManagerState,
}

impl PhpBrew {
    pub fn new(settings: &Settings) -> Self {
        Self::with_executor(settings, Box::new(SystemExecutor))
    }

    pub fn with_executor(settings: &Settings, executor: Box<dyn CommandExecutor>) -> Self {
        Self {
            program: settings.phpbrew_command.clone(),
            working_dir: settings.working_dir.clone(),
            state: ManagerState::new(executor, settings.output),
        }
    }

    fn command<I, S>(&self, args: I) -> ShellCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ShellCommand::new(self.program.clone(), args).with_working_dir(self.working_dir.clone())
    }
}

impl VersionManager for PhpBrew {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Phpbrew
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
        self.command(["list"])
    }

    fn switch_command(&self, version: &str) -> ShellCommand {
        self.command(["use", version])
    }

    fn parse_listing_line(&self, line: &str) -> Option<ListedVersion> {
        let (version, is_default) = strip_default_marker(line)?;
        Some(ListedVersion {
            version,
            is_default,
        })
    }
}
