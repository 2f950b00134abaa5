//! PHP version managers.
//!
//! Both supported tools (phpenv and PHPBrew) share one contract: probe,
//! list the installed versions, switch between them and run the script. Only
//! the command lines and the listing format differ, so implementors supply
//! those and inherit the rest from [`VersionManager`]'s provided methods.

pub mod multi_run;
pub mod phpbrew;
pub mod phpenv;

pub use multi_run::{MultiRun, Outcome, RunState};
pub use phpbrew::PhpBrew;
pub use phpenv::Phpenv;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::{
    command::{CommandExecutor, CommandOutput, ShellCommand},
    config::{OutputMode, Settings},
    error::{Error, Result},
    manifest::Script,
    report::Reporter,
    version::{minor_key, sort_descending},
};

/// The supported version managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    Phpenv,
    Phpbrew,
}

impl ManagerKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ManagerKind::Phpenv => "phpenv",
            ManagerKind::Phpbrew => "PHPBrew",
        }
    }

    /// Build a manager of this kind that talks to the real tool
    pub fn create(self, settings: &Settings) -> Box<dyn VersionManager> {
        match self {
            ManagerKind::Phpenv => Box::new(Phpenv::new(settings)),
            ManagerKind::Phpbrew => Box::new(PhpBrew::new(settings)),
        }
    }
}

/// One line of a manager's version listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedVersion {
    pub version: String,
    pub is_default: bool,
}

/// Managed versions and the default, as reported by the first listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCache {
    versions: Option<Vec<String>>,
    default: Option<String>,
}

impl VersionCache {
    pub fn is_populated(&self) -> bool {
        self.versions.is_some()
    }

    pub fn versions(&self) -> Option<&[String]> {
        self.versions.as_deref()
    }

    pub fn default_version(&self) -> Option<&str> {
        self.default.as_deref()
    }

    fn store(&mut self, versions: Vec<String>, default: Option<String>) {
        self.versions = Some(versions);
        self.default = default;
    }
}

/// State every manager carries: how to run commands, what the tool reported
/// and how script output is relayed.
pub struct ManagerState {
    executor: Box<dyn CommandExecutor>,
    cache: VersionCache,
    output: OutputMode,
}

impl ManagerState {
    pub fn new(executor: Box<dyn CommandExecutor>, output: OutputMode) -> Self {
        Self {
            executor,
            cache: VersionCache::default(),
            output,
        }
    }

    pub fn executor(&self) -> &dyn CommandExecutor {
        self.executor.as_ref()
    }

    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }
}

/// Split the active-version marker off a listing line. Blank lines yield
/// `None`.
pub(crate) fn strip_default_marker(line: &str) -> Option<(String, bool)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.contains('*') {
        Some((line.replace("* ", "").trim().to_string(), true))
    } else {
        Some((line.to_string(), false))
    }
}

fn ensure_success(command: &ShellCommand, output: &CommandOutput) -> Result<()> {
    if output.success() {
        Ok(())
    } else {
        Err(Error::ExternalCommandFailed {
            command: command.command_line(),
            code: output.code,
        })
    }
}

/// Shared contract of the PHP version managers
pub trait VersionManager {
    fn kind(&self) -> ManagerKind;

    fn state(&self) -> &ManagerState;

    fn state_mut(&mut self) -> &mut ManagerState;

    /// Invocation used to check the tool is installed
    fn probe_command(&self) -> ShellCommand;

    /// Invocation listing the installed versions
    fn list_command(&self) -> ShellCommand;

    /// Invocation activating `version`
    fn switch_command(&self, version: &str) -> ShellCommand;

    /// Parse one line of the listing output
    fn parse_listing_line(&self, line: &str) -> Option<ListedVersion>;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Any failure to run the probe, or a non-zero exit, means "not installed"
    fn is_installed(&self) -> bool {
        let probe = self.probe_command();
        match self.state().executor().run(&probe) {
            Ok(output) => output.success(),
            Err(e) => {
                debug!("Probing {} failed: {}", self.name(), e);
                false
            }
        }
    }

    /// Installed versions, sorted descending. The tool is queried once per
    /// manager; later calls are served from the cache.
    fn managed_versions(&mut self) -> Result<Vec<String>> {
        if let Some(versions) = self.state().cache().versions() {
            debug!("Using cached {} versions", self.name());
            return Ok(versions.to_vec());
        }

        let list = self.list_command();
        let output = self.state().executor().run(&list)?;
        ensure_success(&list, &output)?;

        let mut versions = Vec::new();
        let mut default = None;
        for listed in output
            .stdout
            .lines()
            .filter_map(|line| self.parse_listing_line(line))
        {
            if listed.is_default {
                default = Some(listed.version.clone());
            }
            versions.push(listed.version);
        }
        sort_descending(&mut versions);

        debug!(
            "{} manages {:?} (default: {:?})",
            self.name(),
            versions,
            default
        );
        self.state_mut().cache.store(versions.clone(), default);

        Ok(versions)
    }

    fn default_php_version(&mut self) -> Result<String> {
        if !self.state().cache().is_populated() {
            self.managed_versions()?;
        }

        self.state()
            .cache()
            .default_version()
            .map(str::to_string)
            .ok_or(Error::DefaultVersionNotResolvable {
                manager: self.name(),
            })
    }

    fn manages_multiple_versions(&mut self) -> Result<bool> {
        Ok(self.managed_versions()?.len() > 1)
    }

    /// Managed versions whose (major, minor) pair matches a declared
    /// version. A manager with a single version always yields its default,
    /// whatever was declared.
    fn runnable_versions(&mut self, declared: &[String]) -> Result<Vec<String>> {
        if !self.manages_multiple_versions()? {
            return Ok(vec![self.default_php_version()?]);
        }

        let declared: HashSet<(&str, &str)> =
            declared.iter().filter_map(|v| minor_key(v)).collect();

        let runnable: Vec<String> = self
            .managed_versions()?
            .into_iter()
            .filter(|version| minor_key(version).is_some_and(|key| declared.contains(&key)))
            .collect();

        debug!("Runnable versions: {:?}", runnable);
        Ok(runnable)
    }

    /// Activate `version`
    fn switch_to(&mut self, version: &str) -> Result<()> {
        let switch = self.switch_command(version);
        let output = self.state().executor().run(&switch)?;
        ensure_success(&switch, &output)
    }

    fn switch_back_to_default_php_version(&mut self) -> Result<bool> {
        let default = self.default_php_version()?;
        let switch = self.switch_command(&default);

        match self.state().executor().run(&switch) {
            Ok(output) if output.success() => Ok(true),
            Ok(output) => {
                debug!("'{}' exited with {:?}", switch.command_line(), output.code);
                Err(Error::SwitchBackFailed { version: default })
            }
            Err(e) => {
                debug!("'{}' could not be run: {}", switch.command_line(), e);
                Err(Error::SwitchBackFailed { version: default })
            }
        }
    }

    /// Run the script once, relaying its output according to the output mode
    fn execute_script(&self, script: &Script, reporter: &dyn Reporter) -> Result<CommandOutput> {
        let state = self.state();
        match state.output() {
            OutputMode::Stream => state
                .executor()
                .stream(script.command(), &mut |line| reporter.write(line)),
            OutputMode::Buffered => state.executor().stream(script.command(), &mut |_| {}),
        }
    }

    /// Run the script against the active version only
    fn single_run(&mut self, script: &Script, reporter: &dyn Reporter) -> Result<bool> {
        reporter.write(&format!(">> Running '{}'.", script.command_line()));

        let output = self.execute_script(script, reporter)?;
        if self.state().output() == OutputMode::Buffered {
            relay_output(&output, reporter);
        }
        ensure_success(script.command(), &output)?;

        Ok(true)
    }

    /// Run the script against the runnable versions, one after the other
    fn multi_run(
        &mut self,
        script: &Script,
        runnable_versions: &[String],
        reporter: &dyn Reporter,
    ) -> Result<bool> {
        if runnable_versions.len() <= 1 {
            return self.single_run(script, reporter);
        }

        MultiRun::new(self, script, reporter, runnable_versions).run()
    }
}

/// Hand buffered script output to the reporter
pub(crate) fn relay_output(output: &CommandOutput, reporter: &dyn Reporter) {
    let text = output.stdout.trim_end_matches(['\n', '\r']);
    if !text.is_empty() {
        reporter.write(text);
    }
}
