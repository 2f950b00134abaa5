//! Sequential run of a script across several PHP versions.
//!
//! The last runnable version is set aside as the restoration reference and
//! is not run against. After the pass (or on the first failure) the default
//! version is switched back to whenever it differs from that reference.

use tracing::debug;

use super::{relay_output, VersionManager};
use crate::{
    command::CommandOutput,
    config::OutputMode,
    error::Result,
    manifest::Script,
    report::Reporter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

/// States of a multi-version run. Indices point into the iterated versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running(usize),
    Switched(usize),
    SwitchFailed(usize),
    Executed(usize),
    ExecFailed(usize),
    Restoring(Outcome),
    Done(Outcome),
}

pub struct MultiRun<'a, M: VersionManager + ?Sized> {
    manager: &'a mut M,
    script: &'a Script,
    reporter: &'a dyn Reporter,
    versions: Vec<String>,
    reference: Option<String>,
    last_output: CommandOutput,
}

impl<'a, M: VersionManager + ?Sized> MultiRun<'a, M> {
    pub fn new(
        manager: &'a mut M,
        script: &'a Script,
        reporter: &'a dyn Reporter,
        runnable_versions: &[String],
    ) -> Self {
        let mut versions = runnable_versions.to_vec();
        let reference = versions.pop();

        Self {
            manager,
            script,
            reporter,
            versions,
            reference,
            last_output: CommandOutput::default(),
        }
    }

    /// Versions the script is run against, in order
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// The version compared with the default to decide on restoration
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Drive the run to completion
    pub fn run(mut self) -> Result<bool> {
        let mut state = RunState::Idle;
        loop {
            state = self.step(state)?;
            if let RunState::Done(outcome) = state {
                return Ok(outcome == Outcome::Passed);
            }
        }
    }

    /// Perform the work of `state` and return the next state
    pub fn step(&mut self, state: RunState) -> Result<RunState> {
        debug!("Multi run: {:?}", state);

        let next = match state {
            RunState::Idle => {
                if self.versions.is_empty() {
                    RunState::Restoring(Outcome::Passed)
                } else {
                    RunState::Running(0)
                }
            }
            RunState::Running(index) => {
                self.last_output = CommandOutput::default();
                match self.manager.switch_to(&self.versions[index]) {
                    Ok(()) => RunState::Switched(index),
                    Err(e) => {
                        debug!("Switching to '{}' failed: {}", self.versions[index], e);
                        RunState::SwitchFailed(index)
                    }
                }
            }
            RunState::Switched(index) => {
                self.reporter
                    .write(&format!(">> Switching to '{}'.", self.versions[index]));
                self.reporter
                    .write(&format!(">> Running '{}'.", self.script.command_line()));

                match self.manager.execute_script(self.script, self.reporter) {
                    Ok(output) => {
                        let passed = output.success();
                        self.last_output = output;
                        if passed {
                            RunState::Executed(index)
                        } else {
                            RunState::ExecFailed(index)
                        }
                    }
                    Err(e) => {
                        debug!("Running '{}' failed: {}", self.script.command_line(), e);
                        RunState::ExecFailed(index)
                    }
                }
            }
            RunState::Executed(index) => {
                self.relay_buffered_output();
                if index + 1 < self.versions.len() {
                    RunState::Running(index + 1)
                } else {
                    RunState::Restoring(Outcome::Passed)
                }
            }
            RunState::SwitchFailed(_) | RunState::ExecFailed(_) => {
                self.relay_buffered_output();
                self.reporter.write(&format!(
                    ">> Running '{}' failed.",
                    self.script.command_line()
                ));
                RunState::Restoring(Outcome::Failed)
            }
            RunState::Restoring(outcome) => {
                if self.restoration_required()? {
                    self.manager.switch_back_to_default_php_version()?;
                    let default = self.manager.default_php_version()?;
                    self.reporter
                        .write(&format!(">> Switching back to '{default}'."));
                }
                RunState::Done(outcome)
            }
            RunState::Done(outcome) => RunState::Done(outcome),
        };

        Ok(next)
    }

    fn restoration_required(&mut self) -> Result<bool> {
        let default = self.manager.default_php_version()?;
        let required = self.reference.as_deref().map(str::trim) != Some(default.as_str());
        debug!(
            "Restoration reference {:?}, default '{}', switching back: {}",
            self.reference, default, required
        );
        Ok(required)
    }

    fn relay_buffered_output(&self) {
        if self.manager.state().output() == OutputMode::Buffered {
            relay_output(&self.last_output, self.reporter);
        }
    }
}
