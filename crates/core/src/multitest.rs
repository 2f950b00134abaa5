//! Top-level run: picks an installed version manager, resolves the script and
//! the declared versions, enforces the missing-versions prerequisite and hands
//! over to the manager's multi run.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::{
    config::Settings,
    error::{Error, Result},
    managers::{ManagerKind, VersionManager},
    manifest::{Script, ScriptResolver, VersionResolver},
    report::Reporter,
    version::minor_key,
};

/// Everything resolved before anything is switched or run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub manager: ManagerKind,
    pub script: Script,
    pub declared: Vec<String>,
    pub runnable: Vec<String>,
    manager_index: usize,
}

impl RunPlan {
    /// Every declared version has a runnable counterpart
    pub fn satisfies_prerequisite(&self) -> bool {
        self.runnable.len() == self.declared.len()
    }

    /// Declared versions no runnable version matches at (major, minor)
    pub fn missing_versions(&self) -> Vec<String> {
        let covered: HashSet<(&str, &str)> =
            self.runnable.iter().filter_map(|v| minor_key(v)).collect();

        self.declared
            .iter()
            .filter(|v| minor_key(v).is_none_or(|key| !covered.contains(&key)))
            .cloned()
            .collect()
    }
}

pub struct Multitest<'r> {
    settings: Settings,
    managers: Vec<Box<dyn VersionManager>>,
    reporter: &'r dyn Reporter,
}

impl<'r> Multitest<'r> {
    /// Orchestrator over the real tools, probed in the configured order
    pub fn new(settings: Settings, reporter: &'r dyn Reporter) -> Self {
        let managers = settings
            .managers
            .iter()
            .map(|kind| kind.create(&settings))
            .collect();
        Self::with_managers(settings, managers, reporter)
    }

    pub fn with_managers(
        settings: Settings,
        managers: Vec<Box<dyn VersionManager>>,
        reporter: &'r dyn Reporter,
    ) -> Self {
        Self {
            settings,
            managers,
            reporter,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn select_manager(&self) -> Result<usize> {
        self.managers
            .iter()
            .position(|manager| {
                let installed = manager.is_installed();
                debug!("{} installed: {}", manager.name(), installed);
                installed
            })
            .ok_or(Error::NoManagerInstalled)
    }

    /// Resolve manager, script, declared and runnable versions without
    /// switching or running anything
    pub fn plan(&mut self) -> Result<RunPlan> {
        let manager_index = self.select_manager()?;

        let script = ScriptResolver::new(self.settings.composer_command.clone())
            .with_working_dir(self.settings.working_dir.clone())
            .resolve(&self.settings.composer_manifest())?;
        let declared = VersionResolver::new().resolve(&self.settings.travis_manifest())?;

        let manager = &mut self.managers[manager_index];
        let runnable = manager.runnable_versions(&declared)?;

        Ok(RunPlan {
            manager: manager.kind(),
            script,
            declared,
            runnable,
            manager_index,
        })
    }

    /// Run the resolved script against every runnable version. Resolution
    /// failures and a missing manager are reported and yield `Ok(false)`.
    pub fn run(&mut self, skip_missing_versions: bool) -> Result<bool> {
        let plan = match self.plan() {
            Ok(plan) => plan,
            Err(e) if e.is_resolution() || matches!(e, Error::NoManagerInstalled) => {
                debug!("Run aborted before switching: {:?}", e);
                self.reporter.write_error(&e.to_string());
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        info!(
            "Running '{}' with {} against {:?}",
            plan.script.command_line(),
            plan.manager.display_name(),
            plan.runnable
        );

        if !skip_missing_versions && !plan.satisfies_prerequisite() {
            debug!(
                "Prerequisite failed: declared {:?}, runnable {:?}",
                plan.declared, plan.runnable
            );
            let failure = Error::MissingVersionsPrerequisiteFailed {
                command: plan.script.command_line(),
            };
            self.reporter.write_error(&failure.to_string());
            return Ok(false);
        }

        let manager = &mut self.managers[plan.manager_index];
        manager.multi_run(&plan.script, &plan.runnable, self.reporter)
    }
}
