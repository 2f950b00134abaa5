use anyhow::Result;
use multitest_core::{ConsoleReporter, Error, Multitest, Reporter};
use std::path::Path;

use super::run::load_settings;
use crate::display::print_plan;

/// Resolve and print what a run would do. Fails when the run would be
/// refused by the missing-versions prerequisite.
pub fn plan_command(project_dir: &Path, skip_missing_versions: bool) -> Result<bool> {
    let settings = load_settings(project_dir, skip_missing_versions)?;
    let skip = settings.skip_missing_versions;

    let reporter = ConsoleReporter;
    let mut multitest = Multitest::new(settings, &reporter);

    let plan = match multitest.plan() {
        Ok(plan) => plan,
        Err(e) if e.is_resolution() || matches!(e, Error::NoManagerInstalled) => {
            reporter.write_error(&e.to_string());
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    print_plan(&plan, skip);

    if skip || plan.satisfies_prerequisite() {
        Ok(true)
    } else {
        let failure = Error::MissingVersionsPrerequisiteFailed {
            command: plan.script.command_line(),
        };
        reporter.write_error(&failure.to_string());
        Ok(false)
    }
}
