use anyhow::{Context, Result};
use multitest_core::{ConsoleReporter, Multitest, Settings};
use std::path::Path;
use tracing::{debug, info};

/// Load the project settings, applying the command line opt-out
pub(crate) fn load_settings(project_dir: &Path, skip_missing_versions: bool) -> Result<Settings> {
    let settings = Settings::load(project_dir)
        .with_context(|| format!("Failed to load settings for {}", project_dir.display()))?
        .with_skip_missing_versions(skip_missing_versions);

    debug!("Settings: {:?}", settings);
    Ok(settings)
}

pub fn run_command(project_dir: &Path, skip_missing_versions: bool) -> Result<bool> {
    let settings = load_settings(project_dir, skip_missing_versions)?;
    let skip = settings.skip_missing_versions;

    info!("Running multitest in {}", project_dir.display());

    let reporter = ConsoleReporter;
    let mut multitest = Multitest::new(settings, &reporter);
    let passed = multitest.run(skip)?;

    debug!("Multitest passed: {}", passed);
    Ok(passed)
}
