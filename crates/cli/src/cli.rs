use anyhow::{Context, Result};
use clap::Parser;
use multitest_core::SKIP_MISSING_VERSIONS_OPTION;
use std::path::PathBuf;

use crate::commands::{plan_command, run_command};

#[derive(Parser, Debug)]
#[command(name = "composer-multitest")]
#[command(version, about = "Run a Composer test script against every declared PHP version")]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Run against the installed versions even when some declared ones are missing
    #[arg(long)]
    pub skip_missing_versions: bool,

    /// Project directory holding composer.json and .travis.yml
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Print the resolved plan without switching or running anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// Arguments handed through by Composer
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub passthrough: Vec<String>,
}

impl Cli {
    /// The opt-out may also arrive among the arguments Composer hands through
    pub fn skips_missing_versions(&self) -> bool {
        self.skip_missing_versions
            || self
                .passthrough
                .iter()
                .any(|arg| arg == SKIP_MISSING_VERSIONS_OPTION)
    }

    /// Execute and report whether the run passed
    pub fn execute(self) -> Result<bool> {
        let skip_missing_versions = self.skips_missing_versions();
        let project_dir = match self.cwd {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        if self.dry_run {
            plan_command(&project_dir, skip_missing_versions)
        } else {
            run_command(&project_dir, skip_missing_versions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_flag() {
        let cli = Cli::parse_from(["composer-multitest", "--skip-missing-versions"]);
        assert!(cli.skips_missing_versions());
        assert!(!cli.dry_run);

        let cli = Cli::parse_from(["composer-multitest"]);
        assert!(!cli.skips_missing_versions());
    }

    #[test]
    fn test_passthrough_arguments() {
        let cli = Cli::parse_from([
            "composer-multitest",
            "--cwd",
            "/tmp/project",
            "extra",
            "--skip-missing-versions",
        ]);

        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.passthrough, vec!["extra", "--skip-missing-versions"]);
        assert!(cli.skips_missing_versions());
    }

    #[test]
    fn test_dry_run_short_flag() {
        let cli = Cli::parse_from(["composer-multitest", "-d"]);
        assert!(cli.dry_run);
    }
}
