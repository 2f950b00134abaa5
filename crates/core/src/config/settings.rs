use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CONFIG_FILE, COMPOSER_CONFIGURATION, PHPENV_VERSION_FILE, TRAVIS_CONFIGURATION};
use crate::{
    error::{Error, Result},
    managers::ManagerKind,
};

/// How the script's standard output reaches the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Relay every line while the script runs
    #[default]
    Stream,
    /// Relay the output once the script finished
    Buffered,
}

/// Executables used for the external tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ToolCommands {
    pub composer: Option<String>,
    pub phpenv: Option<String>,
    pub phpbrew: Option<String>,
}

/// Contents of a `.multitest.json` file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    pub skip_missing_versions: Option<bool>,
    pub managers: Option<Vec<ManagerKind>>,
    #[serde(default)]
    pub commands: ToolCommands,
    pub output: Option<OutputMode>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    /// The config file of a project directory, if there is one
    pub fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
        let path = project_dir.join(CONFIG_FILE);
        path.is_file().then_some(path)
    }
}

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub working_dir: PathBuf,
    pub skip_missing_versions: bool,
    pub managers: Vec<ManagerKind>,
    pub composer_command: String,
    pub phpenv_command: String,
    pub phpbrew_command: String,
    pub output: OutputMode,
}

impl Settings {
    /// Defaults for a project directory, ignoring any config file
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(working_dir, Config::default())
    }

    /// Settings for a project directory, honouring its `.multitest.json`
    pub fn load(working_dir: impl Into<PathBuf>) -> Result<Self> {
        let working_dir = working_dir.into();
        let config = match Config::find_config_file(&working_dir) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Config::load_from_file(&path)?
            }
            None => Config::default(),
        };
        Ok(Self::from_config(working_dir, config))
    }

    pub fn from_config(working_dir: impl Into<PathBuf>, config: Config) -> Self {
        let commands = config.commands;
        Self {
            working_dir: working_dir.into(),
            skip_missing_versions: config.skip_missing_versions.unwrap_or(false),
            managers: config
                .managers
                .unwrap_or_else(|| vec![ManagerKind::Phpenv, ManagerKind::Phpbrew]),
            composer_command: commands.composer.unwrap_or_else(|| "composer".to_string()),
            phpenv_command: commands.phpenv.unwrap_or_else(|| "phpenv".to_string()),
            phpbrew_command: commands.phpbrew.unwrap_or_else(|| "phpbrew".to_string()),
            output: config.output.unwrap_or_default(),
        }
    }

    /// The command line flag can only switch the prerequisite off, never back on
    pub fn with_skip_missing_versions(mut self, skip: bool) -> Self {
        self.skip_missing_versions |= skip;
        self
    }

    pub fn composer_manifest(&self) -> PathBuf {
        self.working_dir.join(COMPOSER_CONFIGURATION)
    }

    pub fn travis_manifest(&self) -> PathBuf {
        self.working_dir.join(TRAVIS_CONFIGURATION)
    }

    pub fn phpenv_version_file(&self) -> PathBuf {
        self.working_dir.join(PHPENV_VERSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(temp_dir.path()).unwrap();

        assert!(!settings.skip_missing_versions);
        assert_eq!(
            settings.managers,
            vec![ManagerKind::Phpenv, ManagerKind::Phpbrew]
        );
        assert_eq!(settings.composer_command, "composer");
        assert_eq!(settings.phpenv_command, "phpenv");
        assert_eq!(settings.phpbrew_command, "phpbrew");
        assert_eq!(settings.output, OutputMode::Stream);
        assert_eq!(
            settings.travis_manifest(),
            temp_dir.path().join(".travis.yml")
        );
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = serde_json::json!({
            "skip_missing_versions": true,
            "managers": ["phpbrew"],
            "commands": {
                "composer": "/usr/local/bin/composer.phar"
            },
            "output": "buffered"
        });
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();

        let settings = Settings::load(temp_dir.path()).unwrap();

        assert!(settings.skip_missing_versions);
        assert_eq!(settings.managers, vec![ManagerKind::Phpbrew]);
        assert_eq!(settings.composer_command, "/usr/local/bin/composer.phar");
        assert_eq!(settings.phpenv_command, "phpenv");
        assert_eq!(settings.output, OutputMode::Buffered);
    }

    #[test]
    fn test_malformed_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let err = Settings::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_flag_cannot_reenable_prerequisite() {
        let config = Config {
            skip_missing_versions: Some(true),
            ..Default::default()
        };
        let settings = Settings::from_config("/tmp", config).with_skip_missing_versions(false);
        assert!(settings.skip_missing_versions);

        let settings = Settings::new("/tmp").with_skip_missing_versions(true);
        assert!(settings.skip_missing_versions);
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "managers": ["phpbrew", "phpenv"], "commands": { "phpbrew": "/opt/phpbrew" } }"#,
        )
        .unwrap();

        let expected = Config {
            managers: Some(vec![ManagerKind::Phpbrew, ManagerKind::Phpenv]),
            commands: ToolCommands {
                phpbrew: Some("/opt/phpbrew".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(Config::load_from_file(&path).unwrap(), expected);
        assert_eq!(Config::find_config_file(temp_dir.path()), Some(path));
    }
}
