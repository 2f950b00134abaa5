//! Configuration management for composer-multitest

mod settings;

// Re-export main types
pub use settings::{Config, OutputMode, Settings, ToolCommands};

/// Optional per-project configuration file
pub const CONFIG_FILE: &str = ".multitest.json";

/// Project manifest holding the Composer scripts
pub const COMPOSER_CONFIGURATION: &str = "composer.json";

/// CI manifest declaring the PHP versions
pub const TRAVIS_CONFIGURATION: &str = ".travis.yml";

/// phpenv's local version pin
pub const PHPENV_VERSION_FILE: &str = ".phpenv-version";
