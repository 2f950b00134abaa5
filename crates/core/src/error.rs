use std::io;

use crate::SKIP_MISSING_VERSIONS_OPTION;

/// Errors that can occur while resolving or running a multi-version test run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Couldn't find a {file}.")]
    NotFound { file: String },

    #[error("The {file} is empty.")]
    Blank { file: String },

    #[error("Unable to parse {file}.")]
    ConfigurationNotParseable { file: String },

    #[error("There are no Composer scripts defined.")]
    NoScriptsDefined,

    #[error("Unable to resolve test or spec Composer script.")]
    ScriptNotResolvable,

    #[error("Unable to resolve versions.")]
    VersionsNotResolvable,

    #[error("Unable to resolve the default PHP version managed by {manager}.")]
    DefaultVersionNotResolvable { manager: &'static str },

    #[error("Switching back to the default PHP version '{version}' failed.")]
    SwitchBackFailed { version: String },

    #[error("Neither phpenv nor PHPBrew installed.")]
    NoManagerInstalled,

    #[error(
        "Unable to run '{command}' against all PHP versions. Aborting.\n\
         This prerequisite can be disabled by setting the '{}' option.",
        SKIP_MISSING_VERSIONS_OPTION
    )]
    MissingVersionsPrerequisiteFailed { command: String },

    #[error("Command '{command}' failed with {}.", describe_exit(.code))]
    ExternalCommandFailed { command: String, code: Option<i32> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error stems from resolving the script or the declared
    /// versions. These are reported and turned into a failed run instead of
    /// being propagated.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::Blank { .. }
                | Error::ConfigurationNotParseable { .. }
                | Error::NoScriptsDefined
                | Error::ScriptNotResolvable
                | Error::VersionsNotResolvable
        )
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

/// Result type alias for multitest operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_kinds() {
        assert!(Error::NotFound { file: "composer.json".into() }.is_resolution());
        assert!(Error::Blank { file: ".travis.yml".into() }.is_resolution());
        assert!(Error::NoScriptsDefined.is_resolution());
        assert!(Error::VersionsNotResolvable.is_resolution());
        assert!(!Error::NoManagerInstalled.is_resolution());
        assert!(
            !Error::SwitchBackFailed {
                version: "7.1.0".into()
            }
            .is_resolution()
        );
    }

    #[test]
    fn test_prerequisite_message() {
        let error = Error::MissingVersionsPrerequisiteFailed {
            command: "composer cpe:test".to_string(),
        };
        insta::assert_snapshot!(error.to_string(), @r"
        Unable to run 'composer cpe:test' against all PHP versions. Aborting.
        This prerequisite can be disabled by setting the '--skip-missing-versions' option.
        ");
    }

    #[test]
    fn test_external_command_message() {
        let error = Error::ExternalCommandFailed {
            command: "composer test".to_string(),
            code: Some(2),
        };
        assert_eq!(
            error.to_string(),
            "Command 'composer test' failed with exit code 2."
        );

        let error = Error::ExternalCommandFailed {
            command: "composer test".to_string(),
            code: None,
        };
        assert_eq!(
            error.to_string(),
            "Command 'composer test' failed with termination by signal."
        );
    }
}
