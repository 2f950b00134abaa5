//! Selects the Composer script to run from `composer.json`

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{display_name, read_manifest};
use crate::{
    command::ShellCommand,
    error::{Error, Result},
};

/// Script name suffixes, checked in this order for every name
const SCRIPT_SUFFIXES: [&str; 2] = ["test", "spec"];

/// The resolved test or spec script, run through Composer as `composer <name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    name: String,
    command: ShellCommand,
}

impl Script {
    pub fn new(name: impl Into<String>, command: ShellCommand) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }

    /// The script name as declared in `composer.json`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &ShellCommand {
        &self.command
    }

    pub fn command_line(&self) -> String {
        self.command.command_line()
    }
}

/// Whether a script name qualifies as the test or spec script. Namespaced
/// names such as `cpe:test` qualify, `cpe:test-all` does not.
pub fn is_test_or_spec_script(name: &str) -> bool {
    SCRIPT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Resolves the test or spec script from a project manifest
#[derive(Debug, Clone)]
pub struct ScriptResolver {
    program: String,
    working_dir: Option<PathBuf>,
}

impl Default for ScriptResolver {
    fn default() -> Self {
        Self::new("composer")
    }
}

impl ScriptResolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
        }
    }

    /// Directory the resolved script is run in
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn resolve(&self, manifest_path: &Path) -> Result<Script> {
        let file = display_name(manifest_path);
        let contents = read_manifest(manifest_path)?;

        if contents.trim().is_empty() {
            return Err(Error::Blank { file });
        }

        let manifest: Value = serde_json::from_str(&contents).map_err(|e| {
            debug!("Failed to parse {}: {}", file, e);
            Error::ConfigurationNotParseable { file: file.clone() }
        })?;

        let Some(scripts) = manifest.get("scripts").and_then(Value::as_object) else {
            return Err(Error::NoScriptsDefined);
        };

        // Declaration order is preserved by serde_json's `preserve_order`.
        let name = scripts
            .keys()
            .find(|name| is_test_or_spec_script(name))
            .ok_or(Error::ScriptNotResolvable)?;

        debug!("Resolved Composer script '{}' from {}", name, file);

        let mut command = ShellCommand::new(self.program.clone(), [name.clone()]);
        if let Some(ref dir) = self.working_dir {
            command = command.with_working_dir(dir.clone());
        }

        Ok(Script::new(name.clone(), command))
    }
}
