use std::path::{Path, PathBuf};
use std::process::Command;

/// A program invocation: program, arguments, working directory and extra
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl ShellCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    /// A command without arguments, as used for probing a tool
    pub fn bare(program: impl Into<String>) -> Self {
        Self::new(program, Vec::<String>::new())
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Render the command the way a user would type it in a shell
    pub fn command_line(&self) -> String {
        let mut cmd = quote(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote(arg));
        }
        cmd
    }

    /// Build the std `Command` for this invocation
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() {
        "''".to_string()
    } else if arg.chars().any(char::is_whitespace) {
        format!("'{arg}'")
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let cmd = ShellCommand::new("composer", ["cpe:test"]);
        assert_eq!(cmd.command_line(), "composer cpe:test");

        let cmd = ShellCommand::new("phpenv", ["global", "7.1.0"]);
        assert_eq!(cmd.command_line(), "phpenv global 7.1.0");
    }

    #[test]
    fn test_arguments_with_spaces_are_quoted() {
        let cmd = ShellCommand::new("/opt/php tools/phpbrew", ["use", "php-7.1.0"]);
        assert_eq!(cmd.command_line(), "'/opt/php tools/phpbrew' use php-7.1.0");
    }

    #[test]
    fn test_bare_command() {
        let cmd = ShellCommand::bare("phpenv");
        assert!(cmd.args.is_empty());
        assert_eq!(cmd.command_line(), "phpenv");
    }

    #[test]
    fn test_builder_methods() {
        let cmd = ShellCommand::new("composer", ["test"])
            .with_working_dir("/tmp/project")
            .with_env("COMPOSER_NO_INTERACTION", "1");

        assert_eq!(cmd.working_dir(), Some(Path::new("/tmp/project")));
        assert_eq!(
            cmd.env,
            vec![("COMPOSER_NO_INTERACTION".to_string(), "1".to_string())]
        );
    }
}
