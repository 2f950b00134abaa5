//! Blocking subprocess execution behind a trait so managers can be driven by
//! scripted executors in tests.

use std::io::{self, BufRead, BufReader};
use std::process::Stdio;

use tracing::debug;

use super::ShellCommand;
use crate::error::Result;

/// Exit code and captured standard output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn new(code: Option<i32>, stdout: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion
pub trait CommandExecutor {
    /// Run the command and capture its standard output
    fn run(&self, command: &ShellCommand) -> Result<CommandOutput>;

    /// Run the command, handing every line of standard output to `on_line`
    /// as soon as it is read. The returned output still holds everything
    /// that was printed.
    fn stream(
        &self,
        command: &ShellCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput>;
}

/// Executor backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&self, command: &ShellCommand) -> Result<CommandOutput> {
        debug!("Running: {}", command.command_line());

        let output = command
            .to_command()
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        let result = CommandOutput::new(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
        );
        debug!(
            "'{}' exited with {:?}",
            command.command_line(),
            result.code
        );
        Ok(result)
    }

    fn stream(
        &self,
        command: &ShellCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput> {
        debug!("Streaming: {}", command.command_line());

        let mut child = command
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let mut accumulated = String::new();
        if let Some(stdout) = child.stdout.take() {
            if let Err(e) = relay_lines(BufReader::new(stdout), &mut accumulated, on_line) {
                debug!("Reading from '{}' failed: {}", command.command_line(), e);
                // Reap the child before giving up on it.
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        }

        // The pipe is drained, so waiting cannot dead-lock on a full buffer.
        let status = child.wait()?;
        debug!(
            "'{}' exited with {:?}",
            command.command_line(),
            status.code()
        );

        Ok(CommandOutput::new(status.code(), accumulated))
    }
}

/// Hand every line of `reader` to `on_line` without its line ending, keeping
/// the raw text in `accumulated`
fn relay_lines(
    mut reader: impl BufRead,
    accumulated: &mut String,
    on_line: &mut dyn FnMut(&str),
) -> io::Result<()> {
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buffer);
        accumulated.push_str(&line);
        on_line(line.trim_end_matches(['\n', '\r']));
    }
}
