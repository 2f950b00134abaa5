//! Test doubles for the executor and reporter seams

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

use crate::{
    command::{CommandExecutor, CommandOutput, ShellCommand},
    error::Result,
    report::Reporter,
};

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<CommandOutput>>,
    calls: Vec<String>,
}

/// Executor answering from a table of command lines. Responses for the same
/// command line are consumed in order and the last one is repeated. Commands
/// without a response fail to spawn, like a missing executable.
#[derive(Clone, Default)]
pub(crate) struct ScriptedExecutor {
    inner: Rc<RefCell<Script>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(self, command_line: &str, code: i32, stdout: &str) -> Self {
        self.inner
            .borrow_mut()
            .responses
            .entry(command_line.to_string())
            .or_default()
            .push_back(CommandOutput::new(Some(code), stdout));
        self
    }

    /// Every command line run so far, in order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub(crate) fn count(&self, command_line: &str) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|call| *call == command_line)
            .count()
    }

    fn respond(&self, command: &ShellCommand) -> Result<CommandOutput> {
        let command_line = command.command_line();
        let mut script = self.inner.borrow_mut();
        script.calls.push(command_line.clone());

        let queue = script.responses.get_mut(&command_line).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{command_line}: not found"))
        })?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        Ok(response.unwrap_or_default())
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn run(&self, command: &ShellCommand) -> Result<CommandOutput> {
        self.respond(command)
    }

    fn stream(
        &self,
        command: &ShellCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput> {
        let output = self.respond(command)?;
        for line in output.stdout.lines() {
            on_line(line);
        }
        Ok(output)
    }
}

/// Reporter keeping every line it was given
#[derive(Default)]
pub(crate) struct RecordingReporter {
    messages: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn write(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn write_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}
