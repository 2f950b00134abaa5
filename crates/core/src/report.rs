//! User-facing progress and error lines

/// Sink for the plain-text lines a run shows to the user
pub trait Reporter {
    fn write(&self, message: &str);

    fn write_error(&self, message: &str);
}

/// Writes progress to stdout and errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn write(&self, message: &str) {
        println!("{message}");
    }

    fn write_error(&self, message: &str) {
        eprintln!("{message}");
    }
}
