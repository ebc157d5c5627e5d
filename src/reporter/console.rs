// file: src/reporter/console.rs
// version: 1.0.0
// guid: 7938c7a8-75e5-4821-9352-f33a86f96c4c

//! Terminal sink for invocation events

use super::{ExecutionResult, ReportSink};
use crate::params::Verbosity;
use crate::stream::{Channel, Event};
use colored::Colorize;
use std::io::{self, Write};
use tracing::warn;

/// Where a rendered line goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// Prints events as they arrive: errors and warnings to stderr, information
/// to stdout, verbose and debug only at the matching verbosity.
pub struct ConsoleReporter<O: Write = io::Stdout, E: Write = io::Stderr> {
    verbosity: Verbosity,
    tags: Vec<String>,
    json: bool,
    out: O,
    err: E,
}

impl ConsoleReporter {
    pub fn new(verbosity: Verbosity, tags: Vec<String>, json: bool) -> Self {
        Self::with_writers(verbosity, tags, json, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn with_writers(verbosity: Verbosity, tags: Vec<String>, json: bool, out: O, err: E) -> Self {
        Self {
            verbosity,
            tags,
            json,
            out,
            err,
        }
    }

    /// Rendered line for `event`, or `None` when the verbosity hides it
    pub fn render(&self, event: &Event) -> Option<(Stream, String)> {
        match event.channel {
            Channel::Error => Some((
                Stream::Err,
                format!("{} {}", "error:".red().bold(), event.message),
            )),
            Channel::Warning => Some((
                Stream::Err,
                format!("{} {}", "warning:".yellow().bold(), event.message),
            )),
            Channel::Information if self.tags.is_empty() => Some((Stream::Out, event.message.clone())),
            Channel::Information => {
                let tags = format!("[{}]", self.tags.join(","));
                Some((Stream::Out, format!("{} {}", tags.as_str().dimmed(), event.message)))
            }
            Channel::Verbose if self.verbosity >= Verbosity::Detailed => Some((
                Stream::Out,
                format!("{} {}", "verbose:".cyan(), event.message),
            )),
            Channel::Debug if self.verbosity >= Verbosity::Diagnostic => Some((
                Stream::Out,
                format!("{} {}", "debug:".magenta(), event.message),
            )),
            Channel::Verbose | Channel::Debug => None,
        }
    }

    fn write_line(&mut self, stream: Stream, line: &str) {
        let written = match stream {
            Stream::Out => writeln!(self.out, "{}", line),
            Stream::Err => writeln!(self.err, "{}", line),
        };
        if let Err(e) = written {
            warn!("Failed to write to console: {}", e);
        }
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> ReportSink for ConsoleReporter<O, E> {
    fn on_event(&mut self, event: &Event) {
        if self.json {
            return;
        }
        if let Some((stream, line)) = self.render(event) {
            self.write_line(stream, &line);
        }
    }

    fn on_result(&mut self, result: &ExecutionResult) {
        if self.json {
            match result.to_json() {
                Ok(json) => self.write_line(Stream::Out, &json),
                Err(e) => self.write_line(Stream::Err, &format!("failed to serialize result: {}", e)),
            }
            return;
        }

        let warnings = result.warnings().count();
        let errors = result.errors().count();

        let summary = if let Some(failure) = &result.invocation_failure {
            (Stream::Err, format!("{} {}", "✗".red().bold(), failure))
        } else if result.exit_code == 0 {
            (
                Stream::Out,
                format!(
                    "{} Succeeded ({} warning(s), {} error(s))",
                    "✓".green().bold(),
                    warnings,
                    errors
                ),
            )
        } else {
            (
                Stream::Err,
                format!(
                    "{} Failed with exit code {} ({} warning(s), {} error(s))",
                    "✗".red().bold(),
                    result.exit_code,
                    warnings,
                    errors
                ),
            )
        };
        self.write_line(summary.0, &summary.1);
    }
}
