// file: src/reporter/mod.rs
// version: 1.0.0
// guid: 7b3647a6-a89f-4153-ab45-a71e666a0bd1

//! Result assembly and reporting
//!
//! [`finalize`] folds an exit code, the captured events and an optional
//! start-up failure into the single [`ExecutionResult`] handed back to the
//! caller. How each channel is surfaced is up to a [`ReportSink`].

pub mod console;

pub use console::ConsoleReporter;

use crate::stream::{Channel, Event};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Exit code reported when the toolchain could not be started at all
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Why a process could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Executable not on the search path
    NotFound,
    PermissionDenied,
    /// Any other error from the spawn call
    Spawn,
    /// The process ended without an exit code, or waiting on it failed
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::NotFound => "executable not found",
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::Spawn => "failed to start",
            FailureKind::Io => "process I/O failure",
        };
        f.write_str(text)
    }
}

/// Invocation-level failure: the toolchain never ran to completion
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {program}: {message}")]
pub struct InvocationFailure {
    pub kind: FailureKind,
    pub program: String,
    pub message: String,
}

impl InvocationFailure {
    pub fn new(kind: FailureKind, program: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            program: program.into(),
            message: message.into(),
        }
    }

    /// Map a spawn error onto the failure taxonomy
    pub fn from_spawn_error(program: &str, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => FailureKind::NotFound,
            std::io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            _ => FailureKind::Spawn,
        };
        Self::new(kind, program, err.to_string())
    }
}

/// Outcome of one invocation. Created once, when the process has exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub events: Vec<Event>,
    pub invocation_failure: Option<InvocationFailure>,
}

impl ExecutionResult {
    /// Exit code zero and the process actually ran
    pub fn succeeded(&self) -> bool {
        self.invocation_failure.is_none() && self.exit_code == 0
    }

    /// Events on `channel`, in sequence order
    pub fn on_channel(&self, channel: Channel) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.channel == channel)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Event> {
        self.on_channel(Channel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Event> {
        self.on_channel(Channel::Warning)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Combine exit status, captured events and start-up failure. A failure
/// forces [`FAILURE_EXIT_CODE`] and drops any events; otherwise this is pure
/// aggregation.
pub fn finalize(
    exit_code: i32,
    events: Vec<Event>,
    invocation_failure: Option<InvocationFailure>,
) -> ExecutionResult {
    match invocation_failure {
        Some(failure) => ExecutionResult {
            exit_code: FAILURE_EXIT_CODE,
            events: Vec::new(),
            invocation_failure: Some(failure),
        },
        None => ExecutionResult {
            exit_code,
            events,
            invocation_failure: None,
        },
    }
}

/// Host reporting primitives
pub trait ReportSink {
    /// Called for each event as it arrives
    fn on_event(&mut self, event: &Event);

    /// Called once with the final result
    fn on_result(&mut self, result: &ExecutionResult);
}
