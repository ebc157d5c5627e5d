// file: src/invocation.rs
// version: 1.0.0
// guid: 8788183d-6f82-4638-8ab5-3e9ab3678f5f

//! One toolchain invocation, from parameters to [`ExecutionResult`]
//!
//! State machine:
//!
//! ```text
//! Idle -> ArgumentsBuilt -> ProcessStarted -> Streaming -> ProcessExited -> ResultFinalized
//!   \__________\__-> InvocationFailed
//! ```
//!
//! A start failure goes to `InvocationFailed` straight from `ArgumentsBuilt`.
//! Once the process has started, losing its handle still ends in
//! `ProcessExited` with the failure exit code and the events seen so far.
//! No state is entered twice.

use crate::arguments::{self, ArgumentVector};
use crate::error::{InvokeError, Result};
use crate::executor::Executor;
use crate::params::InvokeParameters;
use crate::reporter::{finalize, ExecutionResult, ReportSink, FAILURE_EXIT_CODE};
use crate::stream::StreamMultiplexer;
use crate::variant::CommandVariant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationState {
    Idle,
    ArgumentsBuilt,
    ProcessStarted,
    Streaming,
    ProcessExited,
    ResultFinalized,
    InvocationFailed,
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationState::ResultFinalized | InvocationState::InvocationFailed
        )
    }

    pub fn can_transition_to(&self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (*self, next),
            (Idle, ArgumentsBuilt)
                | (Idle, InvocationFailed)
                | (ArgumentsBuilt, ProcessStarted)
                | (ArgumentsBuilt, InvocationFailed)
                | (ProcessStarted, Streaming)
                | (Streaming, ProcessExited)
                | (ProcessExited, ResultFinalized)
        )
    }
}

/// Per-invocation state; nothing here is shared with other invocations
pub struct Invocation {
    id: Uuid,
    variant: CommandVariant,
    params: InvokeParameters,
    state: InvocationState,
    history: Vec<InvocationState>,
}

impl Invocation {
    pub fn new(variant: CommandVariant, params: InvokeParameters) -> Self {
        Self {
            id: Uuid::new_v4(),
            variant,
            params,
            state: InvocationState::Idle,
            history: vec![InvocationState::Idle],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variant(&self) -> CommandVariant {
        self.variant
    }

    pub fn params(&self) -> &InvokeParameters {
        &self.params
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Every state entered so far, in order
    pub fn history(&self) -> &[InvocationState] {
        &self.history
    }

    fn advance(&mut self, next: InvocationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(InvokeError::StateTransition {
                from: self.state,
                to: next,
            });
        }
        debug!("Invocation {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Build the argument vector for this invocation
    pub fn arguments(&self) -> ArgumentVector {
        arguments::build(&self.params, self.variant)
    }

    /// Run the toolchain to completion, forwarding events to `sink` as they
    /// arrive. Only state-machine misuse is an `Err`; start failures and
    /// non-zero exits are part of the returned result.
    pub async fn run<S: ReportSink>(
        &mut self,
        executor: &Executor,
        sink: &mut S,
    ) -> Result<ExecutionResult> {
        let span = tracing::info_span!("invocation", id = %self.id, command = %self.variant);
        self.run_inner(executor, sink).instrument(span).await
    }

    async fn run_inner<S: ReportSink>(
        &mut self,
        executor: &Executor,
        sink: &mut S,
    ) -> Result<ExecutionResult> {
        let args = self.arguments();
        self.advance(InvocationState::ArgumentsBuilt)?;

        info!(
            "Invoking {} {} (configuration {})",
            executor.program(),
            self.variant,
            self.params.configuration
        );
        if self.params.push.any() {
            info!(
                "Push destinations requested: {}",
                self.params.push.names().join(", ")
            );
        }

        let (mux, mut feed) = StreamMultiplexer::with_feed();
        let program = executor.program().to_string();

        let process = match executor.spawn(&program, &args, self.params.interactive, &mux) {
            Ok(process) => process,
            Err(failure) => {
                error!("Could not start {}: {}", program, failure);
                self.advance(InvocationState::InvocationFailed)?;
                let result = finalize(FAILURE_EXIT_CODE, Vec::new(), Some(failure));
                sink.on_result(&result);
                return Ok(result);
            }
        };
        self.advance(InvocationState::ProcessStarted)?;
        self.advance(InvocationState::Streaming)?;

        let wait = process.wait();
        tokio::pin!(wait);

        let exit = loop {
            tokio::select! {
                Some(event) = feed.recv() => sink.on_event(&event),
                exit = &mut wait => break exit,
            }
        };

        // Readers are finished or detached by now; flush what the loop has not seen yet
        mux.close_feed();
        while let Some(event) = feed.recv().await {
            sink.on_event(&event);
        }

        let code = exit.unwrap_or_else(|failure| {
            error!("Lost track of {}: {}", program, failure);
            FAILURE_EXIT_CODE
        });
        self.advance(InvocationState::ProcessExited)?;

        let result = finalize(code, mux.take_events(), None);
        self.advance(InvocationState::ResultFinalized)?;

        sink.on_result(&result);
        Ok(result)
    }
}
