// file: src/executor.rs
// version: 1.0.0
// guid: 94bab4cd-8666-4c1d-a366-e123899a36bf

//! Toolchain process launcher
//!
//! Starts exactly one child per call with piped stdout/stderr attached to a
//! [`StreamMultiplexer`] and waits for it to exit. Failing to start the child
//! is reported as an [`InvocationFailure`]; a non-zero exit is not an error.

use crate::arguments;
use crate::config::Config;
use crate::reporter::{FailureKind, InvocationFailure, FAILURE_EXIT_CODE};
use crate::stream::{Source, StreamMultiplexer};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Launches the toolchain with fixed working directory and environment policy
pub struct Executor {
    config: Config,
}

/// A started child whose output is being captured
pub struct RunningProcess {
    program: String,
    child: Child,
    readers: Vec<JoinHandle<std::io::Result<u64>>>,
    drain: Duration,
}

impl Executor {
    /// Create a new executor with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configured toolchain executable name
    pub fn program(&self) -> &str {
        &self.config.general.executable
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `program` on the search path. A name with a path separator is
    /// used as given so the spawn reports why it cannot be started.
    pub fn resolve(&self, program: &str) -> Result<PathBuf, InvocationFailure> {
        if has_path_separator(program) {
            return Ok(PathBuf::from(program));
        }

        let resolved = match &self.config.general.working_directory {
            Some(dir) => which::which_in(program, std::env::var_os("PATH"), dir),
            None => which::which(program),
        };

        resolved.map_err(|e| {
            InvocationFailure::new(
                FailureKind::NotFound,
                program,
                format!("not found on the search path ({})", e),
            )
        })
    }

    /// Start `program` with `args`. stdin is inherited only for interactive runs.
    pub fn spawn(
        &self,
        program: &str,
        args: &[String],
        interactive: bool,
        mux: &StreamMultiplexer,
    ) -> Result<RunningProcess, InvocationFailure> {
        let resolved = self.resolve(program)?;
        debug!("Resolved {} to {}", program, resolved.display());

        let mut cmd = Command::new(&resolved);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if interactive {
                Stdio::inherit()
            } else {
                Stdio::null()
            });

        // Set working directory if specified
        if let Some(ref wd) = self.config.general.working_directory {
            cmd.current_dir(wd);
        }

        self.apply_environment(&mut cmd);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        info!("Starting process: {}", arguments::display(program, args));

        let mut child = cmd
            .spawn()
            .map_err(|e| InvocationFailure::from_spawn_error(program, &e))?;

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(mux.attach(Source::Stdout, stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(mux.attach(Source::Stderr, stderr));
        }

        debug!("Process {} started with pid {:?}", program, child.id());

        Ok(RunningProcess {
            program: program.to_string(),
            child,
            readers,
            drain: Duration::from_millis(self.config.execution.output_drain_ms),
        })
    }

    /// Start `program` and wait for it to exit, returning its exit code
    pub async fn invoke(
        &self,
        program: &str,
        args: &[String],
        interactive: bool,
        mux: &StreamMultiplexer,
    ) -> Result<i32, InvocationFailure> {
        self.spawn(program, args, interactive, mux)?.wait().await
    }

    /// Inherit the environment, or reduce it to the allowlist when isolated
    fn apply_environment(&self, cmd: &mut Command) {
        if !self.config.execution.isolate_environment {
            return;
        }

        cmd.env_clear();
        for var in &self.config.execution.environment_allowlist {
            if let Some(value) = std::env::var_os(var) {
                cmd.env(var, value);
            }
        }
        info!(
            "Isolated child environment to {} allowlisted variables",
            self.config.execution.environment_allowlist.len()
        );
    }
}

impl RunningProcess {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for exit, then give both readers the drain window to reach EOF.
    /// Readers still blocked after that (a descendant holds the pipe) are
    /// aborted; lines they already recorded are kept.
    pub async fn wait(mut self) -> Result<i32, InvocationFailure> {
        let status = self.child.wait().await.map_err(|e| {
            InvocationFailure::new(
                FailureKind::Io,
                &self.program,
                format!("failed to wait for process: {}", e),
            )
        })?;

        let deadline = Instant::now() + self.drain;
        for mut reader in self.readers {
            match timeout_at(deadline, &mut reader).await {
                Ok(Ok(Ok(_))) => {}
                Ok(Ok(Err(e))) => warn!("Output reader for {} failed: {}", self.program, e),
                Ok(Err(e)) => warn!("Output reader for {} panicked: {}", self.program, e),
                Err(_) => {
                    warn!(
                        "Output of {} still open {:?} after exit, detaching from it",
                        self.program, self.drain
                    );
                    reader.abort();
                }
            }
        }

        let code = exit_code(status);
        info!("Finished process: {} (exit code {})", self.program, code);
        Ok(code)
    }
}

fn has_path_separator(program: &str) -> bool {
    program.contains('/') || program.contains(std::path::MAIN_SEPARATOR)
}

/// Native exit code; on unix a signal death maps to 128 + signal
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            warn!("Process terminated by signal {}", signal);
            return 128 + signal;
        }
    }

    FAILURE_EXIT_CODE
}
