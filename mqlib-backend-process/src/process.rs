//! `ProcessBackend` implementation that drives a solver executable.

use std::io::{self, Write};
use std::process::{Command, Output, Stdio};
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use mqlib_core::{
    BackendError, BackendErrorKind, HeuristicBackend, Instance, Invocation, MetricColumns,
    RawCatalog, RunOutcome,
};
use serde::de::DeserializeOwned;

use crate::protocol::{CatalogReply, MetricsReply, Reply, Request, RunReply};

/// Solver reached by spawning `program` once per call.
///
/// The request is written to the child's stdin as a single JSON document and
/// the reply is read from its stdout once the child exits. Spawn failures,
/// non-zero exits and undecodable replies surface as
/// [`BackendErrorKind::Internal`] errors carrying the child's stderr or the
/// decoder message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBackend {
    program: Utf8PathBuf,
    args: Vec<String>,
}

impl ProcessBackend {
    /// Drive the solver at `program`.
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a fixed argument passed on every spawn.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Path of the solver executable.
    #[must_use]
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// Fixed arguments passed on every spawn.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn call<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T, BackendError> {
        let payload = serde_json::to_vec(request)
            .map_err(|err| internal(format!("failed to encode request: {err}")))?;
        log::debug!("spawning solver {} ({} byte request)", self.program, payload.len());
        let output = self.exchange(&payload)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(internal(format!(
                "solver {} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let document = serde_json::from_slice(&output.stdout).map_err(|err| {
            internal(format!("solver {} replied with invalid JSON: {err}", self.program))
        })?;
        let reply: Reply<T> = Reply::from_value(document).map_err(|err| {
            internal(format!("solver {} sent a malformed reply: {err}", self.program))
        })?;
        reply.into_result()
    }

    /// Spawn the child, feed `payload` on stdin and collect its output.
    ///
    /// Stdin is written from a scoped thread while this thread drains stdout
    /// and stderr, so large instances cannot deadlock on full pipes.
    fn exchange(&self, payload: &[u8]) -> Result<Output, BackendError> {
        let mut child = Command::new(self.program.as_std_path())
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| internal(format!("failed to spawn solver {}: {err}", self.program)))?;
        let child_stdin = child.stdin.take();

        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || -> io::Result<()> {
                if let Some(mut pipe) = child_stdin {
                    pipe.write_all(payload)?;
                }
                Ok(())
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        match written {
            Ok(Ok(())) => {}
            // The exit status and reply decide the outcome when the child
            // stops reading early.
            Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("solver {} closed stdin early", self.program);
            }
            Ok(Err(err)) => {
                return Err(internal(format!(
                    "failed to write request to solver {}: {err}",
                    self.program
                )));
            }
            Err(_) => return Err(internal("request writer thread panicked")),
        }

        output.map_err(|err| internal(format!("failed to wait for solver {}: {err}", self.program)))
    }
}

fn internal(message: impl Into<String>) -> BackendError {
    BackendError::new(BackendErrorKind::Internal, message)
}

impl HeuristicBackend for ProcessBackend {
    fn heuristics(&self) -> Result<RawCatalog, BackendError> {
        self.call::<CatalogReply>(&Request::Heuristics)
            .map(RawCatalog::from)
    }

    fn instance_metrics(&self, instance: &Instance) -> Result<MetricColumns, BackendError> {
        self.call::<MetricsReply>(&Request::metrics(instance))
            .map(MetricColumns::from)
    }

    fn run_heuristic(&self, invocation: &Invocation<'_>) -> Result<RunOutcome, BackendError> {
        self.call::<RunReply>(&Request::run(invocation))
            .map(RunOutcome::from)
    }
}
