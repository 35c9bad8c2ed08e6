//! CLI invoker trait and implementations
//!
//! Provides a trait for executing the ironic CLI, with:
//! - Real implementation using tokio::process
//! - Mock implementation for testing
//! - Per-attempt timeout enforcement

use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::credentials::AuthEnv;

/// Executable invoked when no override is configured
pub const DEFAULT_PROGRAM: &str = "ironic";

/// Per-attempt execution timeout in seconds
pub const CLI_TIMEOUT_SECS: u64 = 30;

/// Output from CLI execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Trait for CLI command execution (testable)
#[async_trait]
pub trait CliInvoker: Send + Sync {
    async fn invoke(&self, args: &[String], env: &AuthEnv) -> Result<Output, InvokeError>;
}

/// Error during CLI invocation
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command not found: {0}")]
    NotFound(String),

    #[error("ironic exited with status {status}: {message}")]
    Failed { status: i32, message: String },

    #[error("ironic did not finish within {seconds}s")]
    Timeout { seconds: u64 },
}

impl InvokeError {
    /// Failure text inspected by the retry classifier
    pub fn message(&self) -> String {
        match self {
            Self::Failed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Build from an error message alone (scripted failures)
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            status: 1,
            message: message.into(),
        }
    }
}

/// Real CLI invoker using tokio::process
#[derive(Debug, Clone)]
pub struct RealInvoker {
    program: String,
}

impl RealInvoker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for RealInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl CliInvoker for RealInvoker {
    async fn invoke(&self, args: &[String], env: &AuthEnv) -> Result<Output, InvokeError> {
        let child = Command::new(&self.program)
            .args(args)
            .envs(env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => InvokeError::NotFound(self.program.clone()),
                _ => InvokeError::Io(e),
            })?;

        let output = child.wait_with_output().await?;
        let out = Output {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if out.status != 0 {
            return Err(InvokeError::Failed {
                status: out.status,
                message: failure_message(&out),
            });
        }

        Ok(out)
    }
}

/// stderr followed by stdout; the CLI does not pick one stream for errors
fn failure_message(out: &Output) -> String {
    [out.stderr.trim(), out.stdout.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recorded call made against a [`MockInvoker`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub args: Vec<String>,
    pub env: AuthEnv,
}

/// Mock CLI invoker for testing
///
/// Replays scripted results in order and records every call. Once the script
/// runs out, each call succeeds with empty output.
#[derive(Default)]
pub struct MockInvoker {
    responses: Mutex<VecDeque<Result<Output, InvokeError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response to return on the next invocation
    pub fn add_response(&self, output: Output) {
        self.push(Ok(output));
    }

    /// Add a failure to return on the next invocation
    pub fn add_failure(&self, error: InvokeError) {
        self.push(Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn push(&self, result: Result<Output, InvokeError>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(result);
        }
    }
}

#[async_trait]
impl CliInvoker for MockInvoker {
    async fn invoke(&self, args: &[String], env: &AuthEnv) -> Result<Output, InvokeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                args: args.to_vec(),
                env: env.clone(),
            });
        }

        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());
        next.unwrap_or_else(|| Ok(Output::default()))
    }
}

/// Execute a single attempt with a timeout
pub async fn execute_with_timeout(
    invoker: &dyn CliInvoker,
    args: &[String],
    env: &AuthEnv,
    timeout: Duration,
) -> Result<Output, InvokeError> {
    match tokio::time::timeout(timeout, invoker.invoke(args, env)).await {
        Ok(result) => result,
        Err(_) => Err(InvokeError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}
