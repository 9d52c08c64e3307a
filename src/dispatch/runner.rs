//! External command execution.
//!
//! # Responsibilities
//! - Build the argument vector (static args, then the link)
//! - Launch the program and wait for it to exit
//! - Classify launch failures and non-zero exits
//!
//! # Design Decisions
//! - No retry, no timeout, no output capture
//! - Child stdio is discarded; cwd and environment are inherited
//! - `CommandRunner` is a trait so dispatch can be tested without processes

use std::process::{ExitStatus, Stdio};

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::process::Command;

use crate::config::CommandConfig;

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `command.args` followed by `link`.
    pub fn new(command: &CommandConfig, link: &str) -> Self {
        let mut args = Vec::with_capacity(command.args.len() + 1);
        args.extend(command.args.iter().cloned());
        args.push(link.to_string());
        Self {
            program: command.name.clone(),
            args,
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("command not found: {program}")]
    NotFound { program: String },

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    NonZeroExit { program: String, status: ExitStatus },
}

/// Executes invocations.
pub trait CommandRunner: Send + Sync {
    /// Run to completion. Resolves to the exit status on success.
    fn run(&self, invocation: Invocation) -> BoxFuture<'static, Result<ExitStatus, RunError>>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: Invocation) -> BoxFuture<'static, Result<ExitStatus, RunError>> {
        Box::pin(run_process(invocation))
    }
}

async fn run_process(invocation: Invocation) -> Result<ExitStatus, RunError> {
    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RunError::NotFound {
                    program: invocation.program.clone(),
                }
            } else {
                RunError::Spawn {
                    program: invocation.program.clone(),
                    source,
                }
            }
        })?;

    if status.success() {
        Ok(status)
    } else {
        Err(RunError::NonZeroExit {
            program: invocation.program,
            status,
        })
    }
}
