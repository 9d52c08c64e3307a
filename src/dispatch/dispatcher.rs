//! Rule dispatch.
//!
//! Finds the first rule matching a candidate and runs its command. Every
//! failure on this path ends here: it is logged and counted, never returned
//! to the HTTP caller.

use std::panic::AssertUnwindSafe;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use tracing::Instrument;

use crate::dispatch::runner::{CommandRunner, Invocation, RunError};
use crate::http::request::Candidate;
use crate::observability::metrics;
use crate::routing::RuleSet;

/// Result of one dispatch.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// No rule matched; nothing ran.
    NoMatch,
    /// Rule `rule` matched and its command exited successfully.
    Completed { rule: usize, status: ExitStatus },
    /// Rule `rule` matched and its command failed.
    Failed { rule: usize, error: RunError },
}

impl DispatchOutcome {
    fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::NoMatch => "no_match",
            DispatchOutcome::Completed { .. } => "completed",
            DispatchOutcome::Failed { .. } => "failed",
        }
    }
}

/// Matches candidates against an immutable rule set and runs commands.
pub struct Dispatcher {
    rules: RuleSet,
    runner: Arc<dyn CommandRunner>,
}

impl Dispatcher {
    pub fn new(rules: RuleSet, runner: Arc<dyn CommandRunner>) -> Self {
        Self { rules, runner }
    }

    /// Run the first matching rule's command, if any, and wait for it.
    pub async fn dispatch(&self, candidate: &Candidate) -> DispatchOutcome {
        let Some(rule) = self.rules.first_match(candidate) else {
            tracing::debug!(page = %candidate.page, link = %candidate.link, "No rule matched");
            return DispatchOutcome::NoMatch;
        };

        let invocation = Invocation::new(&rule.command, &candidate.link);
        tracing::info!(rule = rule.index, command = %invocation, "Rule matched, running command");

        let start = Instant::now();
        let result = self.runner.run(invocation).await;
        metrics::record_command_duration(start);

        match result {
            Ok(status) => {
                tracing::debug!(rule = rule.index, %status, "Command finished");
                DispatchOutcome::Completed {
                    rule: rule.index,
                    status,
                }
            }
            Err(error) => {
                tracing::warn!(rule = rule.index, error = %error, "Command failed");
                DispatchOutcome::Failed {
                    rule: rule.index,
                    error,
                }
            }
        }
    }

    /// Dispatch inside a span, absorbing panics.
    ///
    /// This is what detached background tasks run; it always returns.
    pub async fn dispatch_guarded(self: Arc<Self>, candidate: Candidate, request_id: String) {
        let span = tracing::info_span!("dispatch", request_id = %request_id);
        let outcome = AssertUnwindSafe(self.dispatch(&candidate))
            .catch_unwind()
            .instrument(span)
            .await;

        match outcome {
            Ok(outcome) => metrics::record_dispatch(outcome.label()),
            Err(_) => {
                tracing::error!(request_id = %request_id, "Dispatch panicked");
                metrics::record_dispatch("panicked");
            }
        }
    }
}
