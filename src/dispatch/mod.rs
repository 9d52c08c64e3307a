//! Command dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Candidate (from http::server, on a detached task)
//!     → dispatcher.rs (first matching rule via routing::RuleSet)
//!     → runner.rs (spawn `name args... link`, wait for exit)
//!     → log + metrics; nothing flows back to the HTTP caller
//! ```

pub mod dispatcher;
pub mod runner;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use runner::{CommandRunner, Invocation, ProcessRunner, RunError};
