//! Rule matching subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Candidate (page, link)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (evaluate page + link globs)
//!     → Return: first matching rule or NoMatch
//!
//! Rule Compilation (at startup):
//!     RuleConfig[]
//!     → Compile globs once
//!     → Freeze as immutable RuleSet
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same rule
//! - First match wins (file order)

pub mod matcher;
pub mod router;

pub use router::{CompiledRule, RuleSet};
