//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the listen port
//! - Flag rules that can never match or never launch
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Globs are checked where they are compiled (`routing::RuleSet`), which
//!   reports them with the same `ValidationError` type
//! - An empty command name is only a warning; the launch fails per dispatch

use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic problem with a loaded config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid port {0:?}: expected a number between 0 and 65535")]
    InvalidPort(String),

    #[error("rule {rule}: invalid {field} glob {pattern:?}: {message}")]
    InvalidGlob {
        rule: usize,
        field: &'static str,
        pattern: String,
        message: String,
    },
}

/// Check a parsed config for semantic errors.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port.parse::<u16>().is_err() {
        errors.push(ValidationError::InvalidPort(config.port.clone()));
    }

    for (index, rule) in config.rules.iter().enumerate() {
        if rule.command.name.trim().is_empty() {
            tracing::warn!(rule = index, "Rule has an empty command name and will fail to launch");
        }

        for (field, globs) in [("page", &rule.page_globs), ("link", &rule.link_globs)] {
            if globs.is_empty() {
                tracing::warn!(
                    rule = index,
                    field,
                    "Rule has an empty glob list and will never match"
                );
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
