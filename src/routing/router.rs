//! Rule lookup.
//!
//! # Responsibilities
//! - Store compiled rules in file order
//! - Look up the first rule matching a candidate
//! - Return matched rule or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan; rule lists are small and hand-written
//! - Later matching rules are never evaluated

use crate::config::{CommandConfig, RuleConfig, ValidationError};
use crate::http::request::Candidate;
use crate::routing::matcher::{AndMatcher, Field, GlobMatcher, Matcher};

/// A rule with its globs compiled.
#[derive(Debug)]
pub struct CompiledRule {
    /// Position in the config file.
    pub index: usize,
    pub command: CommandConfig,
    matcher: AndMatcher,
}

impl CompiledRule {
    /// Compile a rule from config, reporting every malformed glob.
    pub fn compile(index: usize, config: &RuleConfig) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut compile = |field: Field, globs: &[String]| {
            GlobMatcher::new(field, globs)
                .map_err(|e| {
                    errors.extend(e.into_iter().map(|e| ValidationError::InvalidGlob {
                        rule: index,
                        field: field.name(),
                        pattern: e.pattern,
                        message: e.message,
                    }))
                })
                .ok()
        };
        let page = compile(Field::Page, config.page_globs.as_slice());
        let link = compile(Field::Link, config.link_globs.as_slice());

        match (page, link) {
            (Some(page), Some(link)) => Ok(Self {
                index,
                command: config.command.clone(),
                matcher: AndMatcher::new(vec![Box::new(page), Box::new(link)]),
            }),
            _ => Err(errors),
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.matcher.matches(candidate)
    }
}

/// Ordered, immutable set of compiled rules.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile all rules, preserving order. Collects every glob error.
    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, Vec<ValidationError>> {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut errors = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            match CompiledRule::compile(index, rule) {
                Ok(rule) => compiled.push(rule),
                Err(e) => errors.extend(e),
            }
        }

        if errors.is_empty() {
            Ok(Self { rules: compiled })
        } else {
            Err(errors)
        }
    }

    /// First rule matching the candidate, if any.
    pub fn first_match(&self, candidate: &Candidate) -> Option<&CompiledRule> {
        self.rules.iter().find(|rule| rule.matches(candidate))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
