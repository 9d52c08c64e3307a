//! Candidate matching logic.
//!
//! # Responsibilities
//! - Match the candidate page against a list of globs
//! - Match the candidate link against a list of globs
//! - Combine conditions with AND semantics
//!
//! # Glob Dialect
//! - `*` matches any run of characters, including `/`; `**` is the same as `*`
//! - `?` matches one character
//! - `[abc]`, `[a-z]`, `[!a-z]` character classes
//! - `{a,b,c}` alternatives, nestable
//! - `\` escapes the next character
//!
//! # Design Decisions
//! - Globs match the whole string, never a substring
//! - Matching is case-sensitive
//! - Alternatives and escapes are rewritten into plain `glob::Pattern`s at
//!   compile time; one config glob may become several patterns
//! - Empty glob list = never matches (a rule with one is dead)

use glob::{MatchOptions, Pattern};
use thiserror::Error;

use crate::http::request::Candidate;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Trait for matching candidates against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the candidate matches this condition.
    fn matches(&self, candidate: &Candidate) -> bool;
}

/// Which candidate field a glob list is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Page,
    Link,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Page => "page",
            Field::Link => "link",
        }
    }

    fn select(self, candidate: &Candidate) -> &str {
        match self {
            Field::Page => &candidate.page,
            Field::Link => &candidate.link,
        }
    }
}

/// A glob that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glob {pattern:?}: {message}")]
pub struct GlobError {
    pub pattern: String,
    pub message: String,
}

/// Compile one config glob into the patterns it stands for.
pub fn compile_glob(glob: &str) -> Result<Vec<Pattern>, GlobError> {
    let error = |message: &str| GlobError {
        pattern: glob.to_string(),
        message: message.to_string(),
    };

    let chars: Vec<char> = glob.chars().collect();
    let mut pos = 0;
    let expanded = expand(&chars, &mut pos, false).map_err(error)?;

    expanded
        .iter()
        .map(|source| Pattern::new(&collapse_stars(source)).map_err(|e| error(e.msg)))
        .collect()
}

/// Expand alternatives and escapes from `pos` until the end of input, or
/// until a `,` or `}` that closes the enclosing alternative when `nested`.
fn expand(chars: &[char], pos: &mut usize, nested: bool) -> Result<Vec<String>, &'static str> {
    let mut out = vec![String::new()];

    while let Some(&c) = chars.get(*pos) {
        match c {
            ',' | '}' if nested => break,
            '\\' => {
                let escaped = *chars.get(*pos + 1).ok_or("dangling escape at end of glob")?;
                *pos += 2;
                let literal = match escaped {
                    '*' | '?' | '[' | ']' => format!("[{escaped}]"),
                    other => other.to_string(),
                };
                push_all(&mut out, &literal);
            }
            '{' => {
                *pos += 1;
                let mut alternatives = Vec::new();
                loop {
                    alternatives.extend(expand(chars, pos, true)?);
                    match chars.get(*pos) {
                        Some(',') => *pos += 1,
                        Some('}') => {
                            *pos += 1;
                            break;
                        }
                        _ => return Err("unclosed '{'"),
                    }
                }
                out = out
                    .iter()
                    .flat_map(|prefix| alternatives.iter().map(move |alt| format!("{prefix}{alt}")))
                    .collect();
            }
            '[' => {
                // Class contents are copied verbatim; `{`, `,` and `\` inside stay literal.
                let end = class_end(chars, *pos).ok_or("unclosed '['")?;
                let class: String = chars[*pos..=end].iter().collect();
                *pos = end + 1;
                push_all(&mut out, &class);
            }
            other => {
                *pos += 1;
                push_all(&mut out, &other.to_string());
            }
        }
    }

    Ok(out)
}

/// Index of the `]` closing the class opened at `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if chars.get(i) == Some(&'!') {
        i += 1;
    }
    // A `]` straight after the opening is a member, not the close.
    i += 1;
    (i..chars.len()).find(|&j| chars[j] == ']')
}

fn push_all(out: &mut [String], text: &str) {
    for s in out.iter_mut() {
        s.push_str(text);
    }
}

/// Fold runs of `*` into one; `glob` reserves `**` for path components.
fn collapse_stars(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Matches one candidate field against any of a list of globs.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    field: Field,
    patterns: Vec<Pattern>,
}

impl GlobMatcher {
    /// Compile a glob list for `field`, reporting every malformed glob.
    pub fn new<S: AsRef<str>>(field: Field, globs: &[S]) -> Result<Self, Vec<GlobError>> {
        let mut patterns = Vec::with_capacity(globs.len());
        let mut errors = Vec::new();
        for glob in globs {
            match compile_glob(glob.as_ref()) {
                Ok(compiled) => patterns.extend(compiled),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(Self { field, patterns })
        } else {
            Err(errors)
        }
    }

    /// Returns true if any glob matches the whole of `value`.
    pub fn matches_str(&self, value: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(value, MATCH_OPTIONS))
    }
}

impl Matcher for GlobMatcher {
    fn matches(&self, candidate: &Candidate) -> bool {
        self.matches_str(self.field.select(candidate))
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, candidate: &Candidate) -> bool {
        self.matchers.iter().all(|m| m.matches(candidate))
    }
}
