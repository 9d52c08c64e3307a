//! Configuration schema definitions.
//!
//! This module defines the on-disk JSON shape of the dispatcher config.
//! All types derive Serde traits so a config can be written back out and
//! re-read without loss.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// TCP port to listen on (e.g., "8080").
    pub port: String,

    /// Ordered rules. First match wins.
    #[serde(rename = "commands", default)]
    pub rules: Vec<RuleConfig>,
}

impl Config {
    /// Socket address the HTTP front end binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// A single rule: when both glob lists match, run `command`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Globs tested against the candidate page.
    #[serde(rename = "page", default)]
    pub page_globs: Vec<String>,

    /// Globs tested against the candidate link.
    #[serde(rename = "link", default)]
    pub link_globs: Vec<String>,

    /// Command to run on match.
    pub command: CommandConfig,
}

/// External command definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandConfig {
    /// Executable name or path.
    pub name: String,

    /// Fixed arguments. The matched link is appended after these.
    #[serde(default)]
    pub args: Vec<String>,
}
