//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.<os>.json
//!     → loader.rs (pick file by OS, read & deserialize)
//!     → validation.rs (port, command names, glob syntax)
//!     → Config (validated, immutable)
//!     → compiled into routing::RuleSet and shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - Unknown OS is fatal; there is no default file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError};
pub use schema::{CommandConfig, Config, RuleConfig};
pub use validation::ValidationError;
