//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse CLI → Load config → Validate → Compile rules → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Stop accepting → Drain connections → Exit
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Cli, StartupError};
