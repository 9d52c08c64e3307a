//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, decode Candidate)
//!     → response.rs (200 + CORS, or bare 400)
//!     → Send to client
//!     → [dispatch runs afterwards on its own task]
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Candidate, DecodeError, X_REQUEST_ID};
pub use server::HttpServer;
