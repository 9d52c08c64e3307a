//! Webhook-triggered command dispatcher library.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::Config;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
