//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the webhook handler on every path
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Decode candidates and answer immediately
//! - Hand decoded candidates to the dispatcher on detached tasks

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{Config, ConfigError};
use crate::dispatch::{CommandRunner, Dispatcher, ProcessRunner};
use crate::http::request::{self, Candidate};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::RuleSet;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP front end for the dispatcher.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that runs matched commands as child processes.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Create a server with a custom command runner.
    ///
    /// Compiles every rule; all malformed globs are reported together.
    pub fn with_runner(
        config: &Config,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, ConfigError> {
        let rules = RuleSet::from_config(&config.rules).map_err(ConfigError::Validation)?;
        tracing::info!(rules = rules.len(), "Rules compiled");

        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(rules, runner)),
        };

        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(webhook_handler))
            .route("/", any(webhook_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request::set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(request::propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Webhook handler.
/// Decodes the candidate, answers at once, dispatches in the background.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = request::request_id(&headers);

    let candidate = match Candidate::from_body(&body) {
        Ok(candidate) => candidate,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected malformed body");
            metrics::record_request(400);
            return response::bad_request();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        page = %candidate.page,
        link = %candidate.link,
        "Candidate accepted"
    );

    let dispatcher = state.dispatcher.clone();
    tokio::spawn(dispatcher.dispatch_guarded(candidate, request_id));

    metrics::record_request(200);
    response::accepted()
}
