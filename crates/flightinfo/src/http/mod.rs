//! HTTP surface for flightinfo.
//!
//! Builds the `axum` router over a [`FlightQueryService`] and runs it until
//! Ctrl-C. Success bodies are JSON; failure bodies are plain text.

pub mod handlers;

use std::future::Future;

use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::service::{FlightQueryService, QueryError};

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// The API routes, relative to the base path.
fn api_routes() -> Router<FlightQueryService> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/flights", get(handlers::list_flights))
        .route("/flights/search", get(handlers::search_flights))
        .route("/flights/stats", get(handlers::flight_statistics))
        .route("/flights/:id", get(handlers::get_flight))
        .route("/logs/test", get(handlers::log_test))
}

/// Create the application router.
///
/// Routes are mounted under `config.base_path`, which must already have been
/// validated.
pub fn router(service: FlightQueryService, config: &ServerConfig) -> Router {
    let api = api_routes();
    let app = if config.base_path == "/" {
        api
    } else {
        Router::new().nest(&config.base_path, api)
    };

    app.fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .with_state(service)
}

async fn not_found(uri: OriginalUri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("not found: {}", uri.0.path()))
}

/// Bind to `config.addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if `config` fails validation or the server cannot bind
/// or run.
pub async fn serve(config: &ServerConfig, service: FlightQueryService) -> Result<()> {
    config.validate()?;
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| Error::server(format!("failed to bind {}", config.addr), source))?;

    serve_on(listener, router(service, config), shutdown_signal()).await
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the server fails.
pub async fn serve_on(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|source| Error::server("failed to read listener address", source))?;
    info!("Starting HTTP server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| Error::server("HTTP server stopped unexpectedly", source))?;

    info!("HTTP server has been shut down");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    info!("Starting graceful shutdown for HTTP server...");
}
