//! The single-page web UI.
//!
//! | Route      | Method | Purpose                                 |
//! |------------|--------|-----------------------------------------|
//! | `/`        | GET    | Upload form                             |
//! | `/stylize` | POST   | Multipart upload, returns result page   |
//! | `/health`  | GET    | JSON status with model variant/device   |

mod error;
mod handlers;
mod page;
mod state;

pub use error::{AppError, AppResult, PageError};
pub use page::{present, upload_page};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;

/// Build the application router with its middleware stack.
pub fn router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(handlers::index))
        .route("/stylize", post(handlers::stylize))
        .route("/health", get(handlers::health_check))
        // -- Middleware stack (applied bottom-up) --
        .layer(DefaultBodyLimit::max(body_limit))
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Bind the configured address and serve until SIGINT or SIGTERM.
///
/// The host may be an IP address or a name such as `localhost`.
///
/// # Errors
///
/// Returns an error if the host does not resolve or cannot be bound.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let listener = bind(&state.config).await?;
    tracing::info!(addr = %listener.local_addr()?, "Starting server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Bind a listener on the configured host and port.
async fn bind(config: &ServerConfig) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
