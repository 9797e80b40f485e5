//! # SNS Query-Protocol Web API
//!
//! HTTP surface that SNS client SDKs can be pointed at, plus emulator
//! controls for draining and resetting state.
//!
//! | Route          | Purpose                                  |
//! |----------------|------------------------------------------|
//! | `POST /`       | SNS action selected by the `Action` form field |
//! | `POST /drain`  | Deliver every stored message             |
//! | `DELETE /`     | Reset all state                          |
//! | `GET /health`  | Liveness and store counts                |

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod params;
pub mod response_types;
pub mod state;

pub use response_types::XmlResponse;
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::dispatch_action).delete(handlers::reset))
        .route("/drain", post(handlers::drain))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "Fake SNS listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
