//! Binary entrypoint for the flowsync HTTP server.
//!
//! Reads configuration from environment variables:
//! - `FLOWSYNC_HOST`: listen address (default: "0.0.0.0")
//! - `FLOWSYNC_PORT`: listen port (default: "3000")

use flowsync_server::router::build_router;
use flowsync_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let host = std::env::var("FLOWSYNC_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("FLOWSYNC_PORT").unwrap_or_else(|_| "3000".to_string());

    let app = build_router(AppState::in_memory());

    let addr = format!("{}:{}", host, port);
    tracing::info!("flowsync server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
