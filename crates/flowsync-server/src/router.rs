//! Router assembly for the flowsync HTTP API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the axum router with all graph routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/workspaces/{workspace_id}/graphs",
            get(handlers::graphs::list_graphs).post(handlers::graphs::create_graph),
        )
        .route(
            "/workspaces/{workspace_id}/graphs/{graph_id}",
            get(handlers::graphs::get_graph).delete(handlers::graphs::delete_graph),
        )
        .route(
            "/workspaces/{workspace_id}/graphs/{graph_id}/operations",
            post(handlers::graphs::apply_operations),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
