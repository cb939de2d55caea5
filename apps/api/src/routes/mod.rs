pub mod ask;
pub mod health;
pub mod listen;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// API routes plus the bundled frontend as the fallback for every other path.
pub fn build_router(state: AppState) -> Router {
    let frontend = ServeDir::new(&state.config.frontend_dir);
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ask", post(ask::handle_ask))
        .route("/listen", post(listen::listen_handler))
        .fallback_service(frontend)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
