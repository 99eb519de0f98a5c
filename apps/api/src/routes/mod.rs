pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;

use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::storage::{handlers as uploads, MAX_UPLOAD_BYTES};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/options", get(generation::handle_options))
        .route("/api/generate", post(generation::handle_generate))
        .route("/api/results", get(generation::handle_results))
        .route("/api/content", get(generation::handle_get_content))
        .route("/api/images", get(generation::handle_get_images))
        // Export API
        .route("/api/export/:kind", get(export::handle_export))
        // Upload API
        .route(
            "/api/uploads",
            post(uploads::handle_upload)
                .get(uploads::handle_get_upload)
                .delete(uploads::handle_delete_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
