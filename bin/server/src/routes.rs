//! HTTP routes.

use crate::credentials;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/projects/{project_id}/credentials",
            post(credentials::create_credential).get(credentials::list_credentials),
        )
        .route(
            "/projects/{project_id}/credentials/{credential_id}",
            get(credentials::get_credential)
                .put(credentials::update_credential)
                .delete(credentials::delete_credential),
        );

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
