//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod readings;
pub mod sse;
pub mod status;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/readings", get(readings::get))
        .route("/readings/stream", get(sse::stream))
        .route("/status", get(status::get))
}
