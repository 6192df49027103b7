//! JSON handler for cycle diagnostics.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use kelvin_domain::time::Timestamp;

use crate::state::AppState;

/// Body of `GET /api/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub succeeded: u64,
    pub failed: u64,
    pub discarded: u64,
    /// Cycle number of the table shown, if any.
    pub shown_cycle: Option<u64>,
    pub rendered_at: Option<Timestamp>,
    pub devices: usize,
}

/// `GET /api/status` — cycle counters and the age of the shown table.
pub async fn get(State(state): State<AppState>) -> Json<StatusResponse> {
    let stats = state.surface.stats();
    let shown = state.surface.current();

    Json(StatusResponse {
        succeeded: stats.succeeded,
        failed: stats.failed,
        discarded: stats.discarded,
        shown_cycle: shown.as_ref().map(|table| table.cycle),
        rendered_at: shown.as_ref().map(|table| table.rendered_at),
        devices: shown.as_ref().map_or(0, |table| table.summary.devices),
    })
}
