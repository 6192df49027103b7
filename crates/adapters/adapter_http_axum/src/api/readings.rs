//! JSON handler for the current readings table.

use axum::Json;
use axum::extract::State;

use kelvin_domain::display::ReadingsTable;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/readings` — the table currently shown, or `503` before the
/// first successful cycle.
pub async fn get(State(state): State<AppState>) -> Result<Json<ReadingsTable>, ApiError> {
    let table = state.surface.current().ok_or(ApiError::NotReady)?;
    Ok(Json(ReadingsTable::clone(&table)))
}
