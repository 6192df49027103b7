//! Readings page — the rendered table behind the `readingsTable` surface.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use kelvin_app::display_surface::SURFACE_NAME;
use kelvin_domain::display::{COLUMNS, DisplayRow, ReadingsTable};
use kelvin_domain::time::clock_label;

use crate::state::AppState;

/// One `<tr>` of the table body.
pub struct RowView {
    class: Option<&'static str>,
    cells: Vec<String>,
}

impl From<&DisplayRow> for RowView {
    fn from(row: &DisplayRow) -> Self {
        Self {
            class: row.freshness.css_class(),
            cells: row.cells().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Line shown above the table once a cycle has succeeded.
pub struct SummaryView {
    devices: usize,
    connected: usize,
    fresh: usize,
    stale: usize,
    updated: String,
}

/// Readings page template.
#[derive(Template)]
#[template(path = "readings.html")]
pub struct ReadingsTemplate {
    refresh_seconds: u64,
    surface_id: &'static str,
    columns: &'static [&'static str],
    summary: Option<SummaryView>,
    rows: Vec<RowView>,
}

impl ReadingsTemplate {
    /// Build the page for `table`, or the waiting page when there is none.
    #[must_use]
    pub fn new(table: Option<&ReadingsTable>, refresh_seconds: u64) -> Self {
        Self {
            refresh_seconds,
            surface_id: SURFACE_NAME,
            columns: &COLUMNS,
            summary: table.map(|table| SummaryView {
                devices: table.summary.devices,
                connected: table.summary.connected,
                fresh: table.summary.fresh,
                stale: table.summary.stale,
                updated: clock_label(table.rendered_at),
            }),
            rows: table
                .map(|table| table.rows.iter().map(RowView::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl IntoResponse for ReadingsTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /` — the readings table.
pub async fn index(State(state): State<AppState>) -> ReadingsTemplate {
    let table = state.surface.current();
    ReadingsTemplate::new(table.as_deref(), state.refresh_seconds)
}
