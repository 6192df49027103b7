//! Server-Sent Events (SSE) stream of table swaps.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use kelvin_app::display_surface::Snapshot;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use crate::state::AppState;

/// `GET /api/readings/stream` — SSE stream of rendered tables.
///
/// Sends the table currently shown (if any) right away, then one JSON-encoded
/// table per successful swap. Failed cycles produce no event. The stream ends
/// when the server starts shutting down.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let tables = WatchStream::new(state.surface.subscribe()).map(Some);
    let stop = WatchStream::new(state.shutdown)
        .filter(|stopping| *stopping)
        .map(|_| None::<Snapshot>);

    let events = tables
        .merge(stop)
        .take_while(Option::is_some)
        .filter_map(|item| {
            let table = item??;
            match serde_json::to_string(table.as_ref()) {
                Ok(json) => Some(Ok(Event::default().event("readings").data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize readings table for SSE stream");
                    None
                }
            }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}
