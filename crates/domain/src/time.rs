//! Render-time helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp recorded when a table is rendered.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Wall-clock label (`HH:MM:SS UTC`) shown next to a rendered table.
#[must_use]
pub fn clock_label(ts: Timestamp) -> String {
    ts.format("%H:%M:%S UTC").to_string()
}
