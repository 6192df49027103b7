//! Refresh service — one fetch-parse-render cycle per call.

use std::error::Error as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kelvin_domain::display::ReadingsTable;
use kelvin_domain::error::KelvinError;
use kelvin_domain::time::now;

use crate::display_surface::DisplaySurface;
use crate::ports::ReadingSource;

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new table with `rows` rows is shown.
    Rendered { cycle: u64, rows: usize },
    /// The cycle finished after a newer one; its table was dropped.
    Discarded { cycle: u64 },
    /// Fetching or parsing failed; the previous table is still shown.
    Failed { cycle: u64 },
}

impl CycleOutcome {
    /// Sequence number of the cycle.
    #[must_use]
    pub fn cycle(self) -> u64 {
        match self {
            Self::Rendered { cycle, .. } | Self::Discarded { cycle } | Self::Failed { cycle } => {
                cycle
            }
        }
    }
}

/// Application service that refreshes the display surface from a
/// [`ReadingSource`].
pub struct RefreshService<S> {
    source: S,
    surface: Arc<DisplaySurface>,
    sequence: AtomicU64,
}

impl<S: ReadingSource> RefreshService<S> {
    /// Create a new service rendering into `surface`.
    pub fn new(source: S, surface: Arc<DisplaySurface>) -> Self {
        Self {
            source,
            surface,
            sequence: AtomicU64::new(0),
        }
    }

    /// The surface this service renders into.
    #[must_use]
    pub fn surface(&self) -> &Arc<DisplaySurface> {
        &self.surface
    }

    /// Run one refresh cycle.
    ///
    /// Fetches the readings, renders a complete new table and swaps it into
    /// the surface. Failures never escape: they are logged once, counted, and
    /// the previously shown table stays in place.
    pub async fn refresh_display(&self) -> CycleOutcome {
        let cycle = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

        let set = match self.source.fetch().await {
            Ok(set) => set,
            Err(err) => {
                self.surface.record_failure();
                tracing::error!(
                    cycle,
                    error = %err,
                    cause = %causes(&err),
                    "failed to refresh readings"
                );
                return CycleOutcome::Failed { cycle };
            }
        };

        let table = ReadingsTable::render(cycle, now(), &set);
        let rows = table.rows.len();

        if self.surface.swap(table) {
            tracing::debug!(cycle, rows, "readings table refreshed");
            CycleOutcome::Rendered { cycle, rows }
        } else {
            tracing::warn!(cycle, "discarding late readings, a newer table is already shown");
            CycleOutcome::Discarded { cycle }
        }
    }
}

/// Join the source chain of `err` into one line.
fn causes(err: &KelvinError) -> String {
    let mut parts = Vec::new();
    let mut next = err.source();
    while let Some(cause) = next {
        parts.push(cause.to_string());
        next = cause.source();
    }
    parts.join(": ")
}
