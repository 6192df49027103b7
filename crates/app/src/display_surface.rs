//! In-process display surface backed by a tokio [`watch`] channel.
//!
//! The surface holds the latest [`ReadingsTable`]. Cycles never edit it in
//! place: a cycle renders a whole new table and [`DisplaySurface::swap`]
//! replaces the old one in one step, so readers see either the previous table
//! or the new one, never a half-built one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use kelvin_domain::display::ReadingsTable;

/// Logical name of the surface; the dashboard uses it as the table body id.
pub const SURFACE_NAME: &str = "readingsTable";

/// Latest table, `None` until the first successful cycle.
pub type Snapshot = Option<Arc<ReadingsTable>>;

/// Cycle counters, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Cycles whose table was swapped in.
    pub succeeded: u64,
    /// Cycles aborted by a fetch or parse failure.
    pub failed: u64,
    /// Cycles that finished after a newer cycle had already been shown.
    pub discarded: u64,
}

/// Owner of the rendered readings table.
///
/// Publishing succeeds even when there are no active subscribers.
pub struct DisplaySurface {
    sender: watch::Sender<Snapshot>,
    succeeded: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl Default for DisplaySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// The table currently shown.
    #[must_use]
    pub fn current(&self) -> Snapshot {
        self.sender.borrow().clone()
    }

    /// Subscribe to table swaps.
    ///
    /// The receiver sees the current value first and then every later swap.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.sender.subscribe()
    }

    /// Replace the shown table with `table`.
    ///
    /// The table is rejected (and `false` returned) unless its cycle number is
    /// greater than the one currently shown, so a late result can never
    /// overwrite a newer one.
    pub fn swap(&self, table: ReadingsTable) -> bool {
        let table = Arc::new(table);
        let accepted = self.sender.send_if_modified(|shown| {
            let newer = shown
                .as_ref()
                .is_none_or(|shown| table.cycle > shown.cycle);
            if newer {
                *shown = Some(Arc::clone(&table));
            }
            newer
        });

        if accepted {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.discarded.fetch_add(1, Ordering::Relaxed);
        }
        accepted
    }

    /// Count a failed cycle. The shown table is left untouched.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the cycle counters.
    #[must_use]
    pub fn stats(&self) -> CycleStats {
        CycleStats {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelvin_domain::reading::ReadingSet;
    use kelvin_domain::time::now;

    fn table(cycle: u64, json: &str) -> ReadingsTable {
        let set = ReadingSet::from_json(json.as_bytes()).unwrap();
        ReadingsTable::render(cycle, now(), &set)
    }

    #[test]
    fn should_start_empty() {
        let surface = DisplaySurface::new();
        assert!(surface.current().is_none());
        assert_eq!(surface.stats(), CycleStats::default());
    }

    #[test]
    fn should_show_swapped_table() {
        let surface = DisplaySurface::new();
        assert!(surface.swap(table(1, r#"{"AA": {"age": 1}}"#)));

        let shown = surface.current().unwrap();
        assert_eq!(shown.cycle, 1);
        assert_eq!(shown.rows.len(), 1);
        assert_eq!(surface.stats().succeeded, 1);
    }

    #[test]
    fn should_replace_whole_table_on_swap() {
        let surface = DisplaySurface::new();
        surface.swap(table(1, r#"{"AA": {}, "BB": {}}"#));
        surface.swap(table(2, r#"{"CC": {}}"#));

        let shown = surface.current().unwrap();
        assert_eq!(shown.rows.len(), 1);
        assert_eq!(shown.rows[0].identifier, "CC");
    }

    #[test]
    fn should_reject_older_cycle() {
        let surface = DisplaySurface::new();
        surface.swap(table(5, r#"{"NEW": {}}"#));

        assert!(!surface.swap(table(4, r#"{"OLD": {}}"#)));
        assert_eq!(surface.current().unwrap().rows[0].identifier, "NEW");
        assert_eq!(surface.stats().discarded, 1);
    }

    #[test]
    fn should_reject_same_cycle_twice() {
        let surface = DisplaySurface::new();
        assert!(surface.swap(table(3, "{}")));
        assert!(!surface.swap(table(3, "{}")));
    }

    #[test]
    fn should_keep_table_when_failure_recorded() {
        let surface = DisplaySurface::new();
        surface.swap(table(1, r#"{"AA": {}}"#));
        surface.record_failure();

        assert_eq!(surface.current().unwrap().cycle, 1);
        assert_eq!(
            surface.stats(),
            CycleStats {
                succeeded: 1,
                failed: 1,
                discarded: 0,
            }
        );
    }

    #[tokio::test]
    async fn should_notify_subscriber_on_swap() {
        let surface = DisplaySurface::new();
        let mut rx = surface.subscribe();

        surface.swap(table(1, r#"{"AA": {}}"#));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().cycle, 1);
    }

    #[tokio::test]
    async fn should_not_notify_subscriber_on_rejected_swap() {
        let surface = DisplaySurface::new();
        surface.swap(table(2, "{}"));
        let mut rx = surface.subscribe();

        surface.swap(table(1, "{}"));

        assert!(!rx.has_changed().unwrap());
    }
}
