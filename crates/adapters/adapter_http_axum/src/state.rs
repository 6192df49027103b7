//! Shared application state for axum handlers.

use std::sync::Arc;

use kelvin_app::display_surface::DisplaySurface;
use tokio::sync::watch;

/// Application state shared across all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The surface holding the latest rendered table.
    pub surface: Arc<DisplaySurface>,
    /// Seconds between two dashboard reloads.
    pub refresh_seconds: u64,
    /// Flips to `true` when the server is shutting down. Open SSE streams end then.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// Create a new application state over `surface` that never signals shutdown.
    pub fn new(surface: Arc<DisplaySurface>, refresh_seconds: u64) -> Self {
        let (_, shutdown) = watch::channel(false);
        Self {
            surface,
            refresh_seconds,
            shutdown,
        }
    }

    /// End long-lived responses once `shutdown` turns `true`.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }
}
