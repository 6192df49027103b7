//! Poller — schedules refresh cycles on a fixed interval.
//!
//! The first cycle runs immediately on start. After that a cycle is due every
//! [`DEFAULT_INTERVAL`] (or the configured interval). Cycles never overlap: a
//! tick that comes due while a cycle is still running is skipped, not queued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ports::ReadingSource;
use crate::services::refresh_service::RefreshService;

/// Time between two cycle starts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// Background driver for [`RefreshService::refresh_display`].
pub struct Poller<S> {
    service: Arc<RefreshService<S>>,
    interval: Duration,
}

impl<S> Poller<S>
where
    S: ReadingSource + Send + Sync + 'static,
{
    /// Create a poller. A zero `interval` falls back to [`DEFAULT_INTERVAL`].
    pub fn new(service: Arc<RefreshService<S>>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };
        Self { service, interval }
    }

    /// Run the poller on a background task until `shutdown` resolves.
    pub fn spawn<F>(self, shutdown: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(self.run(shutdown))
    }

    /// Scheduling loop. Runs one cycle per tick until `shutdown` resolves.
    ///
    /// A cycle still in progress at that point is abandoned.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(interval_ms = self.interval.as_millis(), "poller started");

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = self.service.refresh_display() => {}
            }
        }

        tracing::info!("poller stopped");
    }
}
