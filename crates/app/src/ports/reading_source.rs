//! Reading source port — where refresh cycles get their data.

use std::future::Future;
use std::sync::Arc;

use kelvin_domain::error::KelvinError;
use kelvin_domain::reading::ReadingSet;

/// Provides the current [`ReadingSet`].
///
/// Implementations fetch the whole set on every call; nothing is cached
/// between calls.
pub trait ReadingSource {
    /// Fetch and parse the current readings document.
    fn fetch(&self) -> impl Future<Output = Result<ReadingSet, KelvinError>> + Send;
}

impl<T: ReadingSource + Send + Sync> ReadingSource for Arc<T> {
    fn fetch(&self) -> impl Future<Output = Result<ReadingSet, KelvinError>> + Send {
        (**self).fetch()
    }
}
