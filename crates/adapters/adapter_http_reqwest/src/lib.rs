//! # kelvin-adapter-http-reqwest
//!
//! Driven adapter implementing the `ReadingSource` port over HTTP.
//!
//! ## Responsibilities
//! - Issue one `GET` per cycle to the configured provider URL
//! - Treat transport failures, timeouts and non-2xx answers as errors
//! - Decode the body into an ordered `ReadingSet`
//!
//! ## Dependency rule
//! Depends on `kelvin-app` (port traits) and `kelvin-domain` (types).

pub mod config;
pub mod error;

use std::future::Future;
use std::time::Duration;

use kelvin_app::ports::ReadingSource;
use kelvin_domain::error::KelvinError;
use kelvin_domain::reading::ReadingSet;
use reqwest::header::ACCEPT;

pub use config::SourceConfig;
pub use error::FetchError;

/// Fetches the readings document from a provider over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReadingSource {
    client: reqwest::Client,
    url: String,
}

impl HttpReadingSource {
    /// Build a source from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// The provider URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_readings(&self) -> Result<ReadingSet, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        tracing::trace!(url = %self.url, bytes = body.len(), "readings document received");

        ReadingSet::from_json(&body).map_err(FetchError::Decode)
    }
}

impl ReadingSource for HttpReadingSource {
    fn fetch(&self) -> impl Future<Output = Result<ReadingSet, KelvinError>> + Send {
        async move { self.fetch_readings().await.map_err(FetchError::into_domain) }
    }
}
