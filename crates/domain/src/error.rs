//! Common error types used across the workspace.
//!
//! Every failure that can abort a refresh cycle ends up as a [`KelvinError`].
//! Adapters define their own typed errors and convert into this one at the
//! port boundary.

/// Top-level error for a failed refresh cycle.
#[derive(Debug, thiserror::Error)]
pub enum KelvinError {
    /// The data provider could not be reached or answered with an error.
    #[error("readings source error")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The data provider answered, but the body is not a readings document.
    #[error("malformed readings document")]
    Decode(#[from] serde_json::Error),
}
