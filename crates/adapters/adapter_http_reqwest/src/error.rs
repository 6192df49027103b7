//! HTTP source adapter error types.

use kelvin_domain::error::KelvinError;

/// Errors specific to fetching readings over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent, timed out, or the body could not be read.
    #[error("request to readings provider failed")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("readings provider answered with status {0}")]
    Status(reqwest::StatusCode),

    /// The body is not a readings document.
    #[error("failed to decode readings document")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// Convert into a [`KelvinError`] for propagation across the port boundary.
    pub fn into_domain(self) -> KelvinError {
        match self {
            Self::Decode(err) => KelvinError::Decode(err),
            other => KelvinError::Source(Box::new(other)),
        }
    }
}

impl From<FetchError> for KelvinError {
    fn from(err: FetchError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_status_error() {
        let err = FetchError::Status(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "readings provider answered with status 502 Bad Gateway"
        );
    }

    #[test]
    fn should_convert_status_error_to_source_error() {
        let err: KelvinError = FetchError::Status(reqwest::StatusCode::NOT_FOUND).into();
        assert!(matches!(err, KelvinError::Source(_)));
    }

    #[test]
    fn should_convert_decode_error_to_domain_decode_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: KelvinError = FetchError::Decode(json_err).into();
        assert!(matches!(err, KelvinError::Decode(_)));
    }
}
