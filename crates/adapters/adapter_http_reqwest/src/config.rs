//! Readings source configuration.

use serde::Deserialize;

/// Where and how to fetch the readings document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Absolute URL of the readings document.
    pub url: String,
    /// Upper bound for one request, in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://kelvin.local/readings".to_string(),
            timeout_secs: 10,
        }
    }
}
