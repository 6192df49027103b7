//! Freshness — display-only classification of a reading by its age.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reading at most this many seconds old is fresh.
pub const FRESH_MAX_AGE_SECS: f64 = 3.0;

/// A reading older than this many seconds is stale.
pub const STALE_AFTER_SECS: f64 = 180.0;

/// Visual classification attached to a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// `age <= 3`.
    Fresh,
    /// Age absent or in `(3, 180]`; default appearance.
    #[default]
    Unclassified,
    /// `age > 180`.
    Stale,
}

impl Freshness {
    /// Classify a raw age in seconds.
    ///
    /// Always pass the raw value, never the rounded display string: `3.6`
    /// shows as `4` but is unclassified, and exactly `180` is unclassified.
    #[must_use]
    pub fn classify(age: Option<f64>) -> Self {
        match age {
            Some(age) if age <= FRESH_MAX_AGE_SECS => Self::Fresh,
            Some(age) if age > STALE_AFTER_SECS => Self::Stale,
            _ => Self::Unclassified,
        }
    }

    /// Style tag for the row, if any.
    #[must_use]
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Fresh => Some("fresh"),
            Self::Unclassified => None,
            Self::Stale => Some("stale"),
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => f.write_str("fresh"),
            Self::Unclassified => f.write_str("unclassified"),
            Self::Stale => f.write_str("stale"),
        }
    }
}
