//! Display formatting — turns a [`ReadingSet`] into table rows.
//!
//! Each reading becomes one [`DisplayRow`] of seven text cells in a fixed
//! order: name, identifier, temperature, humidity, battery level, battery
//! voltage, age. Absent values render as [`PLACEHOLDER`].

use serde::{Deserialize, Serialize};

use crate::freshness::{Freshness, STALE_AFTER_SECS};
use crate::reading::{Reading, ReadingSet};
use crate::time::Timestamp;

/// Text shown in place of any absent value.
pub const PLACEHOLDER: &str = "—";

/// Column headers, in cell order.
pub const COLUMNS: [&str; 7] = [
    "Name",
    "Address",
    "Temperature",
    "Humidity",
    "Battery",
    "Voltage",
    "Age",
];

/// Decimal places shown for temperature and humidity.
pub const CLIMATE_DECIMALS: usize = 1;
/// Decimal places shown for battery voltage.
pub const VOLTAGE_DECIMALS: usize = 2;
/// Decimal places shown for age.
pub const AGE_DECIMALS: usize = 0;

/// Extra digits printed to tell an exact halfway value from a near miss.
const GUARD_DIGITS: usize = 30;

/// Format `value` with exactly `decimals` digits after the point.
///
/// Rounds the exact binary value to the nearest decimal; values lying exactly
/// halfway round away from zero (`2.5` gives `"3"`, `0.25` gives `"0.3"`).
/// Negative zero is printed without its sign.
#[must_use]
pub fn to_fixed(value: f64, decimals: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };

    let exact = format!("{value:.prec$}", prec = decimals + GUARD_DIGITS);
    let tail = &exact[exact.len() - GUARD_DIGITS..];
    let halfway = tail.starts_with('5') && tail[1..].bytes().all(|digit| digit == b'0');

    if halfway {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let scale = 10_f64.powi(decimals as i32);
        let rounded = (value * scale).round() / scale;
        format!("{rounded:.decimals$}")
    } else {
        format!("{value:.decimals$}")
    }
}

fn fixed_cell(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|value| value.is_finite())
        .map_or_else(|| PLACEHOLDER.to_string(), |value| to_fixed(value, decimals))
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub name: String,
    pub identifier: String,
    pub temperature: String,
    pub humidity: String,
    pub battery_level: String,
    pub battery_voltage: String,
    pub age: String,
    pub freshness: Freshness,
}

impl DisplayRow {
    /// Resolve every cell of `reading` for display.
    #[must_use]
    pub fn from_reading(identifier: &str, reading: &Reading) -> Self {
        Self {
            name: reading.label().unwrap_or(PLACEHOLDER).to_string(),
            identifier: identifier.to_string(),
            temperature: fixed_cell(reading.temperature, CLIMATE_DECIMALS),
            humidity: fixed_cell(reading.humidity, CLIMATE_DECIMALS),
            battery_level: reading
                .battery_level()
                .map_or_else(|| PLACEHOLDER.to_string(), ToString::to_string),
            battery_voltage: fixed_cell(reading.battery_voltage(), VOLTAGE_DECIMALS),
            age: fixed_cell(reading.age, AGE_DECIMALS),
            freshness: Freshness::classify(reading.age),
        }
    }

    /// The seven cells in column order.
    #[must_use]
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.name,
            &self.identifier,
            &self.temperature,
            &self.humidity,
            &self.battery_level,
            &self.battery_voltage,
            &self.age,
        ]
    }
}

/// Render every reading of `set`, in document order.
#[must_use]
pub fn render_rows(set: &ReadingSet) -> Vec<DisplayRow> {
    set.iter()
        .map(|(identifier, reading)| DisplayRow::from_reading(identifier, reading))
        .collect()
}

/// Counters shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Number of devices in the set.
    pub devices: usize,
    /// Rows classified fresh.
    pub fresh: usize,
    /// Rows classified stale.
    pub stale: usize,
    /// Devices heard from within the last 180 seconds.
    pub connected: usize,
}

impl TableSummary {
    /// Count devices in `set` by freshness.
    #[must_use]
    pub fn of(set: &ReadingSet) -> Self {
        set.iter()
            .fold(Self::default(), |mut summary, (_, reading)| {
                summary.devices += 1;
                match Freshness::classify(reading.age) {
                    Freshness::Fresh => summary.fresh += 1,
                    Freshness::Stale => summary.stale += 1,
                    Freshness::Unclassified => {}
                }
                if reading.age.is_some_and(|age| age <= STALE_AFTER_SECS) {
                    summary.connected += 1;
                }
                summary
            })
    }
}

/// A complete rendered table, produced by one successful cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingsTable {
    /// Sequence number of the cycle that produced the table.
    pub cycle: u64,
    /// When the table was rendered.
    pub rendered_at: Timestamp,
    /// Rows in document order.
    pub rows: Vec<DisplayRow>,
    /// Per-freshness counters.
    pub summary: TableSummary,
}

impl ReadingsTable {
    /// Render `set` as the output of `cycle`.
    #[must_use]
    pub fn render(cycle: u64, rendered_at: Timestamp, set: &ReadingSet) -> Self {
        Self {
            cycle,
            rendered_at,
            rows: render_rows(set),
            summary: TableSummary::of(set),
        }
    }
}
