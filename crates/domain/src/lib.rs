//! # kelvin-domain
//!
//! Pure domain model for the kelvin readings dashboard.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Readings** (one device's latest sensor snapshot) and the
//!   ordered **`ReadingSet`** fetched from the data provider
//! - Define **Freshness** (display-only classification derived from age)
//! - Turn readings into **display rows**: placeholder handling, fixed-decimal
//!   rounding and the fixed seven-column order
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod display;
pub mod freshness;
pub mod reading;
