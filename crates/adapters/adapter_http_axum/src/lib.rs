//! # kelvin-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **readings dashboard**, a server-side rendered HTML page that
//!   works with zero JavaScript and reloads itself through
//!   `<meta http-equiv="refresh">` once per polling interval
//! - Serve a small **JSON API** over the display surface
//!   (`/api/readings`, `/api/status`)
//! - Push every table swap to clients over **Server-Sent Events**
//!   (`/api/readings/stream`)
//!
//! The adapter only ever reads the display surface. A failed cycle leaves the
//! surface untouched, so it is never visible here.
//!
//! ## Dependency rule
//! Depends on `kelvin-app` (display surface) and `kelvin-domain` (rendered
//! table types). Never leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
