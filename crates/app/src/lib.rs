//! # kelvin-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ReadingSource`: fetch the current readings document
//! - Own the **display surface**, the single holder of the latest rendered
//!   table, updated by snapshot-and-swap
//! - Drive **refresh cycles** (`RefreshService::refresh_display`) and the
//!   **poller** that schedules them, one at a time
//!
//! ## Dependency rule
//! Depends on `kelvin-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod display_surface;
pub mod poller;
pub mod ports;
pub mod services;
