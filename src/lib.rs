//! # Bodylog - personal sleep & meal tracker
//!
//! A small HTTP service for recording sleep sessions and meals, backed by a
//! single-file SQLite store.
//!
//! ## Features
//!
//! - **Sleep Sessions**: One-tap start/stop with an open/closed state machine
//! - **Meal Logging**: Append-only entries with category labels
//! - **History**: Listing, date-range filtering, and deletion of records
//! - **Statistics**: Trailing-window totals, averages, and per-day buckets
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bodylog::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
