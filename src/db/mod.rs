//! Database layer for the bodylog service.
//!
//! A thin persistence layer over a single-file SQLite store. Each table gets
//! its own store struct wrapping a shared connection, with the SQL kept as
//! module constants. Schema changes go through the versioned migration
//! system, applied automatically when a connection is opened.

/// Core database connection and initialization.
pub mod db;

/// Versioned schema migration system.
pub mod migrations;

/// Meal log rows (`meal_records` table).
pub mod meal_records;

/// Sleep session rows (`sleep_records` table).
pub mod sleep_records;
