//! Core library modules for the bodylog service.

/// JSON configuration in the platform app-data directory.
pub mod config;

/// Platform-specific data directory resolution.
pub mod data_storage;

/// Timestamp parsing, duration arithmetic, and display strings.
pub mod formatter;

/// Append-only meal log controller.
pub mod meal;

/// Central message catalog and console macros.
pub mod messages;

/// The open/closed sleep session state machine.
pub mod sleep;

/// Range filtering and trailing-window statistics.
pub mod stats;
