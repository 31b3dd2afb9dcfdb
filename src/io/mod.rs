//! Input/output, configuration and error handling

/// Built-in demonstration tile catalog
pub mod catalog;
/// Command-line interface and session runner
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// PNG map export
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Terminal progress bars
pub mod progress;
