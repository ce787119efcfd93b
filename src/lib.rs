//! # license-report - License scan result reporting
//!
//! Collects per-module license lookup results from concurrently running scan
//! workers and renders them as a deterministic CSV report.
//!
//! ## Features
//!
//! - **Concurrent collection**: sinks accept results from any number of worker threads
//! - **Deterministic output**: rows are always sorted by module path
//! - **Exact format**: byte-compatible CSV rows, with optional RFC 4180 quoting
//! - **Pluggable sinks**: CSV, tracing and fan-out sinks share one interface
//!
//! ## Quick Start
//!
//! ```bash
//! # Render a report from a results manifest
//! license-report report --input results.toml --output licenses.csv
//! ```

pub mod cli;
pub mod config;
pub mod license;
pub mod module;
pub mod parallel;
pub mod scan;
pub mod sink;

pub use config::{ReportConfig, Settings};
pub use license::{License, LicenseResult, StatusKind};
pub use module::{ArenaFull, Module, ModuleArena, ModuleId};
pub use sink::{CsvSink, ReportSink, SinkError};

/// Result type alias for license-report operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
