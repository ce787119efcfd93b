//! Report sinks
//!
//! Scan workers report every module through the same four lifecycle calls:
//! `begin`, any number of `progress` updates, exactly one `complete`, and once
//! all workers have joined, a single `finalize`. Each output format is a
//! separate [`ReportSink`] implementation; [`MultiSink`] fans the calls out to
//! several of them.

use crate::license::{License, StatusKind};
use crate::module::ModuleId;
use std::path::PathBuf;

pub mod csv;
pub mod multi;
pub mod row;
pub mod trace;

pub use csv::CsvSink;
pub use multi::MultiSink;
pub use row::{CsvOptions, Quoting, ReportRow, HEADER};
pub use trace::TracingSink;

/// Receiver of per-module scan results
///
/// Implementations must tolerate calls from many worker threads at once.
pub trait ReportSink: Send + Sync {
    /// A worker started resolving `module`.
    fn begin(&self, module: ModuleId);

    /// A worker reports intermediate status for `module`.
    fn progress(&self, module: ModuleId, status: StatusKind, message: &str);

    /// A worker finished `module`. `error` takes precedence over `license`;
    /// both absent means the lookup found no license.
    fn complete(&self, module: ModuleId, license: Option<&License>, error: Option<&anyhow::Error>);

    /// Produce the report. Called once, after every worker has finished.
    fn finalize(&self) -> Result<(), SinkError>;
}

/// Errors surfaced by sinks
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The report file could not be opened, created or truncated
    #[error("File '{}' does not exist or cannot be created", path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing rows failed after the report file was opened
    #[error("Failed to write report: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report has already been finalized")]
    AlreadyFinalized,
}

impl SinkError {
    /// Destination path the error refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SinkError::DestinationUnavailable { path, .. } | SinkError::Write { path, .. } => {
                Some(path)
            }
            SinkError::AlreadyFinalized => None,
        }
    }
}
