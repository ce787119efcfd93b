//! Log-only sink
//!
//! Emits a `tracing` event for every lifecycle notification. Paired with the
//! CSV sink through [`MultiSink`](super::MultiSink) it gives live feedback
//! while a scan runs.

use super::{ReportSink, SinkError};
use crate::license::{License, StatusKind};
use crate::module::{ModuleArena, ModuleId};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts of completed modules seen by a [`TracingSink`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompletionCounts {
    pub resolved: usize,
    pub not_found: usize,
    pub failed: usize,
}

pub struct TracingSink {
    arena: Arc<ModuleArena>,
    resolved: AtomicUsize,
    not_found: AtomicUsize,
    failed: AtomicUsize,
}

impl TracingSink {
    pub fn new(arena: Arc<ModuleArena>) -> Self {
        Self {
            arena,
            resolved: AtomicUsize::new(0),
            not_found: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn counts(&self) -> CompletionCounts {
        CompletionCounts {
            resolved: self.resolved.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    fn name(&self, module: ModuleId) -> String {
        self.arena
            .get(module)
            .map(|m| m.to_string())
            .unwrap_or_else(|| module.to_string())
    }
}

impl ReportSink for TracingSink {
    fn begin(&self, module: ModuleId) {
        tracing::debug!("{}: looking up license", self.name(module));
    }

    fn progress(&self, module: ModuleId, status: StatusKind, message: &str) {
        match status {
            StatusKind::Error => tracing::error!("{}: {}", self.name(module), message),
            StatusKind::Warning => tracing::warn!("{}: {}", self.name(module), message),
            StatusKind::Normal | StatusKind::Unknown => {
                tracing::debug!("{}: {}", self.name(module), message)
            }
        }
    }

    fn complete(&self, module: ModuleId, license: Option<&License>, error: Option<&anyhow::Error>) {
        match (error, license) {
            (Some(err), _) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("{}: {:#}", self.name(module), err);
            }
            (None, Some(license)) => {
                self.resolved.fetch_add(1, Ordering::Relaxed);
                tracing::info!("{}: {}", self.name(module), license.describe());
            }
            (None, None) => {
                self.not_found.fetch_add(1, Ordering::Relaxed);
                tracing::info!("{}: no license found", self.name(module));
            }
        }
    }

    fn finalize(&self) -> Result<(), SinkError> {
        let counts = self.counts();
        tracing::info!(
            "License scan finished: {} resolved, {} without license, {} failed",
            counts.resolved,
            counts.not_found,
            counts.failed
        );
        Ok(())
    }
}
