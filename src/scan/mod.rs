//! License scan orchestration
//!
//! The runner drives a [`LicenseResolver`] over every module of an arena on
//! the worker pool and reports each module to a [`ReportSink`]:
//!
//! ```text
//! for each module (in parallel):  begin -> progress* -> complete
//! after all workers joined:       finalize
//! ```

use crate::license::{License, StatusKind};
use crate::module::{Module, ModuleArena, ModuleId};
use crate::parallel::{ParallelConfig, ParallelProcessor};
use crate::sink::ReportSink;
use anyhow::Result;

pub mod manifest;

pub use manifest::{Manifest, ManifestEntry, ManifestResolver};

/// Finds the license of a single module
///
/// Implementations are called from several worker threads at once.
pub trait LicenseResolver: Send + Sync {
    /// Resolve `module`. `Ok(None)` means no license was found.
    fn resolve(
        &self,
        id: ModuleId,
        module: &Module,
        status: &StatusReporter<'_>,
    ) -> Result<Option<License>>;
}

/// Lets a resolver publish progress for the module it is working on
pub struct StatusReporter<'a> {
    sink: &'a dyn ReportSink,
    module: ModuleId,
}

impl<'a> StatusReporter<'a> {
    pub fn new(sink: &'a dyn ReportSink, module: ModuleId) -> Self {
        Self { sink, module }
    }

    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub fn update(&self, status: StatusKind, message: &str) {
        self.sink.progress(self.module, status, message);
    }
}

/// Totals of a finished scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub modules: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Resolved,
    NotFound,
    Failed,
}

/// Runs license lookups for all modules and reports them to a sink
pub struct ScanRunner {
    processor: ParallelProcessor,
}

impl ScanRunner {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            processor: ParallelProcessor::new(config),
        }
    }

    /// Resolve every module in `arena`, then finalize `sink`.
    ///
    /// Lookup failures are reported to the sink as data. Only a sink failure
    /// (for example an unwritable destination) is returned as an error; it
    /// can be downcast to [`SinkError`](crate::sink::SinkError).
    pub fn run(
        &self,
        arena: &ModuleArena,
        resolver: &dyn LicenseResolver,
        sink: &dyn ReportSink,
    ) -> Result<ScanSummary> {
        let ids: Vec<ModuleId> = arena.ids().collect();
        tracing::info!("Resolving licenses for {} modules", ids.len());

        let outcomes = self.processor.process(
            ids,
            |id| {
                let module = arena
                    .get(id)
                    .ok_or_else(|| anyhow::anyhow!("Module {id} is not registered"))?;

                sink.begin(id);
                let status = StatusReporter::new(sink, id);
                let outcome = match resolver.resolve(id, module, &status) {
                    Ok(Some(license)) => {
                        sink.complete(id, Some(&license), None);
                        Outcome::Resolved
                    }
                    Ok(None) => {
                        sink.complete(id, None, None);
                        Outcome::NotFound
                    }
                    Err(err) => {
                        sink.complete(id, None, Some(&err));
                        Outcome::Failed
                    }
                };
                Ok(outcome)
            },
            "Resolving licenses",
        )?;

        sink.finalize()?;

        let mut summary = ScanSummary {
            modules: arena.len(),
            ..ScanSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Resolved => summary.resolved += 1,
                Outcome::NotFound => summary.not_found += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
        Ok(summary)
    }
}

impl Default for ScanRunner {
    fn default() -> Self {
        Self::new(ParallelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use crate::sink::{CsvOptions, CsvSink, SinkError};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Resolves by path: `*/mit` has MIT, `*/broken` fails, others have none
    struct PathResolver;

    impl LicenseResolver for PathResolver {
        fn resolve(
            &self,
            _id: ModuleId,
            module: &Module,
            status: &StatusReporter<'_>,
        ) -> Result<Option<License>> {
            status.update(StatusKind::Normal, "looking up");
            if module.path.ends_with("/mit") {
                Ok(Some(License::new("MIT", "MIT License")))
            } else if module.path.ends_with("/broken") {
                status.update(StatusKind::Error, "lookup failed");
                Err(anyhow::anyhow!("repository not found"))
            } else {
                Ok(None)
            }
        }
    }

    fn arena() -> Arc<ModuleArena> {
        let mut arena = ModuleArena::new();
        arena.insert(Module::new("github.com/z/mit", "v1.2.0")).unwrap();
        arena.insert(Module::new("github.com/a/broken", "v0.1.0")).unwrap();
        arena.insert(Module::new("github.com/m/none", "")).unwrap();
        Arc::new(arena)
    }

    #[test]
    fn test_run_reports_every_module() {
        let dir = TempDir::new().unwrap();
        let arena = arena();
        let sink = CsvSink::new(
            dir.path().join("report.csv"),
            arena.clone(),
            Policy::default(),
            CsvOptions::default(),
        );

        let summary = ScanRunner::default().run(&arena, &PathResolver, &sink).unwrap();

        assert_eq!(
            summary,
            ScanSummary {
                modules: 3,
                resolved: 1,
                not_found: 1,
                failed: 1,
            }
        );
        assert_eq!(
            fs::read_to_string(sink.path()).unwrap(),
            "github.com/a/broken,v0.1.0,ERROR: repository not found\n\
             github.com/m/none,,\n\
             github.com/z/mit,v1.2.0,MIT,,,MIT License\n"
        );
    }

    #[test]
    fn test_run_surfaces_sink_failure() {
        let dir = TempDir::new().unwrap();
        let arena = arena();
        let sink = CsvSink::new(
            dir.path().join("nope").join("report.csv"),
            arena.clone(),
            Policy::default(),
            CsvOptions::default(),
        );

        let err = ScanRunner::default().run(&arena, &PathResolver, &sink).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SinkError>(),
            Some(SinkError::DestinationUnavailable { .. })
        ));
    }

    #[test]
    fn test_run_with_single_worker_matches_parallel() {
        let arena = arena();

        let dir_serial = TempDir::new().unwrap();
        let serial = CsvSink::new(
            dir_serial.path().join("r.csv"),
            arena.clone(),
            Policy::default(),
            CsvOptions::default(),
        );
        ScanRunner::new(ParallelConfig {
            max_threads: 1,
            ..ParallelConfig::default()
        })
        .run(&arena, &PathResolver, &serial)
        .unwrap();

        let dir_parallel = TempDir::new().unwrap();
        let parallel = CsvSink::new(
            dir_parallel.path().join("r.csv"),
            arena.clone(),
            Policy::default(),
            CsvOptions::default(),
        );
        ScanRunner::new(ParallelConfig {
            max_threads: 8,
            thread_percentage: 100,
            ..ParallelConfig::default()
        })
        .run(&arena, &PathResolver, &parallel)
        .unwrap();

        assert_eq!(
            fs::read_to_string(serial.path()).unwrap(),
            fs::read_to_string(parallel.path()).unwrap()
        );
    }
}
