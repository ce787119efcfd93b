//! CSV report sink
//!
//! Collects one outcome per module while workers run and writes the whole
//! report, sorted by module path, when finalized.
//!
//! The table is keyed by [`ModuleId`]. At finalize time a `path -> ModuleId`
//! index is derived from the arena, so every registered module appears once;
//! one that never completed renders as `no, no`. If two identities share a
//! path only one row is written: an identity with a stored result wins over
//! one without, and between two that both have (or both lack) a result the
//! higher id (registered later) wins.
//!
//! The report is rendered in memory before the destination is opened, so an
//! unavailable destination never leaves a partially written file behind. An
//! I/O error after opening (disk full, for instance) can still leave a
//! truncated file.

use super::row::{render_report, CsvOptions, ReportRow};
use super::{ReportSink, SinkError};
use crate::config::Policy;
use crate::license::{License, LicenseResult, StatusKind};
use crate::module::{ModuleArena, ModuleId};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static UNRESOLVED: LicenseResult = LicenseResult::Unresolved;

#[derive(Debug, Default)]
struct SinkState {
    results: BTreeMap<ModuleId, LicenseResult>,
    finalized: bool,
}

/// Writes license results to a CSV file
pub struct CsvSink {
    path: PathBuf,
    arena: Arc<ModuleArena>,
    policy: Policy,
    options: CsvOptions,
    state: Mutex<SinkState>,
}

impl CsvSink {
    pub fn new(
        path: impl Into<PathBuf>,
        arena: Arc<ModuleArena>,
        policy: Policy,
        options: CsvOptions,
    ) -> Self {
        Self {
            path: path.into(),
            arena,
            policy,
            options,
            state: Mutex::new(SinkState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Number of modules with a stored outcome
    pub fn len(&self) -> usize {
        self.state().results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored outcome for a module, [`LicenseResult::Unresolved`] if none
    pub fn result(&self, module: ModuleId) -> LicenseResult {
        self.state()
            .results
            .get(&module)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_finalized(&self) -> bool {
        self.state().finalized
    }

    // Table updates are single inserts, so a panic in another holder cannot
    // leave it half-written.
    fn state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render the report for the current table contents.
    ///
    /// Every module in the arena gets a row; modules without a completion
    /// render as unresolved.
    fn render(&self, results: &BTreeMap<ModuleId, LicenseResult>) -> (String, usize) {
        for id in results.keys().filter(|id| self.arena.get(**id).is_none()) {
            tracing::warn!("Dropping result for module {} not present in the arena", id);
        }

        let mut index: HashMap<&str, ModuleId> = HashMap::with_capacity(self.arena.len());
        for (id, module) in self.arena.iter() {
            match index.entry(module.path.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
                Entry::Occupied(mut slot) => {
                    let previous = *slot.get();
                    // Ids arrive ascending; a stored result outranks id order
                    let keep = if results.contains_key(&id) || !results.contains_key(&previous) {
                        slot.insert(id);
                        id
                    } else {
                        previous
                    };
                    tracing::debug!(
                        "Modules {} and {} share path '{}', keeping {}",
                        previous,
                        id,
                        module.path,
                        keep
                    );
                }
            }
        }

        let mut paths: Vec<&str> = index.keys().copied().collect();
        paths.sort_unstable();

        let rows = paths.iter().filter_map(|path| {
            let id = index[path];
            let module = self.arena.get(id)?;
            let result = results.get(&id).unwrap_or(&UNRESOLVED);
            Some(ReportRow::new(module, result))
        });

        (render_report(rows, &self.options), paths.len())
    }

    fn open_destination(&self) -> Result<std::fs::File, SinkError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }

        options
            .open(&self.path)
            .map_err(|source| SinkError::DestinationUnavailable {
                path: self.path.clone(),
                source,
            })
    }
}

impl ReportSink for CsvSink {
    fn begin(&self, _module: ModuleId) {}

    fn progress(&self, _module: ModuleId, _status: StatusKind, _message: &str) {}

    fn complete(&self, module: ModuleId, license: Option<&License>, error: Option<&anyhow::Error>) {
        let result = LicenseResult::from_lookup(license, error);

        let mut state = self.state();
        if state.finalized {
            tracing::warn!("Ignoring result for module {} after report was finalized", module);
            return;
        }
        state.results.insert(module, result);
    }

    fn finalize(&self) -> Result<(), SinkError> {
        // Held for the whole call so late completions wait instead of racing
        let mut state = self.state();
        if state.finalized {
            return Err(SinkError::AlreadyFinalized);
        }
        state.finalized = true;

        let (content, rows) = self.render(&state.results);

        let file = self.open_destination()?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| SinkError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!("Wrote {} rows to {}", rows, self.path.display());
        Ok(())
    }
}
