//! Fan-out sink

use super::{ReportSink, SinkError};
use crate::license::{License, StatusKind};
use crate::module::ModuleId;
use std::sync::Arc;

/// Forwards every lifecycle call to each child sink, in order
#[derive(Default, Clone)]
pub struct MultiSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Arc<dyn ReportSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for MultiSink {
    fn begin(&self, module: ModuleId) {
        for sink in &self.sinks {
            sink.begin(module);
        }
    }

    fn progress(&self, module: ModuleId, status: StatusKind, message: &str) {
        for sink in &self.sinks {
            sink.progress(module, status, message);
        }
    }

    fn complete(&self, module: ModuleId, license: Option<&License>, error: Option<&anyhow::Error>) {
        for sink in &self.sinks {
            sink.complete(module, license, error);
        }
    }

    /// Finalizes every child even if an earlier one fails; the first failure
    /// is returned.
    fn finalize(&self) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.finalize() {
                tracing::error!("Report sink failed to finalize: {}", err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
