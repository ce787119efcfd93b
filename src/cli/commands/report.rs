//! Report command implementation
//!
//! Loads a results manifest, runs every lookup through the worker pool and
//! writes the CSV report.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::ReportConfig;
use crate::scan::{Manifest, ManifestResolver, ScanRunner};
use crate::sink::{CsvSink, MultiSink, Quoting, ReportSink, SinkError, TracingSink};

#[derive(Args)]
pub struct ReportArgs {
    /// Results manifest (TOML, JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Report destination, overwritten if it exists
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the column header line
    #[arg(long)]
    pub header: bool,

    /// Field quoting mode
    #[arg(long, value_enum)]
    pub quoting: Option<Quoting>,

    /// Maximum number of worker threads (0 = auto)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

impl ReportArgs {
    /// Flags that were given, shaped like the config file
    fn config_overrides(&self) -> serde_json::Value {
        let mut report = serde_json::Map::new();
        if let Some(output) = &self.output {
            report.insert("output".into(), output.to_string_lossy().into_owned().into());
        }
        if self.header {
            report.insert("header".into(), true.into());
        }
        if let Some(quoting) = self.quoting {
            report.insert("quoting".into(), serde_json::to_value(quoting).unwrap_or_default());
        }

        let mut overrides = serde_json::Map::new();
        overrides.insert("report".into(), report.into());
        if let Some(jobs) = self.jobs {
            overrides.insert("parallel".into(), serde_json::json!({ "max_threads": jobs }));
        }
        overrides.into()
    }
}

pub async fn execute(args: ReportArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let settings = ReportConfig::load_with_custom_config(config_path)?
        .with_overrides(args.config_overrides())
        .settings()?;

    output.header("📄 License Report");

    let manifest = Manifest::load(&args.input)?;
    let (arena, resolver) = ManifestResolver::from_manifest(manifest, &settings.policy)?;
    let arena = Arc::new(arena);
    output.verbose(&format!("Loaded {} modules from {}", arena.len(), args.input.display()));

    let destination = PathBuf::from(&settings.report.output);
    let csv: Arc<dyn ReportSink> = Arc::new(CsvSink::new(
        &destination,
        arena.clone(),
        settings.policy.clone(),
        settings.report.csv.clone(),
    ));
    let log: Arc<dyn ReportSink> = Arc::new(TracingSink::new(arena.clone()));
    let sink = MultiSink::new(vec![log, csv]);

    let runner = ScanRunner::new(settings.parallel.clone());
    let result = tokio::task::spawn_blocking(move || runner.run(&arena, &resolver, &sink)).await?;

    let summary = match result {
        Ok(summary) => summary,
        Err(err) => {
            if let Some(SinkError::DestinationUnavailable { path, .. }) =
                err.downcast_ref::<SinkError>()
            {
                println!("File '{}' does not exist or cannot be created", path.display());
                std::process::exit(1);
            }
            return Err(err);
        }
    };

    output.success(&format!("Report written to {}", destination.display()));
    output.summary_stats("Modules:", summary.modules);
    output.summary_stats("Resolved:", summary.resolved);
    output.summary_stats("Without license:", summary.not_found);
    output.summary_stats("Failed lookups:", summary.failed);
    if summary.failed > 0 {
        output.warning(&format!("{} lookups failed, see ERROR rows in the report", summary.failed));
    }

    Ok(())
}
