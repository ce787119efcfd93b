//! Configuration management for license-report
//!
//! Settings are layered with figment: embedded defaults, then user and
//! repository config files (TOML, JSON or YAML), then `LICENSE_REPORT_`
//! environment variables, and finally CLI overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod core;

pub use core::ReportConfig;

use crate::parallel::ParallelConfig;
use crate::sink::CsvOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Report output settings
    #[serde(default)]
    pub report: ReportSettings,

    /// Worker pool settings
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// License policy
    #[serde(default)]
    pub policy: Policy,
}

/// Where and how the CSV report is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Destination file, overwritten if it exists
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(flatten)]
    pub csv: CsvOptions,
}

fn default_output() -> String {
    "licenses.csv".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            csv: CsvOptions::default(),
        }
    }
}

/// License policy
///
/// Sinks accept a policy but the CSV report does not filter on it; allow and
/// deny lists are carried for sinks that do. Overrides are applied while
/// resolving, before results reach any sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// SPDX identifiers that are explicitly allowed
    #[serde(default)]
    pub allow: Vec<String>,

    /// SPDX identifiers that are explicitly denied
    #[serde(default)]
    pub deny: Vec<String>,

    /// Module path -> SPDX identifier to use instead of the detected license
    #[serde(default, rename = "override")]
    pub overrides: BTreeMap<String, String>,
}

impl Policy {
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty() && self.overrides.is_empty()
    }
}
