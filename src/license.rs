//! License lookup results
//!
//! A worker's lookup produces either a license, an error, or nothing at all.
//! [`LicenseResult`] captures that outcome as a closed sum type so sinks never
//! have to inspect values at runtime to find out what they are holding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved license identification
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct License {
    /// SPDX identifier, empty when the license is not an SPDX license
    #[serde(default)]
    pub spdx: String,

    /// Human readable license name
    #[serde(default)]
    pub name: String,

    /// Where the license text was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl License {
    pub fn new(spdx: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            spdx: spdx.into(),
            name: name.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Display form of the license: the name, or the SPDX id when unnamed.
    pub fn describe(&self) -> &str {
        if self.name.is_empty() {
            &self.spdx
        } else {
            &self.name
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Kind of a progress notification emitted while a module is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Unknown,
    Normal,
    Warning,
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Unknown => write!(f, "UNKNOWN"),
            StatusKind::Normal => write!(f, "NORMAL"),
            StatusKind::Warning => write!(f, "WARNING"),
            StatusKind::Error => write!(f, "ERROR"),
        }
    }
}

/// Stored outcome of a module's license lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LicenseResult {
    /// No completion has arrived for the module
    #[default]
    Unresolved,
    /// A license was found
    Resolved(License),
    /// The lookup completed without a license and without an error
    NotFound,
    /// The lookup failed; holds the error description
    Failed(String),
}

impl LicenseResult {
    /// Decide the outcome of a completed lookup. An error always wins over a
    /// license supplied alongside it.
    pub fn from_lookup(license: Option<&License>, error: Option<&anyhow::Error>) -> Self {
        match (error, license) {
            (Some(err), _) => LicenseResult::Failed(format!("{err:#}")),
            (None, Some(license)) => LicenseResult::Resolved(license.clone()),
            (None, None) => LicenseResult::NotFound,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LicenseResult::Failed(_))
    }

    pub fn license(&self) -> Option<&License> {
        match self {
            LicenseResult::Resolved(license) => Some(license),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_prefers_name() {
        let license = License::new("MIT", "MIT License");
        assert_eq!(license.describe(), "MIT License");
        assert_eq!(license.to_string(), "MIT License");
    }

    #[test]
    fn test_describe_falls_back_to_spdx() {
        assert_eq!(License::new("Apache-2.0", "").describe(), "Apache-2.0");
        assert_eq!(License::default().describe(), "");
    }

    #[test]
    fn test_url_does_not_change_description() {
        let license = License::new("MIT", "").with_url("https://opensource.org/licenses/MIT");
        assert_eq!(license.url.as_deref(), Some("https://opensource.org/licenses/MIT"));
        assert_eq!(license.describe(), "MIT");
    }

    #[test]
    fn test_from_lookup_error_wins() {
        let license = License::new("MIT", "MIT License");
        let err = anyhow::anyhow!("not found");

        let result = LicenseResult::from_lookup(Some(&license), Some(&err));
        assert_eq!(result, LicenseResult::Failed("not found".to_string()));
        assert!(result.is_failed());
    }

    #[test]
    fn test_from_lookup_keeps_error_context_chain() {
        let err = anyhow::anyhow!("404").context("fetching LICENSE");
        let result = LicenseResult::from_lookup(None, Some(&err));
        assert_eq!(result, LicenseResult::Failed("fetching LICENSE: 404".to_string()));
    }

    #[test]
    fn test_from_lookup_license_and_nothing() {
        let license = License::new("MIT", "MIT License");
        assert_eq!(
            LicenseResult::from_lookup(Some(&license), None).license(),
            Some(&license)
        );
        assert_eq!(LicenseResult::from_lookup(None, None), LicenseResult::NotFound);
    }
}
