//! CSV row rendering
//!
//! Rows are rendered byte-for-byte compatible with existing consumers of the
//! report by default: fields are joined with commas and never quoted. Setting
//! [`Quoting::Rfc4180`] switches to proper CSV quoting for paths, versions or
//! descriptions that contain separators.

use crate::license::LicenseResult;
use crate::module::Module;
use serde::{Deserialize, Serialize};

/// Column names of the report, written only when a header is requested
pub const HEADER: [&str; 6] = [
    "Name",
    "Version",
    "License Type",
    "Publisher",
    "Description",
    "Comment",
];

/// Field quoting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Raw fields, no escaping (compatible output)
    #[default]
    None,
    /// Quote fields containing `,`, `"`, CR or LF and double embedded quotes
    Rfc4180,
}

/// Formatting options for the CSV report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Write the column header line first
    #[serde(default)]
    pub header: bool,

    /// Field quoting mode
    #[serde(default)]
    pub quoting: Quoting,
}

/// One line of the report, derived from a module and its stored outcome
#[derive(Debug, Clone, Copy)]
pub struct ReportRow<'a> {
    pub module: &'a Module,
    pub result: &'a LicenseResult,
}

impl<'a> ReportRow<'a> {
    pub fn new(module: &'a Module, result: &'a LicenseResult) -> Self {
        Self { module, result }
    }

    /// Append this row, including its line terminator, to `out`.
    pub fn write_to(&self, out: &mut String, quoting: Quoting) {
        push_field(out, &self.module.path, quoting);
        out.push(',');
        push_field(out, &self.module.version, quoting);
        out.push(',');

        match self.result {
            LicenseResult::Unresolved => push_field(out, "no, no", quoting),
            LicenseResult::Failed(err) => push_field(out, &format!("ERROR: {err}"), quoting),
            LicenseResult::Resolved(license) => {
                push_field(out, &license.spdx, quoting);
                // Publisher and Description stay empty
                out.push_str(",,,");
                push_field(out, license.describe(), quoting);
            }
            // Short row kept for compatibility with existing report readers
            LicenseResult::NotFound => {}
        }

        out.push('\n');
    }

    pub fn render(&self, quoting: Quoting) -> String {
        let mut out = String::new();
        self.write_to(&mut out, quoting);
        out
    }
}

/// Render a complete report from rows that are already in output order.
pub fn render_report<'a, I>(rows: I, options: &CsvOptions) -> String
where
    I: IntoIterator<Item = ReportRow<'a>>,
{
    let mut out = String::new();

    if options.header {
        for (i, column) in HEADER.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(column);
        }
        out.push('\n');
    }

    for row in rows {
        row.write_to(&mut out, options.quoting);
    }

    out
}

fn push_field(out: &mut String, value: &str, quoting: Quoting) {
    match quoting {
        Quoting::None => out.push_str(value),
        Quoting::Rfc4180 => {
            if value.contains([',', '"', '\r', '\n']) {
                out.push('"');
                out.push_str(&value.replace('"', "\"\""));
                out.push('"');
            } else {
                out.push_str(value);
            }
        }
    }
}
