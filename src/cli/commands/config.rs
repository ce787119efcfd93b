use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::config::{ReportConfig, Settings};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format: json, toml
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Validate configuration
    Validate,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let settings = ReportConfig::load_with_custom_config(custom_config)?.settings()?;

    match args.command {
        ConfigCommand::Show { format } => {
            let rendered = match format.to_lowercase().as_str() {
                "json" => serde_json::to_string_pretty(&settings)?,
                "toml" => toml::to_string_pretty(&settings)?,
                _ => {
                    return Err(anyhow::anyhow!("Unsupported format: {}. Use json or toml", format));
                }
            };
            println!("{}", rendered);
        }
        ConfigCommand::Validate => {
            let problems = validate(&settings);
            if problems.is_empty() {
                output.success("Configuration is valid");
                output.key_value("Report output:", &settings.report.output, true);
                output.key_value("Header:", &settings.report.csv.header.to_string(), false);
                output.key_value("Quoting:", &format!("{:?}", settings.report.csv.quoting), false);
                let overrides = settings.policy.overrides.len().to_string();
                output.key_value("Policy overrides:", &overrides, false);
            } else {
                for problem in &problems {
                    output.error(problem);
                }
                anyhow::bail!("Configuration has {} problem(s)", problems.len());
            }
        }
    }

    Ok(())
}

/// Collect human readable configuration problems
pub fn validate(settings: &Settings) -> Vec<String> {
    let mut problems = Vec::new();

    if settings.report.output.trim().is_empty() {
        problems.push("report.output must not be empty".to_string());
    }

    let percentage = settings.parallel.thread_percentage;
    if percentage == 0 || percentage > 100 {
        problems.push(format!("parallel.thread_percentage must be 1-100, got {percentage}"));
    }

    for spdx in &settings.policy.allow {
        if settings.policy.deny.contains(spdx) {
            problems.push(format!("'{spdx}' is both allowed and denied"));
        }
    }

    problems
}
