use anyhow::{Context, Result};
use figment::{Figment, providers::{Format, Toml, Json, Yaml, Env}};

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct ReportConfig {
    figment: Figment,
}

impl ReportConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            if !std::path::Path::new(custom_path).exists() {
                anyhow::bail!("Config file not found: {custom_path}");
            }
            figment = match std::path::Path::new(custom_path)
                .extension()
                .and_then(|ext| ext.to_str())
            {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user_config = Self::user_config_path();
            // Standard priority: user config -> repo config
            figment = figment
                .merge(Toml::file(&user_config))
                .merge(Json::file(user_config.replace(".toml", ".json")))
                .merge(Yaml::file(user_config.replace(".toml", ".yaml")))
                .merge(Toml::file("license-report.toml"))
                .merge(Json::file("license-report.json"))
                .merge(Yaml::file("license-report.yaml"))
                .merge(Yaml::file("license-report.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("LICENSE_REPORT_").split("__"));

        Ok(ReportConfig { figment })
    }

    /// Layer extra values (typically CLI flags) over the loaded configuration
    pub fn with_overrides(mut self, overrides: serde_json::Value) -> Self {
        tracing::trace!("CONFIG LOAD: Applying CLI overrides");
        self.figment = self
            .figment
            .merge(figment::providers::Serialized::defaults(overrides));
        self
    }

    /// Extract the typed settings
    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("Invalid license-report configuration")
    }

    /// Get a nested object/section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/license-report/config.toml", home),
            Err(_) => "~/.config/license-report/config.toml".to_string(),
        }
    }
}
