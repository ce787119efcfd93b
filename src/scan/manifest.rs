//! Results manifest
//!
//! A manifest lists the modules of a build together with what an upstream
//! lookup found for each of them. It can be written in TOML, JSON or YAML:
//!
//! ```toml
//! [[module]]
//! path = "github.com/x/y"
//! version = "v1.0.0"
//! license = { spdx = "MIT", name = "MIT License" }
//!
//! [[module]]
//! path = "github.com/a/b"
//! version = "v0.2.0"
//! error = "repository not found"
//! ```
//!
//! An entry with neither `license` nor `error` resolved to no license.

use super::{LicenseResolver, StatusReporter};
use crate::config::Policy;
use crate::license::{License, StatusKind};
use crate::module::{Module, ModuleArena, ModuleId};
use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One module and its lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "module", alias = "modules")]
    pub modules: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load a manifest, choosing the format from the file extension
    /// (TOML when unknown).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Manifest not found: {}", path.display());
        }

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Figment::from(Json::file(path)),
            Some("yaml") | Some("yml") => Figment::from(Yaml::file(path)),
            _ => Figment::from(Toml::file(path)),
        };

        let manifest: Manifest = figment
            .extract()
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
        tracing::debug!("Loaded {} modules from {}", manifest.modules.len(), path.display());
        Ok(manifest)
    }
}

/// Answers lookups from a manifest, applying policy overrides first
pub struct ManifestResolver {
    entries: Vec<ManifestEntry>,
    overrides: BTreeMap<String, String>,
}

impl ManifestResolver {
    /// Register every manifest entry in a fresh arena. Entry `i` becomes the
    /// module with the `i`-th identity.
    pub fn from_manifest(manifest: Manifest, policy: &Policy) -> Result<(ModuleArena, Self)> {
        let modules = manifest
            .modules
            .iter()
            .map(|entry| Module::new(entry.path.clone(), entry.version.clone()))
            .collect::<Vec<_>>();
        let arena = ModuleArena::try_from(modules)?;

        let resolver = Self {
            entries: manifest.modules,
            overrides: policy.overrides.clone(),
        };
        Ok((arena, resolver))
    }
}

impl LicenseResolver for ManifestResolver {
    fn resolve(
        &self,
        id: ModuleId,
        module: &Module,
        status: &StatusReporter<'_>,
    ) -> Result<Option<License>> {
        if let Some(spdx) = self.overrides.get(&module.path) {
            status.update(StatusKind::Normal, &format!("license overridden to {spdx}"));
            return Ok(Some(License::new(spdx.clone(), "")));
        }

        let entry = self
            .entries
            .get(id.index())
            .with_context(|| format!("No manifest entry for {module}"))?;

        if let Some(error) = &entry.error {
            status.update(StatusKind::Error, error);
            anyhow::bail!("{error}");
        }

        Ok(entry.license.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MultiSink, TracingSink};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const TOML_MANIFEST: &str = r#"
[[module]]
path = "github.com/x/y"
version = "v1.0.0"
license = { spdx = "MIT", name = "MIT License" }

[[module]]
path = "github.com/a/b"
version = "v0.2.0"
error = "not found"

[[module]]
path = "github.com/c/d"
"#;

    fn resolve_all(
        manifest: Manifest,
        policy: &Policy,
    ) -> Vec<std::result::Result<Option<License>, String>> {
        let (arena, resolver) = ManifestResolver::from_manifest(manifest, policy).unwrap();
        let sink = MultiSink::default();
        arena
            .iter()
            .map(|(id, module)| {
                resolver
                    .resolve(id, module, &StatusReporter::new(&sink, id))
                    .map_err(|e| e.to_string())
            })
            .collect()
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.toml");
        fs::write(&path, TOML_MANIFEST).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.modules.len(), 3);
        assert_eq!(manifest.modules[0].license, Some(License::new("MIT", "MIT License")));
        assert_eq!(manifest.modules[1].error.as_deref(), Some("not found"));
        assert_eq!(manifest.modules[2].version, "");
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        fs::write(
            &path,
            r#"{"modules": [
                {"path": "github.com/x/y", "version": "v1.0.0", "license": {"spdx": "ISC"}}
            ]}"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.modules[0].license.as_ref().unwrap().spdx, "ISC");
    }

    #[test]
    fn test_load_missing_manifest() {
        let err = Manifest::load(Path::new("/nonexistent/results.toml")).unwrap_err();
        assert!(err.to_string().contains("Manifest not found"));
    }

    #[test]
    fn test_resolves_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.toml");
        fs::write(&path, TOML_MANIFEST).unwrap();

        let results = resolve_all(Manifest::load(&path).unwrap(), &Policy::default());
        assert_eq!(
            results,
            vec![
                Ok(Some(License::new("MIT", "MIT License"))),
                Err("not found".to_string()),
                Ok(None),
            ]
        );
    }

    #[test]
    fn test_override_replaces_lookup() {
        let manifest = Manifest {
            modules: vec![ManifestEntry {
                path: "github.com/a/b".to_string(),
                version: "v0.2.0".to_string(),
                license: None,
                error: Some("not found".to_string()),
            }],
        };
        let mut policy = Policy::default();
        policy.overrides.insert("github.com/a/b".to_string(), "Apache-2.0".to_string());

        let results = resolve_all(manifest, &policy);
        assert_eq!(results, vec![Ok(Some(License::new("Apache-2.0", "")))]);
    }

    #[test]
    fn test_status_updates_reach_sink() {
        let manifest = Manifest {
            modules: vec![ManifestEntry {
                path: "github.com/a/b".to_string(),
                version: String::new(),
                license: None,
                error: Some("boom".to_string()),
            }],
        };
        let (arena, resolver) =
            ManifestResolver::from_manifest(manifest, &Policy::default()).unwrap();
        let arena = Arc::new(arena);
        let sink = TracingSink::new(arena.clone());

        let (id, module) = arena.iter().next().unwrap();
        let result = resolver.resolve(id, module, &StatusReporter::new(&sink, id));
        assert!(result.is_err());
    }
}
