//! Dependency modules and their identities
//!
//! Modules are registered once in a [`ModuleArena`] before scanning starts.
//! Everything downstream (workers, sinks) refers to a module by the
//! [`ModuleId`] handle the arena issued, never by its path string, so two
//! distinct modules that happen to share a path remain distinct for the
//! duration of a scan.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A scanned dependency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Stable identifier such as a package coordinate (`github.com/x/y`)
    pub path: String,

    /// Version string, empty when unknown
    #[serde(default)]
    pub version: String,
}

impl Module {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}@{}", self.path, self.version)
        }
    }
}

/// Opaque handle identifying a module inside its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(u32);

impl ModuleId {
    /// Handle for the module stored at `index`, if it fits in a `u32`.
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The arena already holds as many modules as a [`ModuleId`] can address
#[derive(Debug, Error)]
#[error("Module arena is full ({0} modules registered)")]
pub struct ArenaFull(usize);

/// Append-only storage of modules, indexed by [`ModuleId`]
///
/// The arena is built by whoever enumerates dependencies and is then shared
/// read-only (usually behind an `Arc`) with workers and sinks.
#[derive(Debug, Default, Clone)]
pub struct ModuleArena {
    modules: Vec<Module>,
}

impl ModuleArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and return its identity.
    ///
    /// Registering the same path twice yields two identities. Fails once
    /// every `u32` id has been issued.
    pub fn insert(&mut self, module: Module) -> Result<ModuleId, ArenaFull> {
        let id = ModuleId::from_index(self.modules.len()).ok_or(ArenaFull(self.modules.len()))?;
        self.modules.push(module);
        Ok(id)
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// All identities in registration order
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len()).filter_map(ModuleId::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter_map(|(i, m)| ModuleId::from_index(i).map(|id| (id, m)))
    }
}

impl TryFrom<Vec<Module>> for ModuleArena {
    type Error = ArenaFull;

    fn try_from(modules: Vec<Module>) -> Result<Self, Self::Error> {
        if ModuleId::from_index(modules.len().saturating_sub(1)).is_none() {
            return Err(ArenaFull(modules.len()));
        }
        Ok(Self { modules })
    }
}
