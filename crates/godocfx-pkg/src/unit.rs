//! Compiled units and the module they belong to.
//!
//! A compiled unit is one entry reported by the Go build system for a pattern:
//! a regular package, a test-augmented variant (`p [p.test]`), an external
//! test package (`p_test [p.test]`) or a test binary (`p.test`).

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Go source file extension.
pub const GO_EXT: &str = "go";

/// A versioned module root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module path, e.g. `cloud.google.com/go/storage`.
    pub path: String,

    /// Directory holding the module on disk.
    #[serde(default)]
    pub dir: PathBuf,

    /// Module version, if known.
    #[serde(default)]
    pub version: Option<String>,
}

impl ModuleInfo {
    /// Create a module descriptor.
    pub fn new(path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dir: dir.into(),
            version: None,
        }
    }

    /// Returns the part of `import_path` beneath the module root.
    ///
    /// The module's own root package has an empty remainder. `None` means the
    /// import path does not live inside this module.
    pub fn remainder<'a>(&self, import_path: &'a str) -> Option<&'a str> {
        if import_path == self.path {
            return Some("");
        }
        import_path
            .strip_prefix(self.path.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

/// One unit reported by the package loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// Unique loader identifier, e.g. `example.com/m/sub [example.com/m/sub.test]`.
    pub id: String,
    /// Package clause name.
    pub name: String,
    /// Import path without any build-variant suffix.
    pub import_path: String,
    /// Owning module, absent for standard-library units.
    pub module: Option<ModuleInfo>,
    /// Absolute paths of the unit's source files.
    pub files: Vec<PathBuf>,
    /// Import paths of direct imports.
    pub imports: Vec<String>,
    /// Present only as a dependency of the requested pattern.
    pub dep_only: bool,
    /// Load error reported for this unit.
    pub error: Option<String>,
}

impl CompiledUnit {
    /// Create a unit whose id equals its import path.
    pub fn new(import_path: impl Into<String>) -> Self {
        let import_path = import_path.into();
        let name = import_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            id: import_path.clone(),
            name,
            import_path,
            module: None,
            files: Vec::new(),
            imports: Vec::new(),
            dep_only: false,
            error: None,
        }
    }

    /// Set the loader identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the package clause name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the owning module.
    #[must_use]
    pub fn with_module(mut self, module: ModuleInfo) -> Self {
        self.module = Some(module);
        self
    }

    /// Set the source files.
    #[must_use]
    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Set the direct imports.
    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the unit as dependency-only.
    #[must_use]
    pub fn dependency(mut self) -> Self {
        self.dep_only = true;
        self
    }

    /// Go source files of the unit.
    pub fn go_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.files
            .iter()
            .filter(|f| f.extension().is_some_and(|ext| ext == GO_EXT))
    }

    /// Whether this unit is the plain build of its package.
    pub fn is_primary(&self) -> bool {
        self.id == self.import_path
    }
}

/// Read-only lookup of units by import path.
///
/// Only primary units are indexed; test variants share their import path with
/// the package they test and never stand in for it.
#[derive(Debug, Clone, Default)]
pub struct UnitGraph {
    units: HashMap<String, CompiledUnit>,
}

impl UnitGraph {
    /// Index the primary units of `units`.
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a CompiledUnit>) -> Self {
        let units = units
            .into_iter()
            .filter(|u| u.is_primary())
            .map(|u| (u.import_path.clone(), u.clone()))
            .collect();
        Self { units }
    }

    /// Look up a unit by import path.
    pub fn get(&self, import_path: &str) -> Option<&CompiledUnit> {
        self.units.get(import_path)
    }

    /// Number of indexed units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
