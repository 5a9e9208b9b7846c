//! Package selection.
//!
//! Loading a pattern with tests enabled reports far more units than we want
//! pages for: test binaries, test-augmented variants, internal and vendored
//! packages, and packages from other modules. The selector reduces that list
//! to the documentable packages of the target module, in a stable order, and
//! extracts each one's declarations.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use thiserror::Error;

use crate::decl::PackageDoc;
use crate::ident::has_any_prefix;
use crate::loader::{LoadError, UnitLoader};
use crate::source::{DeclarationSource, SourceError};
use crate::unit::{CompiledUnit, ModuleInfo, UnitGraph};

/// Suffix of a compiled test binary id.
const TEST_BINARY_SUFFIX: &str = ".test";

/// Marker inside the id of an external test package, `p_test [p.test]`.
const XTEST_MARKER: &str = "_test [";

/// Marker of any non-primary build variant.
const VARIANT_MARKER: &str = " [";

/// Errors that can occur while selecting packages.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("failed to load packages: {0}")]
    Load(#[from] LoadError),

    #[error("pattern {0:?} matched 0 packages")]
    NoPackages(String),

    #[error("pattern {0:?} matched no package that belongs to a module")]
    NoModule(String),

    #[error("failed to extract declarations of {import_path}: {source}")]
    Source {
        import_path: String,
        #[source]
        source: SourceError,
    },
}

/// Inputs of one selection run.
#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Build pattern, usually ending in `...`.
    pub pattern: String,
    /// Directory the pattern is evaluated in.
    pub working_dir: PathBuf,
    /// Import path prefixes to leave out entirely.
    pub filter: Vec<String>,
}

impl SelectOptions {
    /// Options for `pattern` evaluated in `working_dir`, with no filter.
    pub fn new(pattern: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            working_dir: working_dir.into(),
            filter: Vec::new(),
        }
    }

    /// Set the filtered prefixes.
    #[must_use]
    pub fn with_filter(mut self, filter: Vec<String>) -> Self {
        self.filter = filter;
        self
    }
}

/// One documentable package.
#[derive(Debug, Clone)]
pub struct PackageBundle {
    /// Extracted declarations.
    pub doc: PackageDoc,
    /// The package's primary compiled unit.
    pub unit: CompiledUnit,
    /// Import path to local alias; empty when the import is not renamed.
    pub import_aliases: HashMap<String, String>,
}

/// Result of a selection run.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The target module.
    pub module: ModuleInfo,
    /// Documentable packages sorted by import path.
    pub packages: Vec<PackageBundle>,
    /// Every primary unit the loader reported, dependencies included.
    pub graph: UnitGraph,
}

/// Chooses the packages of the target module.
pub struct PackageSelector<'a> {
    loader: &'a dyn UnitLoader,
    source: &'a dyn DeclarationSource,
}

impl<'a> PackageSelector<'a> {
    /// Create a selector over a loader and a declaration source.
    pub fn new(loader: &'a dyn UnitLoader, source: &'a dyn DeclarationSource) -> Self {
        Self { loader, source }
    }

    /// Load `options.pattern` and select its documentable packages.
    pub fn select(&self, options: &SelectOptions) -> Result<Selection, SelectError> {
        let units = self.loader.load(&options.pattern, &options.working_dir)?;
        self.select_from(units, options)
    }

    /// Select from already-loaded units.
    pub fn select_from(
        &self,
        units: Vec<CompiledUnit>,
        options: &SelectOptions,
    ) -> Result<Selection, SelectError> {
        let graph = UnitGraph::from_units(&units);
        let plan = plan(&units, options)?;

        let mut packages = Vec::with_capacity(plan.packages.len());
        for (unit, files) in plan.packages {
            let parsed = self
                .source
                .parse_package(&unit.import_path, &files)
                .map_err(|source| SelectError::Source {
                    import_path: unit.import_path.clone(),
                    source,
                })?;

            if plan.module.remainder(&parsed.doc.import_path).is_none() {
                tracing::debug!(package = %parsed.doc.import_path, "outside the target module");
                continue;
            }

            let mut import_aliases: HashMap<String, String> = HashMap::new();
            for spec in parsed.imports {
                let alias = import_aliases.entry(spec.path).or_default();
                if alias.is_empty() {
                    *alias = spec.name.unwrap_or_default();
                }
            }

            tracing::debug!(package = %unit.import_path, files = files.len(), "selected package");
            packages.push(PackageBundle {
                doc: parsed.doc,
                unit: unit.clone(),
                import_aliases,
            });
        }

        Ok(Selection {
            module: plan.module,
            packages,
            graph,
        })
    }
}

/// Packages to extract, before any file is parsed.
#[derive(Debug)]
struct Plan<'u> {
    module: ModuleInfo,
    packages: Vec<(&'u CompiledUnit, Vec<PathBuf>)>,
}

fn plan<'u>(units: &'u [CompiledUnit], options: &SelectOptions) -> Result<Plan<'u>, SelectError> {
    let roots: Vec<&CompiledUnit> = units.iter().filter(|u| !u.dep_only).collect();
    if roots.is_empty() {
        return Err(SelectError::NoPackages(options.pattern.clone()));
    }
    let module = roots
        .iter()
        .find_map(|u| u.module.clone())
        .ok_or_else(|| SelectError::NoModule(options.pattern.clone()))?;

    let mut skipped_modules: BTreeSet<&str> = BTreeSet::new();
    let mut primary: HashMap<&str, &CompiledUnit> = HashMap::new();
    let mut files: HashMap<String, Vec<PathBuf>> = HashMap::new();

    for unit in roots {
        if let Some(err) = &unit.error {
            tracing::warn!(unit = %unit.id, error = %err, "skipping package that failed to load");
            continue;
        }
        if has_any_prefix(&unit.import_path, &options.filter) {
            continue;
        }

        let id = unit.id.as_str();
        if id.ends_with(TEST_BINARY_SUFFIX)
            || id.contains("internal")
            || id.contains("third_party")
            || (id.contains(VARIANT_MARKER) && !id.contains(XTEST_MARKER))
        {
            continue;
        }

        let key = if let Some(idx) = id.find(XTEST_MARKER) {
            id[..idx].to_string()
        } else {
            if let Some(unit_module) = &unit.module {
                primary.insert(&unit.import_path, unit);
                if unit_module.path != module.path {
                    skipped_modules.insert(&unit_module.path);
                    continue;
                }
            }
            unit.import_path.clone()
        };

        // The primary unit already lists its test files; the test variants
        // repeat them.
        let pkg_files = files.entry(key).or_default();
        for file in unit.go_files() {
            if !pkg_files.contains(file) {
                pkg_files.push(file.clone());
            }
        }
    }

    let mut names: Vec<&str> = primary.keys().copied().collect();
    names.sort_unstable();

    let mut packages = Vec::with_capacity(names.len());
    for name in names {
        if skipped_modules.iter().any(|m| name.starts_with(m)) {
            continue;
        }
        let pkg_files = files.get(name).cloned().unwrap_or_default();
        packages.push((primary[name], pkg_files));
    }

    Ok(Plan { module, packages })
}
