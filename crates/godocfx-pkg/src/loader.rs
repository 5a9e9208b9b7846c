//! Compiled-unit loading.
//!
//! The loader answers "which units does this pattern cover?". The Go build
//! system is the source of truth; `go list -json` reports one JSON object per
//! unit, concatenated on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use thiserror::Error;

use crate::unit::{CompiledUnit, ModuleInfo};

/// Errors that can occur while loading compiled units.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode package metadata: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("`go list` failed ({status}): {stderr}")]
    Command { status: String, stderr: String },
}

/// Source of compiled-unit metadata.
pub trait UnitLoader {
    /// Load every unit reachable from `pattern`, evaluated in `working_dir`.
    fn load(&self, pattern: &str, working_dir: &Path) -> Result<Vec<CompiledUnit>, LoadError>;
}

/// Loads units by running `go list`.
#[derive(Debug, Clone)]
pub struct GoListLoader {
    go: PathBuf,
}

impl Default for GoListLoader {
    fn default() -> Self {
        Self {
            go: PathBuf::from("go"),
        }
    }
}

impl GoListLoader {
    /// Use a specific `go` binary.
    pub fn with_go(go: impl Into<PathBuf>) -> Self {
        Self { go: go.into() }
    }
}

impl UnitLoader for GoListLoader {
    fn load(&self, pattern: &str, working_dir: &Path) -> Result<Vec<CompiledUnit>, LoadError> {
        tracing::debug!(pattern, dir = %working_dir.display(), "running go list");
        let output = Command::new(&self.go)
            .args(["list", "-e", "-json", "-deps", "-test", pattern])
            .current_dir(working_dir)
            .output()?;

        if !output.status.success() {
            return Err(LoadError::Command {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        decode_stream(&output.stdout)
    }
}

/// Loads units from a saved `go list -json` stream.
///
/// The pattern and working directory are ignored; the file already holds
/// the answer.
#[derive(Debug, Clone)]
pub struct JsonUnitLoader {
    path: PathBuf,
}

impl JsonUnitLoader {
    /// Read units from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UnitLoader for JsonUnitLoader {
    fn load(&self, _pattern: &str, _working_dir: &Path) -> Result<Vec<CompiledUnit>, LoadError> {
        let data = std::fs::read(&self.path)?;
        decode_stream(&data)
    }
}

/// One `go list -json` record. Only the fields we consume are declared.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedPackage {
    import_path: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    dir: PathBuf,
    #[serde(default)]
    module: Option<ListedModule>,
    #[serde(default)]
    go_files: Vec<String>,
    #[serde(default)]
    cgo_files: Vec<String>,
    #[serde(default)]
    test_go_files: Vec<String>,
    #[serde(default)]
    x_test_go_files: Vec<String>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    dep_only: bool,
    #[serde(default)]
    error: Option<ListedError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedModule {
    path: String,
    #[serde(default)]
    dir: PathBuf,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedError {
    #[serde(default)]
    err: String,
}

impl From<ListedPackage> for CompiledUnit {
    fn from(pkg: ListedPackage) -> Self {
        let import_path = match pkg.import_path.find(" [") {
            Some(idx) => pkg.import_path[..idx].to_string(),
            None => pkg.import_path.clone(),
        };
        let dir = pkg.dir;
        let files = pkg
            .go_files
            .iter()
            .chain(&pkg.cgo_files)
            .chain(&pkg.test_go_files)
            .chain(&pkg.x_test_go_files)
            .map(|f| dir.join(f))
            .collect();

        Self {
            id: pkg.import_path,
            name: pkg.name,
            import_path,
            module: pkg.module.map(|m| ModuleInfo {
                path: m.path,
                dir: m.dir,
                version: m.version,
            }),
            files,
            imports: pkg.imports,
            dep_only: pkg.dep_only,
            error: pkg.error.map(|e| e.err),
        }
    }
}

/// Decode a stream of concatenated JSON package records.
fn decode_stream(data: &[u8]) -> Result<Vec<CompiledUnit>, LoadError> {
    let mut units = Vec::new();
    for record in serde_json::Deserializer::from_slice(data).into_iter::<ListedPackage>() {
        units.push(CompiledUnit::from(record?));
    }
    Ok(units)
}
