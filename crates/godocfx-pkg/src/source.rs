//! Declaration sources.
//!
//! A declaration source turns the file list of one package into its
//! [`PackageDoc`] plus the import statements found in those files. Every call
//! works on a fresh, independent set of files.
//!
//! The bundled [`SidecarSource`] reads a JSON dump written next to each Go
//! file by an external extractor:
//!
//! ```json
//! {
//!   "package": "sub",
//!   "doc": "Package sub does things.",
//!   "imports": [{"path": "context"}, {"path": "cloud.google.com/go/storage", "name": "gcs"}],
//!   "consts": [{"names": ["A", "B"], "doc": "ints", "decl": "const A, B = 1, 2"}],
//!   "types": [{"name": "Client", "decl": "type Client struct{}"}],
//!   "funcs": [{"name": "Do", "recv": "*Client", "decl": "func (c *Client) Do() error"}],
//!   "examples": [{"name": "ExampleClient_Do", "code": "{\n\tc.Do()\n}"}]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decl::PackageDoc;
use crate::merge::merge_files;

/// Extension appended to a Go file name to find its declaration dump.
pub const SIDECAR_EXT: &str = "json";

/// Errors that can occur while extracting declarations.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A literal import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Imported package path.
    pub path: String,
    /// Local alias, if the import is renamed.
    #[serde(default)]
    pub name: Option<String>,
}

impl ImportSpec {
    /// An unaliased import.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }

    /// A renamed import.
    pub fn aliased(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
        }
    }
}

/// Everything extracted from one package's files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPackage {
    /// The package's documentation.
    pub doc: PackageDoc,
    /// Import statements from every file, in file order.
    pub imports: Vec<ImportSpec>,
}

/// Extracts declarations for a package from its source files.
pub trait DeclarationSource {
    /// Parse `files` as the package `import_path`.
    fn parse_package(&self, import_path: &str, files: &[PathBuf])
        -> Result<ParsedPackage, SourceError>;
}

/// Declarations found in a single Go file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileDecls {
    /// Package clause name.
    pub package: String,
    /// Package doc comment carried by this file.
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
    #[serde(default)]
    pub consts: Vec<ValueDecl>,
    #[serde(default)]
    pub vars: Vec<ValueDecl>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub funcs: Vec<FuncDecl>,
    #[serde(default)]
    pub examples: Vec<ExampleDecl>,
}

/// A `const` or `var` statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueDecl {
    pub names: Vec<String>,
    #[serde(default)]
    pub doc: String,
    pub decl: String,
    /// Declared type of the group, when it names a package type.
    #[serde(default)]
    pub type_name: Option<String>,
}

/// A `type` declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    pub decl: String,
}

/// A function or method declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuncDecl {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    pub decl: String,
    /// Receiver type expression, e.g. `*Client` or `List[T]`.
    #[serde(default)]
    pub recv: Option<String>,
    /// Result type expressions.
    #[serde(default)]
    pub results: Vec<String>,
}

/// An example function from a `_test.go` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleDecl {
    /// Full function name, e.g. `ExampleClient_Do_retry`.
    pub name: String,
    /// Body including its braces.
    pub code: String,
    /// Standalone program, when the example is playable.
    #[serde(default)]
    pub play: Option<String>,
}

/// Reads `<file>.json` declaration dumps next to each Go file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarSource;

impl SidecarSource {
    /// Path of the dump describing `file`.
    pub fn sidecar_path(file: &Path) -> PathBuf {
        let mut name = file.as_os_str().to_owned();
        name.push(".");
        name.push(SIDECAR_EXT);
        PathBuf::from(name)
    }

    fn read_file(file: &Path) -> Result<FileDecls, SourceError> {
        let path = Self::sidecar_path(file);
        let data = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| SourceError::Parse { path, source })
    }
}

impl DeclarationSource for SidecarSource {
    fn parse_package(
        &self,
        import_path: &str,
        files: &[PathBuf],
    ) -> Result<ParsedPackage, SourceError> {
        let decls = files
            .iter()
            .map(|f| Self::read_file(f).map(|decls| (f.clone(), decls)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(merge_files(import_path, decls))
    }
}
