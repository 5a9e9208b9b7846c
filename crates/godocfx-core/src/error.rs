//! Error types for documentation generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

/// Errors that can occur while building or writing a docset.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("failed to render docs of {import_path}: {source}")]
    Render {
        import_path: String,
        #[source]
        source: RenderError,
    },

    #[error("package {package} is not in module {module}")]
    UnprefixedPackage { package: String, module: String },

    #[error("duplicate uid {uid} on page {page}")]
    DuplicateUid { page: String, uid: String },

    #[error("invalid extra file pattern {pattern:?}: {reason}")]
    ExtraFile { pattern: String, reason: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Yaml {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },
}
