//! godocfx Core - DocFX reference model for Go modules
//!
//! This crate provides:
//! - Anchors: stable UIDs and fragment ids for declarations
//! - Linker: identifier resolution to local, same-site and external links
//! - Signatures: declaration text with linked identifiers
//! - Builder: package pages, items and the table of contents
//! - Output: DocFX YAML files

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// UIDs and anchors
pub mod anchor;

/// Page construction
pub mod builder;

/// Run configuration
pub mod config;

/// Whole-module generation
pub mod docset;

/// Error types
pub mod error;

/// Example code processing
pub mod examples;

/// Auxiliary files
pub mod extra;

/// Identifier resolution
pub mod linker;

/// Output records
pub mod model;

/// YAML emitter
pub mod output;

/// Doc comment rendering
pub mod render;

/// Declaration signatures
pub mod signature;

/// Table of contents
pub mod toc;

pub use anchor::{sanitize, AnchorIndex};
pub use builder::build_page;
pub use config::{Config, ConfigError, LinkConfig, RunConfig, CONFIG_FILE};
pub use docset::{generate, DocSet};
pub use error::DocError;
pub use extra::{resolve_extra_files, ExtraFile};
pub use linker::{href, Linker};
pub use model::{CodeExample, DeclKind, Item, Page, Syntax, Toc, TocItem};
pub use output::{toc_yaml, write_docset};
pub use render::{DocRenderer, GodocHtml, RenderError};
pub use toc::build_toc;
