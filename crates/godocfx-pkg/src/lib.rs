//! Package discovery for godocfx.
//!
//! This crate provides:
//! - Compiled-unit metadata for a Go build pattern (`go list`)
//! - The declaration model extracted from a package's source files
//! - Declaration sources that turn file lists into that model
//! - Package selection: deciding which units belong to the target module

mod decl;
mod ident;
mod loader;
mod merge;
mod selector;
mod source;
mod unit;

pub use decl::{Example, FuncDoc, PackageDoc, TypeDoc, ValueGroup};
pub use ident::{has_any_prefix, is_exported, is_predeclared};
pub use loader::{GoListLoader, JsonUnitLoader, LoadError, UnitLoader};
pub use merge::{classify_example, merge_files};
pub use selector::{PackageBundle, PackageSelector, SelectError, SelectOptions, Selection};
pub use source::{
    DeclarationSource, ExampleDecl, FileDecls, FuncDecl, ImportSpec, ParsedPackage,
    SidecarSource, SourceError, TypeDecl, ValueDecl, SIDECAR_EXT,
};
pub use unit::{CompiledUnit, ModuleInfo, UnitGraph, GO_EXT};
