//! Whole-module generation.

use std::collections::BTreeMap;

use godocfx_pkg::{DeclarationSource, ModuleInfo, Selection};

use crate::builder::build_page;
use crate::config::Config;
use crate::error::DocError;
use crate::extra::{resolve_extra_files, ExtraFile};
use crate::linker::Linker;
use crate::model::{Page, Toc};
use crate::render::DocRenderer;
use crate::toc::build_toc;

/// Everything generated for one module.
#[derive(Debug, Clone)]
pub struct DocSet {
    /// Pages keyed by import path.
    pub pages: BTreeMap<String, Page>,
    /// Navigation tree.
    pub toc: Toc,
    /// The documented module.
    pub module: ModuleInfo,
    /// Files copied next to the pages.
    pub extra_files: Vec<ExtraFile>,
}

/// Build pages and the table of contents for a selection.
///
/// Packages are processed one at a time in selection order, each with its
/// own linker.
pub fn generate(
    selection: &Selection,
    config: &Config,
    source: &dyn DeclarationSource,
    renderer: &dyn DocRenderer,
) -> Result<DocSet, DocError> {
    let module = &selection.module;
    let extra_files = resolve_extra_files(&module.dir, &config.run.extra_files)?;

    let import_paths: Vec<&str> = selection
        .packages
        .iter()
        .map(|p| p.doc.import_path.as_str())
        .collect();
    let toc = build_toc(&module.path, &import_paths, &extra_files)?;

    let mut pages = BTreeMap::new();
    for bundle in &selection.packages {
        let linker = Linker::new(bundle, &selection.graph, source, &config.links);
        let page = build_page(bundle, &linker, renderer, &config.links)?;
        pages.insert(bundle.doc.import_path.clone(), page);
    }

    tracing::info!(
        module = %module.path,
        pages = pages.len(),
        extra_files = extra_files.len(),
        "generated docset"
    );
    Ok(DocSet {
        pages,
        toc,
        module: module.clone(),
        extra_files,
    })
}
