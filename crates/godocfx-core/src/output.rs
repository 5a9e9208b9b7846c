//! YAML output.
//!
//! Layout of the output directory:
//!
//! ```text
//! <out>/toc.yml
//! <out>/<import path>.yml
//! <out>/<extra file dst>
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::docset::DocSet;
use crate::error::DocError;
use crate::model::Toc;

/// First line of every page file.
pub const PAGE_HEADER: &str = "### YamlMime:UniversalReference";

/// First line of the table of contents file.
pub const TOC_HEADER: &str = "### YamlMime:TableOfContents";

/// Name of the table of contents file.
pub const TOC_FILE: &str = "toc.yml";

fn to_yaml<T: Serialize>(header: &str, value: &T, what: &str) -> Result<String, DocError> {
    let body = serde_yaml::to_string(value).map_err(|source| DocError::Yaml {
        what: what.to_string(),
        source,
    })?;
    Ok(format!("{header}\n{body}"))
}

/// Serialize the table of contents with its header.
pub fn toc_yaml(toc: &Toc) -> Result<String, DocError> {
    to_yaml(TOC_HEADER, toc, TOC_FILE)
}

fn write_file(path: &Path, contents: &str) -> Result<(), DocError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    std::fs::write(path, contents).map_err(|source| DocError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(dir: &Path) -> Result<(), DocError> {
    std::fs::create_dir_all(dir).map_err(|source| DocError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Path of the page file for `import_path`.
pub fn page_path(out_dir: &Path, import_path: &str) -> PathBuf {
    out_dir.join(format!("{import_path}.yml"))
}

/// Write pages, the table of contents and extra files under `out_dir`.
pub fn write_docset(out_dir: &Path, docset: &DocSet) -> Result<(), DocError> {
    create_dir(out_dir)?;

    for (import_path, page) in &docset.pages {
        let contents = to_yaml(PAGE_HEADER, page, import_path)?;
        write_file(&page_path(out_dir, import_path), &contents)?;
    }

    write_file(&out_dir.join(TOC_FILE), &toc_yaml(&docset.toc)?)?;

    for extra in &docset.extra_files {
        let src = docset.module.dir.join(&extra.src);
        let dst = out_dir.join(&extra.dst);
        if let Some(parent) = dst.parent() {
            create_dir(parent)?;
        }
        std::fs::copy(&src, &dst).map_err(|source| DocError::Io { path: src, source })?;
    }

    tracing::info!(
        out = %out_dir.display(),
        pages = docset.pages.len(),
        "wrote docset"
    );
    Ok(())
}
