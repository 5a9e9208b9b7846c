//! Auxiliary files published next to the reference pages.

use std::path::{Path, PathBuf};

use crate::error::DocError;

/// Output name of a module README.
pub const README_DST: &str = "pkg-readme.md";

/// A file copied from the module root into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraFile {
    /// Path relative to the module root.
    pub src: PathBuf,
    /// Path relative to the output directory.
    pub dst: String,
    /// Display name in the table of contents.
    pub name: String,
}

impl ExtraFile {
    /// Describe the file at `rel`, relative to the module root.
    pub fn new(rel: &Path) -> Self {
        let stem = rel
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (dst, name) = if stem.eq_ignore_ascii_case("readme") {
            let dst = match rel.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.join(README_DST),
                _ => PathBuf::from(README_DST),
            };
            (dst, "Readme".to_string())
        } else {
            (rel.to_path_buf(), title_case(&stem))
        };
        Self {
            src: rel.to_path_buf(),
            dst: to_slash(&dst),
            name,
        }
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Upper-case the first letter of every word.
///
/// Letters, digits and `_` continue a word; anything else separates words.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

fn is_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Resolve the configured extra files against the module root.
///
/// Entries that do not exist are skipped. Entries containing glob
/// metacharacters expand to every matching file, in path order.
pub fn resolve_extra_files(module_dir: &Path, entries: &[String]) -> Result<Vec<ExtraFile>, DocError> {
    let mut files = Vec::new();
    for entry in entries {
        if !is_pattern(entry) {
            if module_dir.join(entry).exists() {
                files.push(ExtraFile::new(Path::new(entry)));
            } else {
                tracing::debug!(file = %entry, "extra file not found; skipping");
            }
            continue;
        }

        let pattern = module_dir.join(entry);
        let paths = glob::glob(&pattern.to_string_lossy()).map_err(|e| DocError::ExtraFile {
            pattern: entry.clone(),
            reason: e.msg.to_string(),
        })?;
        let mut matched: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .filter_map(|p| p.strip_prefix(module_dir).ok().map(Path::to_path_buf))
            .collect();
        matched.sort();
        if matched.is_empty() {
            tracing::debug!(pattern = %entry, "extra file pattern matched nothing");
        }
        files.extend(matched.iter().map(|p| ExtraFile::new(p)));
    }
    Ok(files)
}
