//! Table of contents.

use crate::error::DocError;
use crate::extra::ExtraFile;
use crate::model::{Toc, TocItem};

/// Build the navigation tree for a module.
///
/// The module is the single root node. When it has several packages, the
/// root lists the module's own package, the extra files and then the other
/// packages by path beneath the module. A single-package module lists only
/// its extra files.
pub fn build_toc<S: AsRef<str>>(
    module_path: &str,
    import_paths: &[S],
    extra_files: &[ExtraFile],
) -> Result<Toc, DocError> {
    let mut root = TocItem::uid(module_path, module_path);

    if import_paths.len() == 1 {
        root.items
            .extend(extra_files.iter().map(|f| TocItem::href(&f.dst, &f.name)));
        return Ok(vec![root]);
    }

    root.items.push(TocItem::uid(module_path, module_path));
    root.items
        .extend(extra_files.iter().map(|f| TocItem::href(&f.dst, &f.name)));

    let prefix = format!("{module_path}/");
    let mut trimmed = Vec::with_capacity(import_paths.len());
    for path in import_paths {
        let path = path.as_ref();
        if path == module_path {
            continue;
        }
        let Some(rest) = path.strip_prefix(&prefix) else {
            return Err(DocError::UnprefixedPackage {
                package: path.to_string(),
                module: module_path.to_string(),
            });
        };
        trimmed.push(rest);
    }
    trimmed.sort_unstable();
    trimmed.dedup();

    root.items.extend(
        trimmed
            .into_iter()
            .map(|rest| TocItem::uid(format!("{prefix}{rest}"), rest)),
    );
    Ok(vec![root])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_single_package() {
        let toc = build_toc("example.com/m", &["example.com/m"], &[]).unwrap();
        assert_eq!(toc, vec![TocItem::uid("example.com/m", "example.com/m")]);
    }

    #[test]
    fn test_single_package_with_readme() {
        let readme = ExtraFile::new(Path::new("README.md"));
        let toc = build_toc("example.com/m", &["example.com/m"], &[readme]).unwrap();
        assert_eq!(toc[0].items, vec![TocItem::href("pkg-readme.md", "Readme")]);
    }

    #[test]
    fn test_multi_package_order() {
        let readme = ExtraFile::new(Path::new("README.md"));
        let toc = build_toc(
            "example.com/m",
            &["example.com/m/zeta", "example.com/m", "example.com/m/alpha/beta"],
            &[readme],
        )
        .unwrap();

        assert_eq!(toc.len(), 1);
        assert_eq!(
            toc[0].items,
            vec![
                TocItem::uid("example.com/m", "example.com/m"),
                TocItem::href("pkg-readme.md", "Readme"),
                TocItem::uid("example.com/m/alpha/beta", "alpha/beta"),
                TocItem::uid("example.com/m/zeta", "zeta"),
            ]
        );
    }

    #[test]
    fn test_root_node_even_without_root_package() {
        let toc = build_toc("example.com/m", &["example.com/m/a", "example.com/m/b"], &[]).unwrap();
        assert_eq!(toc[0].items[0], TocItem::uid("example.com/m", "example.com/m"));
        assert_eq!(toc[0].items.len(), 3);
    }

    #[test]
    fn test_unprefixed_package_is_fatal() {
        let result = build_toc("example.com/m", &["example.com/m", "example.com/mother"], &[]);
        assert!(matches!(
            result,
            Err(DocError::UnprefixedPackage { package, .. }) if package == "example.com/mother"
        ));
    }
}
