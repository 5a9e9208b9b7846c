//! Identifier resolution.
//!
//! A [`Linker`] is built once per package and turns identifiers found in
//! declaration signatures into links: a local anchor for the package's own
//! exported names, a same-site reference page for allow-listed modules, the
//! public doc host for everything else, and the `builtin` page for
//! predeclared identifiers. Resolution never fails; anything it cannot place
//! is returned unlinked.

use std::collections::HashMap;
use std::path::PathBuf;

use godocfx_pkg::{
    has_any_prefix, is_exported, is_predeclared, DeclarationSource, ModuleInfo, PackageBundle,
    UnitGraph,
};

use crate::anchor::AnchorIndex;
use crate::config::LinkConfig;

/// Import path of the page documenting predeclared identifiers.
const BUILTIN_PACKAGE: &str = "builtin";

/// Key of the current package in the anchor table.
const LOCAL: &str = "";

/// Resolves identifiers for one package.
#[derive(Debug, Clone)]
pub struct Linker {
    /// Local package name or alias to import path.
    imports: HashMap<String, String>,
    /// Package path to its anchor index; [`LOCAL`] is the current package.
    id_to_anchor: HashMap<String, AnchorIndex>,
    /// Import path to module for every import documented on the same site.
    same_domain_modules: HashMap<String, ModuleInfo>,
    doc_host: String,
    reference_prefix: String,
}

impl Linker {
    /// Build the linker for `bundle`.
    ///
    /// Same-domain imports are extracted through `source` so their anchors
    /// are known; an import that fails to extract still links to its page,
    /// just without anchors.
    pub fn new(
        bundle: &PackageBundle,
        graph: &UnitGraph,
        source: &dyn DeclarationSource,
        links: &LinkConfig,
    ) -> Self {
        let mut imports = HashMap::new();
        let mut id_to_anchor = HashMap::new();
        let mut same_domain_modules = HashMap::new();

        for path in &bundle.unit.imports {
            let unit = graph.get(path);
            let alias = bundle
                .import_aliases
                .get(path)
                .map(String::as_str)
                .unwrap_or_default();
            let name = if !alias.is_empty() {
                alias.to_string()
            } else if let Some(unit) = unit {
                unit.name.clone()
            } else {
                path.rsplit('/').next().unwrap_or(path).to_string()
            };
            if name != "_" && name != "." {
                imports.insert(name, path.clone());
            }

            let Some(unit) = unit else { continue };
            let Some(module) = &unit.module else { continue };
            if !has_any_prefix(path, &links.same_domain) || path.contains("internal") {
                continue;
            }

            let files: Vec<PathBuf> = unit.go_files().cloned().collect();
            let index = match source.parse_package(path, &files) {
                Ok(parsed) => AnchorIndex::build(&parsed.doc),
                Err(err) => {
                    tracing::warn!(import = %path, error = %err, "failed to extract same-domain package; linking without anchors");
                    AnchorIndex::root_only(path)
                }
            };
            id_to_anchor.insert(path.clone(), index);
            same_domain_modules.insert(path.clone(), module.clone());
        }

        id_to_anchor.insert(LOCAL.to_string(), AnchorIndex::build(&bundle.doc));

        Self {
            imports,
            id_to_anchor,
            same_domain_modules,
            doc_host: links.doc_host.clone(),
            reference_prefix: links.reference_prefix.clone(),
        }
    }

    /// Import path recorded for a local package name.
    pub fn import_path(&self, name: &str) -> Option<&str> {
        self.imports.get(name).map(String::as_str)
    }

    /// Whether `path` is linked on the same site.
    pub fn is_same_domain(&self, path: &str) -> bool {
        self.same_domain_modules.contains_key(path)
    }

    fn anchor(&self, pkg: &str, name: &str) -> Option<&str> {
        self.id_to_anchor.get(pkg).and_then(|index| index.get(name))
    }

    /// Turn an identifier into HTML, linking what can be resolved.
    ///
    /// Accepts `T`, `*T`, `...T`, `pkg.T` and combinations of the prefixes.
    pub fn linkify(&self, s: &str) -> String {
        let (mut prefix, rest) = match s.strip_prefix("...") {
            Some(rest) => ("...".to_string(), rest),
            None => (String::new(), s),
        };
        let rest = match rest.strip_prefix('*') {
            Some(rest) => {
                prefix.push('*');
                rest
            }
            None => rest,
        };
        if rest.is_empty() {
            return s.to_string();
        }

        let parts: Vec<&str> = rest.split('.').collect();
        match parts.as_slice() {
            [ident] => {
                if is_exported(ident) {
                    format!("{prefix}{}", href(&self.to_url("", ident), ident))
                } else if is_predeclared(ident) {
                    format!("{prefix}{}", href(&self.to_url(BUILTIN_PACKAGE, ident), ident))
                } else {
                    format!("{prefix}{ident}")
                }
            }
            [qualifier, name] => match self.imports.get(*qualifier) {
                Some(path) => format!(
                    "{prefix}{}.{}",
                    href(&self.to_url(path, ""), qualifier),
                    href(&self.to_url(path, name), name)
                ),
                None => format!("{prefix}{rest}"),
            },
            _ => format!("{prefix}{rest}"),
        }
    }

    /// URL for `name` in package `pkg`.
    ///
    /// An empty `pkg` means the current package; an empty `name` means the
    /// package page itself.
    pub fn to_url(&self, pkg: &str, name: &str) -> String {
        if pkg.is_empty() {
            let anchor = self.anchor(LOCAL, name).unwrap_or(name);
            return format!("#{anchor}");
        }

        if let Some(module) = self.same_domain_modules.get(pkg) {
            if let Some(remainder) = module.remainder(pkg) {
                let base = format!(
                    "{}/{}/latest/{}",
                    self.reference_prefix, module.path, remainder
                );
                return match self.anchor(pkg, name) {
                    Some(anchor) => format!("{base}#{anchor}"),
                    None => base,
                };
            }
            tracing::debug!(package = %pkg, module = %module.path, "import outside its module; linking externally");
        }

        if name.is_empty() {
            format!("{}/{}", self.doc_host, pkg)
        } else {
            format!("{}/{}#{}", self.doc_host, pkg, name)
        }
    }
}

/// Render an anchor element.
pub fn href(url: &str, text: &str) -> String {
    format!(r#"<a href="{url}">{text}</a>"#)
}
