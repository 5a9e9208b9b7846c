//! Page construction.
//!
//! A package becomes one page: the package item first, then one item per
//! declaration. Declarations nested under a type are siblings of the type on
//! the page and name it as their parent; the package item lists every UID.

use std::collections::HashSet;

use godocfx_pkg::{FuncDoc, PackageBundle, TypeDoc, ValueGroup};

use crate::anchor::{group_id, group_uid, member_uid};
use crate::config::LinkConfig;
use crate::error::DocError;
use crate::examples::process_examples;
use crate::linker::Linker;
use crate::model::{DeclKind, Item, Page};
use crate::render::DocRenderer;
use crate::signature::format_signature;

/// A declaration on its way to becoming an item.
#[derive(Debug, Clone, Copy)]
enum Decl<'a> {
    Const(&'a ValueGroup),
    Var(&'a ValueGroup),
    Type(&'a TypeDoc),
    Func(&'a FuncDoc),
    Method(&'a FuncDoc),
}

impl Decl<'_> {
    fn kind(self) -> DeclKind {
        match self {
            Decl::Const(_) => DeclKind::Const,
            Decl::Var(_) => DeclKind::Variable,
            Decl::Type(_) => DeclKind::Type,
            Decl::Func(_) => DeclKind::Function,
            Decl::Method(_) => DeclKind::Method,
        }
    }

    /// Project onto the flat item record.
    ///
    /// `import_path` roots group UIDs; `parent` is the UID of the package or
    /// owning type, which also roots func and method UIDs beneath a type.
    fn to_item(self, import_path: &str, parent: &str, linker: &Linker) -> Item {
        let (uid, name, id, doc, decl, own, examples) = match self {
            Decl::Const(g) | Decl::Var(g) => (
                group_uid(import_path, &g.names),
                g.names.join(", "),
                group_id(&g.names),
                &g.doc,
                &g.decl,
                g.names.clone(),
                Vec::new(),
            ),
            Decl::Type(t) => (
                member_uid(import_path, &t.name),
                t.name.clone(),
                t.name.clone(),
                &t.doc,
                &t.decl,
                vec![t.name.clone()],
                process_examples(&t.examples),
            ),
            Decl::Func(f) => (
                member_uid(parent, &f.name),
                format!("func {}", f.name),
                f.name.clone(),
                &f.doc,
                &f.decl,
                vec![f.name.clone()],
                process_examples(&f.examples),
            ),
            Decl::Method(f) => (
                member_uid(parent, &f.name),
                format!("func ({}) {}", f.recv.as_deref().unwrap_or_default(), f.name),
                f.name.clone(),
                &f.doc,
                &f.decl,
                vec![f.name.clone()],
                process_examples(&f.examples),
            ),
        };

        let mut item = Item::new(uid, self.kind());
        item.name = name;
        item.id = id;
        item.parent = parent.to_string();
        item.summary = doc.clone();
        item.syntax.content = format_signature(decl, &own, |s| linker.linkify(s));
        item.examples = examples;
        item
    }
}

/// Accumulates a page and guards UID uniqueness.
struct PageBuilder<'a> {
    import_path: &'a str,
    linker: &'a Linker,
    page: Page,
    seen: HashSet<String>,
}

impl<'a> PageBuilder<'a> {
    fn add(&mut self, decl: Decl<'_>, parent: &str) -> Result<String, DocError> {
        let item = decl.to_item(self.import_path, parent, self.linker);
        let uid = item.uid.clone();
        if !self.seen.insert(uid.clone()) {
            return Err(DocError::DuplicateUid {
                page: self.import_path.to_string(),
                uid,
            });
        }
        self.page.items[0].children.push(uid.clone());
        self.page.items.push(item);
        Ok(uid)
    }
}

/// Build the reference page of one package.
pub fn build_page(
    bundle: &PackageBundle,
    linker: &Linker,
    renderer: &dyn DocRenderer,
    links: &LinkConfig,
) -> Result<Page, DocError> {
    let doc = &bundle.doc;
    let path = doc.import_path.as_str();

    let mut pkg_item = Item::new(path, DeclKind::Package);
    pkg_item.name = path.to_string();
    pkg_item.id = doc.name.clone();
    pkg_item.summary = renderer
        .render(&doc.doc)
        .map_err(|source| DocError::Render {
            import_path: path.to_string(),
            source,
        })?;
    pkg_item.examples = process_examples(&doc.examples);
    pkg_item.alt_link = format!("{}/{}", links.doc_host, path);

    let mut builder = PageBuilder {
        import_path: path,
        linker,
        page: Page {
            items: vec![pkg_item],
            references: Vec::new(),
        },
        seen: HashSet::from([path.to_string()]),
    };

    for c in &doc.consts {
        builder.add(Decl::Const(c), path)?;
    }
    for v in &doc.vars {
        builder.add(Decl::Var(v), path)?;
    }
    for t in &doc.types {
        let type_uid = builder.add(Decl::Type(t), path)?;
        for c in &t.consts {
            builder.add(Decl::Const(c), &type_uid)?;
        }
        for v in &t.vars {
            builder.add(Decl::Var(v), &type_uid)?;
        }
        for f in &t.funcs {
            builder.add(Decl::Func(f), &type_uid)?;
        }
        for m in &t.methods {
            builder.add(Decl::Method(m), &type_uid)?;
        }
    }
    for f in &doc.funcs {
        builder.add(Decl::Func(f), path)?;
    }

    tracing::debug!(package = %path, items = builder.page.items.len(), "built page");
    Ok(builder.page)
}
