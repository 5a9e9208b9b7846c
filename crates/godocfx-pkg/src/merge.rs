//! Merging per-file declarations into one package.
//!
//! Follows Go's documentation grouping rules: only exported names are kept,
//! methods hang off their receiver type, constructors hang off the type they
//! return, and example functions attach to whatever their name designates.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::decl::{Example, FuncDoc, PackageDoc, TypeDoc, ValueGroup};
use crate::ident::is_exported;
use crate::source::{FileDecls, FuncDecl, ParsedPackage, ValueDecl};

const EXAMPLE_PREFIX: &str = "Example";
const TEST_FILE_SUFFIX: &str = "_test.go";
const TEST_PACKAGE_SUFFIX: &str = "_test";

/// Where an example attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExampleTarget {
    Package,
    Func(usize),
    TypeFunc(usize, usize),
    Type(usize),
    Method(usize, usize),
}

/// Merge the declarations of every file of one package.
///
/// Test files (`_test.go`, or an external `_test` package) only contribute
/// examples.
pub fn merge_files(
    import_path: &str,
    files: impl IntoIterator<Item = (PathBuf, FileDecls)>,
) -> ParsedPackage {
    let files: Vec<(bool, FileDecls)> = files
        .into_iter()
        .map(|(path, decls)| {
            let is_test = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(TEST_FILE_SUFFIX))
                || decls.package.ends_with(TEST_PACKAGE_SUFFIX);
            (is_test, decls)
        })
        .collect();

    let name = files
        .iter()
        .map(|(_, f)| f.package.as_str())
        .find(|p| !p.ends_with(TEST_PACKAGE_SUFFIX))
        .or_else(|| files.first().map(|(_, f)| f.package.as_str()))
        .unwrap_or_default()
        .to_string();

    let mut doc = PackageDoc::new(import_path, name);
    doc.doc = files
        .iter()
        .filter(|(is_test, f)| !is_test && !f.doc.trim().is_empty())
        .map(|(_, f)| f.doc.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut imports = Vec::new();
    for (_, file) in &files {
        imports.extend(file.imports.iter().cloned());
    }

    let sources: Vec<&FileDecls> = files
        .iter()
        .filter(|(is_test, _)| !is_test)
        .map(|(_, f)| f)
        .collect();

    // Types first so values and functions can find their owner.
    for file in &sources {
        for t in file.types.iter().filter(|t| is_exported(&t.name)) {
            doc.types
                .push(TypeDoc::new(&t.name, &t.decl).with_doc(t.doc.clone()));
        }
    }
    doc.types.sort_by(|a, b| a.name.cmp(&b.name));
    let type_index: HashMap<String, usize> = doc
        .types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.clone(), i))
        .collect();

    for file in &sources {
        for value in &file.consts {
            if let Some((owner, group)) = value_group(value, &type_index) {
                match owner {
                    Some(ti) => doc.types[ti].consts.push(group),
                    None => doc.consts.push(group),
                }
            }
        }
        for value in &file.vars {
            if let Some((owner, group)) = value_group(value, &type_index) {
                match owner {
                    Some(ti) => doc.types[ti].vars.push(group),
                    None => doc.vars.push(group),
                }
            }
        }
        for func in file.funcs.iter().filter(|f| is_exported(&f.name)) {
            attach_func(&mut doc, func, &type_index);
        }
    }

    doc.funcs.sort_by(|a, b| a.name.cmp(&b.name));
    for t in &mut doc.types {
        t.funcs.sort_by(|a, b| a.name.cmp(&b.name));
        t.methods.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let examples = files.iter().flat_map(|(_, f)| f.examples.iter());
    let targets = example_targets(&doc);
    for ex in examples {
        let Some((id, suffix)) = classify_example(&ex.name, |id| targets.contains_key(id)) else {
            tracing::debug!(example = %ex.name, "dropping unmatched example");
            continue;
        };
        let example = Example {
            name: ex.name[EXAMPLE_PREFIX.len()..].to_string(),
            suffix,
            code: ex.code.clone(),
            play: ex.play.clone(),
        };
        match targets[&id] {
            ExampleTarget::Package => doc.examples.push(example),
            ExampleTarget::Func(fi) => doc.funcs[fi].examples.push(example),
            ExampleTarget::TypeFunc(ti, fi) => doc.types[ti].funcs[fi].examples.push(example),
            ExampleTarget::Type(ti) => doc.types[ti].examples.push(example),
            ExampleTarget::Method(ti, mi) => doc.types[ti].methods[mi].examples.push(example),
        }
    }

    ParsedPackage { doc, imports }
}

/// Exported part of a value declaration and the type it belongs to, if any.
fn value_group(
    value: &ValueDecl,
    type_index: &HashMap<String, usize>,
) -> Option<(Option<usize>, ValueGroup)> {
    let names: Vec<&String> = value.names.iter().filter(|n| is_exported(n)).collect();
    if names.is_empty() {
        return None;
    }
    let owner = value
        .type_name
        .as_deref()
        .and_then(|t| type_index.get(base_type_name(t)?).copied());
    let group = ValueGroup::new(names, &value.decl).with_doc(value.doc.clone());
    Some((owner, group))
}

fn attach_func(doc: &mut PackageDoc, func: &FuncDecl, type_index: &HashMap<String, usize>) {
    let mut item = FuncDoc::new(&func.name, &func.decl).with_doc(func.doc.clone());

    if let Some(recv) = &func.recv {
        let owner = base_type_name(recv).and_then(|t| type_index.get(t));
        match owner {
            Some(&ti) => {
                item.recv = Some(recv.clone());
                doc.types[ti].methods.push(item);
            }
            None => {
                tracing::debug!(method = %func.name, recv = %recv, "dropping method of undocumented type");
            }
        }
        return;
    }

    let result_types: BTreeSet<usize> = func
        .results
        .iter()
        .filter_map(|r| base_type_name(r))
        .filter_map(|t| type_index.get(t).copied())
        .collect();
    if result_types.len() == 1 {
        if let Some(&ti) = result_types.iter().next() {
            doc.types[ti].funcs.push(item);
            return;
        }
    }
    doc.funcs.push(item);
}

/// Local type name behind a type expression: `*List[T]` → `List`.
///
/// Returns `None` for qualified (imported) types and composite expressions.
fn base_type_name(expr: &str) -> Option<&str> {
    let expr = expr.trim().trim_start_matches('*').trim_start();
    let name = expr.split('[').next().unwrap_or(expr).trim();
    if name.is_empty()
        || name.contains('.')
        || !name.chars().all(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }
    Some(name)
}

fn example_targets(doc: &PackageDoc) -> HashMap<String, ExampleTarget> {
    let mut targets = HashMap::new();
    targets.insert(String::new(), ExampleTarget::Package);
    for (fi, f) in doc.funcs.iter().enumerate() {
        targets.insert(f.name.clone(), ExampleTarget::Func(fi));
    }
    for (ti, t) in doc.types.iter().enumerate() {
        targets.insert(t.name.clone(), ExampleTarget::Type(ti));
        for (fi, f) in t.funcs.iter().enumerate() {
            targets.insert(f.name.clone(), ExampleTarget::TypeFunc(ti, fi));
        }
        for (mi, m) in t.methods.iter().enumerate() {
            targets.insert(format!("{}_{}", t.name, m.name), ExampleTarget::Method(ti, mi));
        }
    }
    targets
}

/// Split an example function name into the identifier it documents and its
/// suffix.
///
/// `ExampleClient_Do_retry` yields `("Client_Do", "retry")` when `Client_Do`
/// is known. Candidates are tried from the longest identifier down; a suffix
/// must start with a lower-case letter.
pub fn classify_example(full_name: &str, is_known: impl Fn(&str) -> bool) -> Option<(String, String)> {
    let name = full_name.strip_prefix(EXAMPLE_PREFIX)?;

    let mut end = Some(name.len());
    while let Some(i) = end {
        if let Some((prefix, suffix)) = split_example_name(name, i) {
            if is_known(prefix) {
                return Some((prefix.to_string(), suffix.to_string()));
            }
        }
        end = name[..i].rfind('_');
    }
    None
}

fn split_example_name(name: &str, i: usize) -> Option<(&str, &str)> {
    if i == name.len() {
        return Some((name, ""));
    }
    let (prefix, suffix) = (&name[..i], &name[i + 1..]);
    let first = suffix.chars().next()?;
    if first.is_uppercase() {
        return None;
    }
    Some((prefix, suffix))
}
