//! UIDs and anchors.
//!
//! Every documented declaration gets a UID derived from its import path and
//! names. The anchor is the UID with every non-word character replaced by
//! `_`, the form the site templates use for fragment ids.

use std::collections::HashMap;

use godocfx_pkg::{PackageDoc, ValueGroup};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^0-9A-Za-z_]").expect("non-word pattern is valid"));

/// Replace every non-word character with `_`.
pub fn sanitize(s: &str) -> String {
    NON_WORD.replace_all(s, "_").into_owned()
}

/// Comma-joined id of a declaration group: `A,B`.
pub fn group_id(names: &[String]) -> String {
    names.join(",")
}

/// UID of a declaration group: `importPath.A,B`.
pub fn group_uid(import_path: &str, names: &[String]) -> String {
    format!("{}.{}", import_path, group_id(names))
}

/// UID of a named member beneath `parent`: `parent.Name`.
pub fn member_uid(parent: &str, name: &str) -> String {
    format!("{parent}.{name}")
}

/// Map from identifier to anchor for one package.
///
/// Every name of a const/var group maps to the group's anchor; methods and
/// type-associated functions map to `Type.Name` anchors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorIndex {
    anchors: HashMap<String, String>,
}

impl AnchorIndex {
    /// Index the declarations of `pkg`.
    pub fn build(pkg: &PackageDoc) -> Self {
        let path = pkg.import_path.as_str();
        let mut uids: HashMap<String, String> = HashMap::new();
        uids.insert(path.to_string(), path.to_string());

        let add_groups = |uids: &mut HashMap<String, String>, groups: &[ValueGroup]| {
            for group in groups {
                let uid = group_uid(path, &group.names);
                for name in &group.names {
                    uids.insert(name.clone(), uid.clone());
                }
            }
        };

        add_groups(&mut uids, &pkg.consts);
        add_groups(&mut uids, &pkg.vars);
        for f in &pkg.funcs {
            uids.insert(f.name.clone(), member_uid(path, &f.name));
        }
        for t in &pkg.types {
            // Members inserted after the type win over a same-named type.
            let type_uid = member_uid(path, &t.name);
            uids.insert(t.name.clone(), type_uid.clone());
            add_groups(&mut uids, &t.consts);
            add_groups(&mut uids, &t.vars);
            for f in t.funcs.iter().chain(&t.methods) {
                uids.insert(f.name.clone(), member_uid(&type_uid, &f.name));
            }
        }

        let anchors = uids
            .into_iter()
            .map(|(id, uid)| (id, sanitize(&uid)))
            .collect();
        Self { anchors }
    }

    /// Index holding only the package's own root anchor.
    pub fn root_only(import_path: &str) -> Self {
        let mut anchors = HashMap::new();
        anchors.insert(import_path.to_string(), sanitize(import_path));
        Self { anchors }
    }

    /// Anchor for `id`, if the package declares it.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.anchors.get(id).map(String::as_str)
    }

    /// Number of indexed identifiers.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use godocfx_pkg::{FuncDoc, TypeDoc};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn sample() -> PackageDoc {
        let mut pkg = PackageDoc::new("example.com/m/sub", "sub");
        pkg.consts
            .push(ValueGroup::new(["A", "B"], "const A, B = 1, 2").with_doc("ints"));
        pkg.vars.push(ValueGroup::new(["ErrClosed"], "var ErrClosed = errors.New(\"closed\")"));
        pkg.funcs.push(FuncDoc::new("F", "func F()"));

        let mut client = TypeDoc::new("Client", "type Client struct{}");
        client
            .consts
            .push(ValueGroup::new(["ModeA", "ModeB"], "const (\n\tModeA Mode = iota\n\tModeB\n)"));
        client.funcs.push(FuncDoc::new("NewClient", "func NewClient() *Client"));
        client
            .methods
            .push(FuncDoc::new("Close", "func (c *Client) Close() error").with_recv("*Client"));
        pkg.types.push(client);
        pkg
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("example.com/m/sub.A,B"), "example_com_m_sub_A_B");
        assert_eq!(sanitize("plain_Name9"), "plain_Name9");
        assert_eq!(sanitize("a-b é"), "a_b__");
    }

    #[test]
    fn test_group_uid() {
        assert_eq!(
            group_uid("example.com/m/sub", &names(&["A", "B"])),
            "example.com/m/sub.A,B"
        );
        assert_eq!(group_uid("p", &names(&["X"])), "p.X");
    }

    #[test]
    fn test_every_group_name_resolves_to_group_anchor() {
        let index = AnchorIndex::build(&sample());
        let expected = sanitize("example.com/m/sub.A,B");
        assert_eq!(index.get("A"), Some(expected.as_str()));
        assert_eq!(index.get("B"), Some(expected.as_str()));
        assert_eq!(index.get("ModeB"), Some("example_com_m_sub_ModeA_ModeB"));
    }

    #[test]
    fn test_members_use_type_prefix() {
        let index = AnchorIndex::build(&sample());
        assert_eq!(index.get("Client"), Some("example_com_m_sub_Client"));
        assert_eq!(index.get("Close"), Some("example_com_m_sub_Client_Close"));
        assert_eq!(index.get("NewClient"), Some("example_com_m_sub_Client_NewClient"));
        assert_eq!(index.get("F"), Some("example_com_m_sub_F"));
        assert_eq!(index.get("ErrClosed"), Some("example_com_m_sub_ErrClosed"));
    }

    #[test]
    fn test_package_root_anchor() {
        let index = AnchorIndex::build(&sample());
        assert_eq!(index.get("example.com/m/sub"), Some("example_com_m_sub"));
        assert_eq!(index.get("Missing"), None);

        let root = AnchorIndex::root_only("cloud.google.com/go/storage");
        assert_eq!(root.len(), 1);
        assert_eq!(
            root.get("cloud.google.com/go/storage"),
            Some("cloud_google_com_go_storage")
        );
    }

    #[test]
    fn test_member_named_like_its_type_wins() {
        let mut pkg = PackageDoc::new("example.com/m", "m");
        let mut ty = TypeDoc::new("Status", "type Status struct{}");
        ty.methods
            .push(FuncDoc::new("Status", "func (s *Status) Status() string").with_recv("*Status"));
        pkg.types.push(ty);

        let index = AnchorIndex::build(&pkg);
        assert_eq!(index.get("Status"), Some("example_com_m_Status_Status"));
    }
}
