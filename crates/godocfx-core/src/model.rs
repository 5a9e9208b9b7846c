//! Output model: pages of items and the table of contents.
//!
//! These are the records the emitter serializes. Every empty field is left
//! out of the YAML.

use serde::{Deserialize, Serialize};

/// Language tag attached to every item.
pub const LANG_GO: &str = "go";

/// Kind of a documented declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Package,
    Const,
    Variable,
    Type,
    Function,
    Method,
}

impl DeclKind {
    /// Tag written to the item's `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Package => "package",
            DeclKind::Const => "const",
            DeclKind::Variable => "variable",
            DeclKind::Type => "type",
            DeclKind::Function => "function",
            DeclKind::Method => "method",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One package's reference page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Item>,
}

impl Page {
    /// The package root item, always first.
    pub fn package_item(&self) -> Option<&Item> {
        self.items.first()
    }

    /// Look up an item by UID.
    pub fn item(&self, uid: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.uid == uid)
    }
}

/// A documented declaration flattened for output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeclKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
    #[serde(default, skip_serializing_if = "Syntax::is_empty")]
    pub syntax: Syntax,
    #[serde(rename = "codeexamples", default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<CodeExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt_link: String,
}

impl Item {
    /// An item with the given UID and kind, tagged as Go.
    pub fn new(uid: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            uid: uid.into(),
            kind: Some(kind),
            langs: vec![LANG_GO.to_string()],
            ..Self::default()
        }
    }
}

/// Formatted declaration source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Syntax {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

impl Syntax {
    fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A runnable example.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// A node of the navigation tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TocItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<TocItem>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
}

impl TocItem {
    /// A node pointing at a page by UID.
    pub fn uid(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// A node pointing at a file.
    pub fn href(href: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The table of contents: a list of root nodes.
pub type Toc = Vec<TocItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let item = Item::new("example.com/m.F", DeclKind::Function);
        let yaml = serde_yaml::to_string(&item).unwrap();
        assert!(yaml.contains("uid: example.com/m.F"));
        assert!(yaml.contains("type: function"));
        assert!(!yaml.contains("syntax"));
        assert!(!yaml.contains("summary"));
        assert!(!yaml.contains("codeexamples"));
    }

    #[test]
    fn test_page_keeps_items_key() {
        let yaml = serde_yaml::to_string(&Page::default()).unwrap();
        assert!(yaml.contains("items: []"));
        assert!(!yaml.contains("references"));
    }

    #[test]
    fn test_item_field_names() {
        let mut item = Item::new("p", DeclKind::Package);
        item.examples.push(CodeExample {
            content: "fmt.Println()\n".to_string(),
            name: "basic".to_string(),
        });
        item.alt_link = "https://pkg.go.dev/p".to_string();
        item.syntax.content = "package p".to_string();

        let yaml = serde_yaml::to_string(&item).unwrap();
        assert!(yaml.contains("codeexamples:"));
        assert!(yaml.contains("alt_link: https://pkg.go.dev/p"));
        assert!(yaml.contains("langs:\n- go"));
        assert!(yaml.contains("syntax:\n  content: package p"));

        let back: Item = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_decl_kind_tags() {
        assert_eq!(DeclKind::Variable.as_str(), "variable");
        assert_eq!(DeclKind::Method.to_string(), "method");
        assert_eq!(serde_yaml::to_string(&DeclKind::Const).unwrap().trim(), "const");
    }
}
