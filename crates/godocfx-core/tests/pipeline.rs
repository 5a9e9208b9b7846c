//! End-to-end tests: a `go list` stream and declaration dumps on disk in,
//! DocFX YAML out.

use std::path::{Path, PathBuf};

use godocfx_core::{generate, write_docset, Config, DeclKind, GodocHtml, Page, Toc, TocItem};
use godocfx_pkg::{JsonUnitLoader, PackageSelector, SelectOptions, SidecarSource};
use tempfile::TempDir;

/// A throwaway directory holding Go files, their dumps and a unit stream.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// Write a Go file and the declaration dump describing it.
    fn go_file(&self, rel: &str, decls: &str) {
        self.write(rel, "// generated fixture\n");
        self.write(&format!("{rel}.json"), decls);
    }

    /// Write the unit stream, replacing `$ROOT` with the fixture directory.
    fn units(&self, stream: &str) -> PathBuf {
        let root = self.dir.path().to_string_lossy().into_owned();
        self.write("units.json", &stream.replace("$ROOT", &root));
        self.path("units.json")
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn read_page(path: &Path) -> Page {
    let contents = std::fs::read_to_string(path).unwrap();
    let (header, body) = contents.split_once('\n').unwrap();
    assert_eq!(header, "### YamlMime:UniversalReference");
    serde_yaml::from_str(body).unwrap()
}

fn read_toc(path: &Path) -> Toc {
    let contents = std::fs::read_to_string(path).unwrap();
    let (header, body) = contents.split_once('\n').unwrap();
    assert_eq!(header, "### YamlMime:TableOfContents");
    serde_yaml::from_str(body).unwrap()
}

const MODULE_STREAM: &str = r#"
{"ImportPath": "context", "Name": "context", "Dir": "/usr/lib/go/src/context", "GoFiles": ["context.go"], "DepOnly": true}
{
    "ImportPath": "example.com/m",
    "Name": "m",
    "Dir": "$ROOT/m",
    "Module": {"Path": "example.com/m", "Dir": "$ROOT/m"},
    "GoFiles": ["m.go"]
}
{
    "ImportPath": "example.com/m/sub",
    "Name": "sub",
    "Dir": "$ROOT/m/sub",
    "Module": {"Path": "example.com/m", "Dir": "$ROOT/m"},
    "GoFiles": ["sub.go"],
    "XTestGoFiles": ["example_test.go"],
    "Imports": ["context"]
}
{
    "ImportPath": "example.com/m/sub_test [example.com/m/sub.test]",
    "Name": "sub_test",
    "Dir": "$ROOT/m/sub",
    "Module": {"Path": "example.com/m", "Dir": "$ROOT/m"},
    "GoFiles": ["example_test.go"],
    "Imports": ["example.com/m/sub"]
}
{"ImportPath": "example.com/m/sub.test", "Name": "main", "Dir": "$ROOT/m/sub"}
{
    "ImportPath": "example.com/m/internal/wire",
    "Name": "wire",
    "Dir": "$ROOT/m/internal/wire",
    "Module": {"Path": "example.com/m", "Dir": "$ROOT/m"},
    "GoFiles": ["wire.go"]
}
"#;

fn module_fixture() -> Fixture {
    let fx = Fixture::new();
    fx.go_file(
        "m/m.go",
        r#"{"package": "m", "doc": "Package m is the root.", "funcs": [{"name": "Hello", "decl": "func Hello() string"}]}"#,
    );
    fx.go_file(
        "m/sub/sub.go",
        r#"{
            "package": "sub",
            "doc": "Package sub has things.",
            "imports": [{"path": "context"}],
            "consts": [{"names": ["A", "B"], "doc": "A and B.", "decl": "const A, B = 1, 2"}],
            "funcs": [
                {"name": "F", "doc": "F does it.", "decl": "func F(ctx context.Context) error"},
                {"name": "helper", "decl": "func helper()"}
            ]
        }"#,
    );
    fx.go_file(
        "m/sub/example_test.go",
        r#"{"package": "sub_test", "examples": [{"name": "ExampleF", "code": "{\n\tsub.F(ctx)\n}"}]}"#,
    );
    fx.write("m/README.md", "# m\n\nThe m module.\n");
    fx
}

#[test]
fn test_module_end_to_end() {
    let fx = module_fixture();
    let units = fx.units(MODULE_STREAM);

    let loader = JsonUnitLoader::new(&units);
    let source = SidecarSource;
    let selection = PackageSelector::new(&loader, &source)
        .select(&SelectOptions::new("./...", fx.path("m")))
        .unwrap();
    let paths: Vec<&str> = selection
        .packages
        .iter()
        .map(|p| p.doc.import_path.as_str())
        .collect();
    assert_eq!(paths, vec!["example.com/m", "example.com/m/sub"]);

    let mut config = Config::default();
    config.run.extra_files = vec!["README.md".to_string(), "CONTRIBUTING.md".to_string()];
    let docset = generate(&selection, &config, &source, &GodocHtml).unwrap();

    let out = fx.path("out");
    write_docset(&out, &docset).unwrap();

    let page = read_page(&out.join("example.com/m/sub.yml"));
    let uids: Vec<&str> = page.items.iter().map(|i| i.uid.as_str()).collect();
    assert_eq!(
        uids,
        vec!["example.com/m/sub", "example.com/m/sub.A,B", "example.com/m/sub.F"]
    );

    let pkg = page.package_item().unwrap();
    assert_eq!(pkg.summary, "<p>Package sub has things.</p>\n");
    assert_eq!(pkg.children, vec!["example.com/m/sub.A,B", "example.com/m/sub.F"]);

    let f = page.item("example.com/m/sub.F").unwrap();
    assert_eq!(f.kind, Some(DeclKind::Function));
    assert_eq!(f.name, "func F");
    assert_eq!(f.parent, "example.com/m/sub");
    assert_eq!(
        f.syntax.content,
        concat!(
            r#"func F(ctx <a href="https://pkg.go.dev/context">context</a>."#,
            r#"<a href="https://pkg.go.dev/context#Context">Context</a>) "#,
            r#"<a href="https://pkg.go.dev/builtin#error">error</a>"#
        )
    );
    assert_eq!(f.examples.len(), 1);
    assert_eq!(f.examples[0].content, "sub.F(ctx)\n");

    assert!(out.join("example.com/m.yml").is_file());
    assert!(!out.join("example.com/m/internal/wire.yml").exists());

    let toc = read_toc(&out.join("toc.yml"));
    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].uid, "example.com/m");
    assert_eq!(
        toc[0].items,
        vec![
            TocItem::uid("example.com/m", "example.com/m"),
            TocItem::href("pkg-readme.md", "Readme"),
            TocItem::uid("example.com/m/sub", "sub"),
        ]
    );

    assert_eq!(
        std::fs::read_to_string(out.join("pkg-readme.md")).unwrap(),
        "# m\n\nThe m module.\n"
    );
    assert!(!out.join("CONTRIBUTING.md").exists());
}

const APP_STREAM: &str = r#"
{
    "ImportPath": "cloud.example.com/go/store",
    "Name": "store",
    "Dir": "$ROOT/store",
    "Module": {"Path": "cloud.example.com/go/store", "Dir": "$ROOT/store"},
    "GoFiles": ["store.go"],
    "DepOnly": true
}
{
    "ImportPath": "cloud.example.com/go/store/bucket",
    "Name": "bucket",
    "Dir": "$ROOT/store/bucket",
    "Module": {"Path": "cloud.example.com/go/store", "Dir": "$ROOT/store"},
    "GoFiles": ["bucket.go"],
    "DepOnly": true
}
{
    "ImportPath": "example.com/app",
    "Name": "app",
    "Dir": "$ROOT/app",
    "Module": {"Path": "example.com/app", "Dir": "$ROOT/app"},
    "GoFiles": ["app.go"],
    "Imports": ["cloud.example.com/go/store", "cloud.example.com/go/store/bucket"]
}
"#;

#[test]
fn test_allow_listed_imports_link_on_same_site() {
    let fx = Fixture::new();
    fx.go_file(
        "store/store.go",
        r#"{"package": "store", "types": [{"name": "Client", "decl": "type Client struct{}"}]}"#,
    );
    fx.go_file(
        "store/bucket/bucket.go",
        r#"{"package": "bucket", "types": [{"name": "Handle", "decl": "type Handle struct{}"}]}"#,
    );
    fx.go_file(
        "app/app.go",
        r#"{
            "package": "app",
            "imports": [
                {"path": "cloud.example.com/go/store"},
                {"path": "cloud.example.com/go/store/bucket", "name": "bkt"}
            ],
            "funcs": [{"name": "Open", "decl": "func Open(c *store.Client) (*bkt.Handle, error)"}]
        }"#,
    );
    let units = fx.units(APP_STREAM);

    let loader = JsonUnitLoader::new(&units);
    let source = SidecarSource;
    let selection = PackageSelector::new(&loader, &source)
        .select(&SelectOptions::new("./...", fx.path("app")))
        .unwrap();

    let mut config = Config::default();
    config.links.same_domain = vec!["cloud.example.com/go".to_string()];
    let docset = generate(&selection, &config, &source, &GodocHtml).unwrap();

    let page = &docset.pages["example.com/app"];
    let open = page.item("example.com/app.Open").unwrap();
    assert_eq!(
        open.syntax.content,
        concat!(
            r#"func Open(c *<a href="/go/docs/reference/cloud.example.com/go/store/latest/">store</a>."#,
            r#"<a href="/go/docs/reference/cloud.example.com/go/store/latest/#cloud_example_com_go_store_Client">Client</a>) "#,
            r#"(*<a href="/go/docs/reference/cloud.example.com/go/store/latest/bucket">bkt</a>."#,
            r#"<a href="/go/docs/reference/cloud.example.com/go/store/latest/bucket#cloud_example_com_go_store_bucket_Handle">Handle</a>, "#,
            r#"<a href="https://pkg.go.dev/builtin#error">error</a>)"#
        )
    );

    // Every qualified identifier resolves on the same site.
    let hrefs: Vec<&str> = open
        .syntax
        .content
        .split("href=\"")
        .skip(1)
        .filter_map(|s| s.split('"').next())
        .filter(|h| !h.contains("/builtin"))
        .collect();
    assert_eq!(hrefs.len(), 4);
    assert!(hrefs.iter().all(|h| h.starts_with("/go/docs/reference/")));

    // A single-package module has no package nodes in its TOC.
    assert_eq!(docset.toc, vec![TocItem::uid("example.com/app", "example.com/app")]);
    assert!(docset.extra_files.is_empty());
    assert!(fx.root().join("app/app.go").is_file());
}
