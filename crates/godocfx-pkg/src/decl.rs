//! Declaration model for a documented package.
//!
//! This is what a declaration source hands back for one package: the
//! exported API grouped the way Go documentation groups it.

/// Documentation for a whole package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDoc {
    /// Import path of the package.
    pub import_path: String,
    /// Package clause name.
    pub name: String,
    /// Package-level doc comment (unrendered).
    pub doc: String,
    /// Top-level constant groups, in source order.
    pub consts: Vec<ValueGroup>,
    /// Top-level variable groups, in source order.
    pub vars: Vec<ValueGroup>,
    /// Types, sorted by name.
    pub types: Vec<TypeDoc>,
    /// Top-level functions not associated with a type, sorted by name.
    pub funcs: Vec<FuncDoc>,
    /// Package examples.
    pub examples: Vec<Example>,
}

impl PackageDoc {
    /// Create an empty package doc.
    pub fn new(import_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a type by name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDoc> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// A single `const` or `var` declaration statement.
///
/// One statement may introduce several names that share one doc comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueGroup {
    /// Co-declared names, in declaration order.
    pub names: Vec<String>,
    /// Doc comment.
    pub doc: String,
    /// Declaration source text.
    pub decl: String,
}

impl ValueGroup {
    /// Create a group from its names and source text.
    pub fn new<I, S>(names: I, decl: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            doc: String::new(),
            decl: decl.into(),
        }
    }

    /// Set the doc comment.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// A type declaration and everything grouped beneath it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeDoc {
    /// Type name.
    pub name: String,
    /// Doc comment.
    pub doc: String,
    /// Declaration source text.
    pub decl: String,
    /// Constant groups typed with this type.
    pub consts: Vec<ValueGroup>,
    /// Variable groups typed with this type.
    pub vars: Vec<ValueGroup>,
    /// Constructors and helpers returning this type.
    pub funcs: Vec<FuncDoc>,
    /// Methods declared on this type.
    pub methods: Vec<FuncDoc>,
    /// Examples attached to the type.
    pub examples: Vec<Example>,
}

impl TypeDoc {
    /// Create a type from its name and source text.
    pub fn new(name: impl Into<String>, decl: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl: decl.into(),
            ..Self::default()
        }
    }

    /// Set the doc comment.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// A function or method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuncDoc {
    /// Function name.
    pub name: String,
    /// Doc comment.
    pub doc: String,
    /// Signature source text, without the body.
    pub decl: String,
    /// Receiver type expression for methods, e.g. `*Client`.
    pub recv: Option<String>,
    /// Examples attached to the function.
    pub examples: Vec<Example>,
}

impl FuncDoc {
    /// Create a function from its name and signature text.
    pub fn new(name: impl Into<String>, decl: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl: decl.into(),
            ..Self::default()
        }
    }

    /// Set the receiver, turning this into a method.
    #[must_use]
    pub fn with_recv(mut self, recv: impl Into<String>) -> Self {
        self.recv = Some(recv.into());
        self
    }

    /// Set the doc comment.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// A runnable example function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    /// Example function name without the `Example` prefix.
    pub name: String,
    /// Descriptive suffix (`ExampleF_second` has suffix `second`).
    pub suffix: String,
    /// Example body, including the enclosing braces.
    pub code: String,
    /// Complete runnable program, when the example is suitable for one.
    pub play: Option<String>,
}
