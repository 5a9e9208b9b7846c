//! Go identifier helpers.

/// Predeclared identifiers of the Go universe block.
const PREDECLARED: &[&str] = &[
    // Types
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    // Constants
    "true",
    "false",
    "iota",
    // Zero value
    "nil",
    // Functions
    "append",
    "cap",
    "clear",
    "close",
    "complex",
    "copy",
    "delete",
    "imag",
    "len",
    "make",
    "max",
    "min",
    "new",
    "panic",
    "print",
    "println",
    "real",
    "recover",
];

/// Reports whether `name` starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Reports whether `name` is a predeclared Go identifier.
pub fn is_predeclared(name: &str) -> bool {
    PREDECLARED.contains(&name)
}

/// Reports whether `s` starts with any of `prefixes`.
pub fn has_any_prefix<S: AsRef<str>>(s: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|p| s.starts_with(p.as_ref()))
}
