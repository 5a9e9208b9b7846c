//! Declaration signatures with linked identifiers.
//!
//! The declaration text is scanned as Go tokens. Identifiers in reference
//! position go through the linker; everything else is escaped and copied.
//! An identifier counts as a binding (parameter, field or method name) when
//! it is directly followed by `(`, when it is followed on the same line by
//! another type expression, or when it opens a comma-separated name list
//! that ends in one. Inside braces, an identifier followed by `:` is a
//! composite literal key and is never linked.

use crate::render::escape_html;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Format `decl`, passing referenced identifiers through `linkify`.
///
/// `own` names the identifiers the declaration introduces; they are never
/// linked.
pub fn format_signature<F>(decl: &str, own: &[String], linkify: F) -> String
where
    F: Fn(&str) -> String,
{
    let chars: Vec<char> = decl.chars().collect();
    let mut out = String::with_capacity(decl.len() * 2);
    let mut open: Vec<char> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        let literal_end = match (c, next) {
            ('/', Some('/')) => Some(scan_until(&chars, i + 2, &['\n'], false)),
            ('/', Some('*')) => Some(scan_block_comment(&chars, i + 2)),
            ('"', _) => Some(scan_until(&chars, i + 1, &['"', '\n'], true)),
            ('\'', _) => Some(scan_until(&chars, i + 1, &['\'', '\n'], true)),
            ('`', _) => Some(scan_until(&chars, i + 1, &['`'], false)),
            _ if c.is_ascii_digit() => Some(scan_number(&chars, i)),
            _ => None,
        };
        if let Some(end) = literal_end {
            let text: String = chars[i..end].iter().collect();
            out.push_str(&escape_html(&text));
            i = end;
            continue;
        }

        if !is_ident_start(c) {
            match c {
                '(' | '[' | '{' => open.push(c),
                ')' | ']' | '}' => {
                    open.pop();
                }
                _ => {}
            }
            out.push_str(&escape_html(&c.to_string()));
            i += 1;
            continue;
        }

        let start = i;
        i = scan_ident(&chars, i);
        while chars.get(i) == Some(&'.') && chars.get(i + 1).copied().is_some_and(is_ident_start) {
            i = scan_ident(&chars, i + 1);
        }
        let token: String = chars[start..i].iter().collect();

        let qualified = token.contains('.');
        if !qualified && (KEYWORDS.contains(&token.as_str()) || own.contains(&token)) {
            out.push_str(&token);
        } else if !qualified && (is_binding(&chars, i) || is_name_list(&chars, i)) {
            out.push_str(&token);
        } else if !qualified && open.last() == Some(&'{') && is_key(&chars, i) {
            out.push_str(&token);
        } else {
            out.push_str(&linkify(&token));
        }
    }

    out
}

fn scan_ident(chars: &[char], mut i: usize) -> usize {
    while chars.get(i).copied().is_some_and(is_ident_char) {
        i += 1;
    }
    i
}

fn scan_number(chars: &[char], start: usize) -> usize {
    let hex = matches!(chars.get(start + 1), Some('x') | Some('X'));
    let mut i = start;
    while let Some(&c) = chars.get(i) {
        let exponent_sign = (c == '+' || c == '-')
            && i > start
            && match chars[i - 1] {
                'e' | 'E' => !hex,
                'p' | 'P' => true,
                _ => false,
            };
        if c.is_alphanumeric() || c == '_' || c == '.' || exponent_sign {
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Index just past the first terminator at or after `i`.
fn scan_until(chars: &[char], mut i: usize, terminators: &[char], escapes: bool) -> usize {
    while let Some(&c) = chars.get(i) {
        if escapes && c == '\\' {
            i += 2;
            continue;
        }
        i += 1;
        if terminators.contains(&c) {
            // A line comment leaves its newline to the surrounding text.
            if c == '\n' && !escapes {
                return i - 1;
            }
            break;
        }
    }
    i.min(chars.len())
}

fn scan_block_comment(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() {
        if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

/// Whether the identifier ending at `end` introduces a name.
fn is_binding(chars: &[char], end: usize) -> bool {
    if chars.get(end) == Some(&'(') {
        return true;
    }
    let j = skip_blanks(chars, end);
    if j == end {
        return false;
    }
    match chars.get(j) {
        Some(&c) => is_ident_start(c) || matches!(c, '*' | '[' | '.' | '(' | '<'),
        None => false,
    }
}

fn skip_blanks(chars: &[char], mut i: usize) -> usize {
    while matches!(chars.get(i), Some(' ') | Some('\t')) {
        i += 1;
    }
    i
}

/// Whether the identifier ending at `end` starts a list like `X, Y int`.
fn is_name_list(chars: &[char], end: usize) -> bool {
    let mut i = skip_blanks(chars, end);
    while chars.get(i) == Some(&',') {
        i = skip_blanks(chars, i + 1);
        if !chars.get(i).copied().is_some_and(is_ident_start) {
            return false;
        }
        i = scan_ident(chars, i);
        if is_binding(chars, i) {
            return true;
        }
        i = skip_blanks(chars, i);
    }
    false
}

/// Whether the identifier ending at `end` is followed by a key colon.
fn is_key(chars: &[char], end: usize) -> bool {
    let i = skip_blanks(chars, end);
    chars.get(i) == Some(&':') && chars.get(i + 1) != Some(&'=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(s: &str) -> String {
        format!("{{{s}}}")
    }

    fn fmt(decl: &str, own: &[&str]) -> String {
        let own: Vec<String> = own.iter().map(|s| (*s).to_string()).collect();
        format_signature(decl, &own, mark)
    }

    #[test]
    fn test_function_signature() {
        assert_eq!(
            fmt(
                "func F(ctx context.Context, opts ...Option) (*Client, error)",
                &["F"]
            ),
            "func F(ctx {context.Context}, opts ...{Option}) (*{Client}, {error})"
        );
    }

    #[test]
    fn test_method_signature() {
        assert_eq!(
            fmt("func (c *Client) Close() error", &["Close"]),
            "func (c *{Client}) Close() {error}"
        );
    }

    #[test]
    fn test_const_group() {
        assert_eq!(
            fmt("const (\n\tA Mode = iota\n\tB\n)", &["A", "B"]),
            "const (\n\tA {Mode} = {iota}\n\tB\n)"
        );
    }

    #[test]
    fn test_literals_and_comments_are_escaped() {
        assert_eq!(
            fmt(
                "var X = errors.New(\"a < b\") // note <x>",
                &["X"]
            ),
            "var X = {errors.New}(&quot;a &lt; b&quot;) // note &lt;x&gt;"
        );
        assert_eq!(
            fmt("const Max = 1e+9 /* Big */", &["Max"]),
            "const Max = 1e+9 /* Big */"
        );
        assert_eq!(fmt("const R = 'x'", &["R"]), "const R = 'x'");
    }

    #[test]
    fn test_struct_fields() {
        assert_eq!(
            fmt(
                "type T struct {\n\tName string `json:\"name\"`\n\tio.Reader\n\tBase\n}",
                &["T"]
            ),
            "type T struct {\n\tName {string} `json:&quot;name&quot;`\n\t{io.Reader}\n\t{Base}\n}"
        );
    }

    #[test]
    fn test_interface_methods_and_channels() {
        assert_eq!(
            fmt(
                "type R interface {\n\tRead(p []byte) (n int, err error)\n\tC() <-chan Event\n}",
                &["R"]
            ),
            "type R interface {\n\tRead(p []{byte}) (n {int}, err {error})\n\tC() &lt;-chan {Event}\n}"
        );
    }

    #[test]
    fn test_generic_type() {
        assert_eq!(
            fmt("type List[T any] struct{}", &["List"]),
            "type List[T {any}] struct{}"
        );
        assert_eq!(
            fmt("func (l *List[T]) Len() int", &["Len"]),
            "func (l *{List}[{T}]) Len() {int}"
        );
    }

    #[test]
    fn test_map_type() {
        assert_eq!(
            fmt("var Index map[string]*Entry", &["Index"]),
            "var Index map[{string}]*{Entry}"
        );
    }

    #[test]
    fn test_name_lists_are_bindings() {
        assert_eq!(
            fmt("type P struct {\n\tX, Y int\n}", &["P"]),
            "type P struct {\n\tX, Y {int}\n}"
        );
        assert_eq!(
            fmt("func F(a, b, c int) (x, y T)", &["F"]),
            "func F(a, b, c {int}) (x, y {T})"
        );
        // Unnamed results are still types.
        assert_eq!(
            fmt("func G() (Result, error)", &["G"]),
            "func G() ({Result}, {error})"
        );
    }

    #[test]
    fn test_composite_literal_keys() {
        assert_eq!(
            fmt("var D = Options{Retries: 3}", &["D"]),
            "var D = {Options}{Retries: 3}"
        );
        assert_eq!(
            fmt(
                "var D = Options{Retry: RetryPolicy{Max: 3}, Mode: Fast}",
                &["D"]
            ),
            "var D = {Options}{Retry: {RetryPolicy}{Max: 3}, Mode: {Fast}}"
        );
    }
}
