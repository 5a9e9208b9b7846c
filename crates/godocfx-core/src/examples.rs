//! Example code for output.

use godocfx_pkg::Example;

use crate::model::CodeExample;

/// Convert examples to code blocks.
///
/// The runnable program is preferred over the bare body. A body wrapped in
/// `{` and `}` lines loses the braces and one level of indentation.
pub fn process_examples(examples: &[Example]) -> Vec<CodeExample> {
    examples
        .iter()
        .map(|ex| CodeExample {
            content: strip_braces(ex.play.as_deref().unwrap_or(&ex.code)),
            name: ex.suffix.clone(),
        })
        .collect()
}

fn strip_braces(code: &str) -> String {
    if !(code.starts_with("{\n") && code.ends_with("\n}")) {
        return code.to_string();
    }
    let lines: Vec<&str> = code.split('\n').collect();
    let mut out = String::with_capacity(code.len());
    for line in &lines[1..lines.len() - 1] {
        out.push_str(line.strip_prefix('\t').unwrap_or(line));
        out.push('\n');
    }
    out
}
