//! Doc comment rendering.
//!
//! Package documentation is written as Go doc comment text. The summary of
//! a package item is that text rendered to HTML; declaration docs are passed
//! through as is.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur while rendering doc text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid doc text on line {line}: {reason}")]
    Invalid { line: usize, reason: String },
}

/// Converts doc comment text to HTML.
pub trait DocRenderer {
    /// Render `text` to an HTML fragment.
    fn render(&self, text: &str) -> Result<String, RenderError>;
}

/// Escape text for inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("url pattern is valid"));

const FENCE: &str = "```";

/// A block of doc text.
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Paragraph(Vec<String>),
    Heading(String),
    Code { lang: String, text: String },
    List { ordered: bool, items: Vec<String> },
}

/// Renderer for Go doc comment syntax.
///
/// Handles paragraphs, `# ` and legacy headings, indented and fenced code
/// blocks, bullet and numbered lists, and bare URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GodocHtml;

impl DocRenderer for GodocHtml {
    fn render(&self, text: &str) -> Result<String, RenderError> {
        let blocks = parse_blocks(text);
        let mut out = String::new();
        for block in blocks {
            match block {
                Block::Paragraph(lines) => {
                    out.push_str("<p>");
                    out.push_str(&inline(&lines.join("\n")));
                    out.push_str("</p>\n");
                }
                Block::Heading(text) => {
                    out.push_str("<h3>");
                    out.push_str(&inline(&text));
                    out.push_str("</h3>\n");
                }
                Block::Code { lang, text } => {
                    if lang.is_empty() {
                        out.push_str("<pre><code>");
                    } else {
                        out.push_str(&format!(
                            "<pre><code class=\"language-{}\">",
                            escape_html(&lang)
                        ));
                    }
                    out.push_str(&escape_html(&text));
                    out.push_str("</code></pre>\n");
                }
                Block::List { ordered, items } => {
                    let tag = if ordered { "ol" } else { "ul" };
                    out.push_str(&format!("<{tag}>\n"));
                    for item in items {
                        out.push_str("<li>");
                        out.push_str(&inline(&item));
                        out.push_str("</li>\n");
                    }
                    out.push_str(&format!("</{tag}>\n"));
                }
            }
        }
        Ok(out)
    }
}

/// Escape text and turn bare URLs into links.
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in URL.find_iter(text) {
        let url = m
            .as_str()
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | ':' | ';' | '?' | '!' | ')'));
        let end = m.start() + url.len();
        out.push_str(&escape_html(&text[last..m.start()]));
        let url = escape_html(url);
        out.push_str(&format!("<a href=\"{url}\">{url}</a>"));
        last = end;
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split a list marker off a line, returning whether the list is numbered.
fn list_marker(line: &str) -> Option<(bool, &str)> {
    let trimmed = line.trim_start();
    for bullet in ["- ", "* ", "+ ", "• "] {
        if let Some(rest) = trimmed.strip_prefix(bullet) {
            return Some((false, rest));
        }
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some((true, rest));
        }
    }
    None
}

/// Legacy godoc heading: one capitalised line with no sentence punctuation.
fn is_legacy_heading(line: &str) -> bool {
    let line = line.trim();
    let Some(first) = line.chars().next() else {
        return false;
    };
    let Some(last) = line.chars().last() else {
        return false;
    };
    first.is_uppercase()
        && last.is_alphanumeric()
        && !line.contains(|c: char| ";:!?+*/=[]{}_^°&§~%#@<\">\\".contains(c))
}

/// Remove the longest common leading whitespace of non-blank lines.
fn unindent(lines: &[&str]) -> String {
    let prefix_len = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    let mut text = String::new();
    for line in lines {
        text.push_str(line.get(prefix_len..).unwrap_or_default());
        text.push('\n');
    }
    text
}

fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_blank(line) {
            i += 1;
            continue;
        }

        let trimmed = line.trim_start();
        if let Some(info) = trimmed.strip_prefix(FENCE) {
            // An unclosed fence runs to the end of the text.
            let mut body = Vec::new();
            i += 1;
            while let Some(next) = lines.get(i) {
                i += 1;
                if next.trim_start().starts_with(FENCE) {
                    break;
                }
                body.push(*next);
            }
            blocks.push(Block::Code {
                lang: info.trim().to_string(),
                text: unindent(&body),
            });
            continue;
        }

        if let Some(heading) = trimmed.strip_prefix("# ") {
            if !is_indented(line) && lines.get(i + 1).map_or(true, |l| is_blank(l)) {
                blocks.push(Block::Heading(heading.trim().to_string()));
                i += 1;
                continue;
            }
        }

        if let Some((ordered, _)) = list_marker(line) {
            let mut items: Vec<String> = Vec::new();
            while let Some(l) = lines.get(i) {
                if is_blank(l) {
                    // A blank line ends the list unless another item follows.
                    let next_item = lines
                        .get(i + 1)
                        .is_some_and(|n| list_marker(n).is_some_and(|(o, _)| o == ordered));
                    if !next_item {
                        break;
                    }
                    i += 1;
                    continue;
                }
                match list_marker(l) {
                    Some((o, rest)) if o == ordered => items.push(rest.trim().to_string()),
                    _ if is_indented(l) && !items.is_empty() => {
                        if let Some(current) = items.last_mut() {
                            current.push('\n');
                            current.push_str(l.trim());
                        }
                    }
                    _ => break,
                }
                i += 1;
            }
            blocks.push(Block::List { ordered, items });
            continue;
        }

        if is_indented(line) {
            let start = i;
            while i < lines.len() && (is_indented(lines[i]) || is_blank(lines[i])) {
                i += 1;
            }
            let mut end = i;
            while end > start && is_blank(lines[end - 1]) {
                end -= 1;
            }
            blocks.push(Block::Code {
                lang: String::new(),
                text: unindent(&lines[start..end]),
            });
            continue;
        }

        let mut para = Vec::new();
        while let Some(l) = lines.get(i) {
            if is_blank(l)
                || is_indented(l)
                || l.starts_with(FENCE)
                || (!para.is_empty() && list_marker(l).is_some())
            {
                break;
            }
            para.push(l.to_string());
            i += 1;
        }
        blocks.push(Block::Paragraph(para));
    }

    promote_legacy_headings(&mut blocks);
    blocks
}

/// A one-line paragraph between two paragraphs reads as a heading.
fn promote_legacy_headings(blocks: &mut [Block]) {
    for idx in 1..blocks.len().saturating_sub(1) {
        let surrounded = matches!(blocks[idx - 1], Block::Paragraph(_) | Block::Heading(_))
            && matches!(blocks[idx + 1], Block::Paragraph(_));
        if !surrounded {
            continue;
        }
        let heading = match &blocks[idx] {
            Block::Paragraph(lines) if lines.len() == 1 && is_legacy_heading(&lines[0]) => {
                Some(lines[0].trim().to_string())
            }
            _ => None,
        };
        if let Some(heading) = heading {
            blocks[idx] = Block::Heading(heading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        GodocHtml.render(text).unwrap()
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(
            render("Package m does things.\nIt is small.\n\nSecond <b>."),
            "<p>Package m does things.\nIt is small.</p>\n<p>Second &lt;b&gt;.</p>\n"
        );
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_indented_code_block() {
        assert_eq!(
            render("Use it:\n\n\tc := m.New()\n\n\tc.Do(\"x\")\n\nDone."),
            "<p>Use it:</p>\n<pre><code>c := m.New()\n\nc.Do(&quot;x&quot;)\n</code></pre>\n<p>Done.</p>\n"
        );
    }

    #[test]
    fn test_fenced_code_block() {
        assert_eq!(
            render("```go\nx := 1 < 2\n```"),
            "<pre><code class=\"language-go\">x := 1 &lt; 2\n</code></pre>\n"
        );
        assert_eq!(
            render("Intro.\n\n```\nnever closed\n\nstill code"),
            "<p>Intro.</p>\n<pre><code>never closed\n\nstill code\n</code></pre>\n"
        );
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            render("# Authentication\n\nUse a key."),
            "<h3>Authentication</h3>\n<p>Use a key.</p>\n"
        );
        assert_eq!(
            render("Intro text.\n\nConcurrency\n\nClients are safe."),
            "<p>Intro text.</p>\n<h3>Concurrency</h3>\n<p>Clients are safe.</p>\n"
        );
        // A sentence is not a heading.
        assert!(render("Intro.\n\nThis ends here.\n\nMore.").contains("<p>This ends here.</p>"));
        // Nor is a leading line.
        assert!(render("Overview\n\nText.").starts_with("<p>Overview</p>"));
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render("Features:\n  - fast\n  - small\n    and simple\n\nEnd."),
            "<p>Features:</p>\n<ul>\n<li>fast</li>\n<li>small\nand simple</li>\n</ul>\n<p>End.</p>\n"
        );
        assert_eq!(
            render("1. one\n2. two"),
            "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_urls_are_linked() {
        assert_eq!(
            render("See https://cloud.google.com/storage/docs."),
            "<p>See <a href=\"https://cloud.google.com/storage/docs\">https://cloud.google.com/storage/docs</a>.</p>\n"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
