//! Comment → `/** ... */` block.

use crate::markup;
use crate::model::Comment;
use regex::Regex;
use std::sync::LazyLock;

// Block-level tags start a new comment line; their closing tags end one.
static RE_BLOCK_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(<(?:p|pre|ul|ol|li|dl|dt|dd|table|tr|blockquote|h[1-6]|div)\b)").unwrap()
});

static RE_BLOCK_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(</(?:p|pre|ul|ol|dl|table|blockquote|h[1-6]|div)>)").unwrap()
});

/// Block tags that only ever come from the source, never from a page.
const SOURCE_ONLY_HEAD: &[&str] = &["@author", "@version"];
const SOURCE_ONLY_TAIL: &[&str] = &["@serialData", "@serialField", "@serial"];

/// Renders comments as Javadoc blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavadocRenderer {
    /// Rewrite `<code>` runs into `{@code}` tags.
    pub code_tags: bool,
}

impl JavadocRenderer {
    /// Render `comment` to replace the source comment `original`.
    ///
    /// `indent` is the whitespace in front of the original `/**`; the returned
    /// text starts at the `/**` itself. Source-only tags (`@author`,
    /// `@version`, `@serial*`) in `original` are carried over.
    pub fn render(&self, comment: &Comment, original: &str, indent: &str) -> String {
        let kept = source_only_tags(original);
        let mut lines: Vec<String> = Vec::new();

        if let Some(body) = comment.body.as_deref().filter(|b| !b.is_empty()) {
            lines.extend(body_lines(&self.text(body)));
        }

        let mut tags: Vec<String> = Vec::new();
        tags.extend(kept.head);
        for p in &comment.params {
            tags.push(tag_line("@param", &[&p.name, &self.text(&p.description)]));
        }
        for r in &comment.returns {
            tags.push(tag_line("@return", &[&self.text(r)]));
        }
        for t in &comment.throws {
            tags.push(tag_line("@throws", &[&t.reference, &self.text(&t.description)]));
        }
        for s in &comment.see {
            tags.push(tag_line("@see", &[s]));
        }
        for s in &comment.since {
            tags.push(tag_line("@since", &[s]));
        }
        tags.extend(kept.tail);
        if let Some(d) = &comment.deprecated {
            tags.push(tag_line("@deprecated", &[&self.text(d)]));
        }

        if !lines.is_empty() && !tags.is_empty() {
            lines.push(String::new());
        }
        for tag in tags {
            let mut parts = tag.split('\n');
            if let Some(first) = parts.next() {
                lines.push(first.trim_end().replace("*/", "*&#47;"));
            }
            lines.extend(parts.map(|l| escape_line(l.trim_end())));
        }

        let mut out = String::from("/**\n");
        for line in &lines {
            out.push_str(indent);
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(indent);
        out.push_str(" */");
        out
    }

    fn text(&self, html: &str) -> String {
        if self.code_tags {
            markup::format_code(html)
        } else {
            html.to_string()
        }
    }
}

fn tag_line(tag: &str, parts: &[&str]) -> String {
    let mut line = tag.to_string();
    for part in parts.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        line.push(' ');
        line.push_str(part);
    }
    line
}

/// Split body HTML into comment lines at block-level tags. Line breaks inside
/// `<pre>` are kept as-is.
fn body_lines(body: &str) -> Vec<String> {
    let text = RE_BLOCK_OPEN.replace_all(body, "\n$1");
    let text = RE_BLOCK_CLOSE.replace_all(&text, "$1\n");

    let mut lines = Vec::new();
    let mut in_pre = false;
    for raw in text.split('\n') {
        let line = if in_pre { raw.trim_end() } else { raw.trim() };
        if line.contains("<pre") {
            in_pre = true;
        }
        if line.contains("</pre>") {
            in_pre = false;
        }
        if line.is_empty() && !in_pre {
            continue;
        }
        lines.push(escape_line(line));
    }
    lines
}

/// Keep a line from closing the comment or starting a block tag.
fn escape_line(line: &str) -> String {
    let line = line.replace("*/", "*&#47;");
    if line.trim_start().starts_with('@') {
        line.replacen('@', "&#64;", 1)
    } else {
        line
    }
}

#[derive(Default)]
struct SourceOnlyTags {
    head: Vec<String>,
    tail: Vec<String>,
}

/// Collect `@author`/`@version`/`@serial*` blocks (with their continuation
/// lines) from an existing comment.
fn source_only_tags(original: &str) -> SourceOnlyTags {
    let mut tags = SourceOnlyTags::default();
    let mut current: Option<(bool, String)> = None;

    for line in comment_lines(original) {
        if line.starts_with('@') {
            if let Some((head, text)) = current.take() {
                push_tag(&mut tags, head, text);
            }
            let tag = line.split_whitespace().next().unwrap_or("");
            if SOURCE_ONLY_HEAD.contains(&tag) {
                current = Some((true, line.to_string()));
            } else if SOURCE_ONLY_TAIL.contains(&tag) {
                current = Some((false, line.to_string()));
            }
        } else if let Some((_, text)) = current.as_mut() {
            if !line.is_empty() {
                text.push('\n');
                text.push_str(line);
            }
        }
    }
    if let Some((head, text)) = current {
        push_tag(&mut tags, head, text);
    }
    tags
}

fn push_tag(tags: &mut SourceOnlyTags, head: bool, text: String) {
    if head {
        tags.head.push(text);
    } else {
        tags.tail.push(text);
    }
}

/// Content lines of a `/** ... */` block without the leading `*`.
fn comment_lines(original: &str) -> Vec<&str> {
    let inner = original.trim();
    let inner = inner.strip_prefix("/**").unwrap_or(inner);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    inner
        .lines()
        .map(|l| {
            let l = l.trim_start();
            let l = l.strip_prefix('*').unwrap_or(l);
            l.trim()
        })
        .collect()
}
