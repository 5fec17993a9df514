//! HTML fragment → doc-comment inline tags.
//!
//! Reference pages express cross-references as `<a href>` elements pointing
//! at other pages. Those become `{@link}` / `{@linkplain}` tags whose target is
//! written the way a source comment would write it: `package.Class#member`,
//! abbreviated when it lives in the current package or class.

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::fmt::Write;
use std::sync::LazyLock;

static CODE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("code").unwrap());

/// Trailing `-int-java.lang.String-` parameter list of a Javadoc 8 anchor.
static RE_DASH_PARAMS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-(.*)-$").unwrap());

static RE_JAVA_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"java\.lang\.([A-Z])").unwrap());

static RE_BREAKABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\n]+").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Rewrite every `<a href>` in `html` into a `{@link}` or `{@linkplain}` tag.
///
/// `class_name` is the fully qualified class the fragment documents; it
/// decides which qualifiers can be dropped from link targets.
pub fn format_links(html: &str, class_name: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    write_children(fragment.root_element(), &mut out, false, &|el| {
        if el.value().name() != "a" {
            return None;
        }
        let href = el.value().attr("href")?;
        Some(link_tag(class_name, href, el))
    });
    out.trim().replace('、', ",")
}

/// Rewrite every `<code>` run in `html` into a `{@code}` tag.
///
/// Runs whose text contains a brace stay as HTML since the inline tag could
/// not be balanced.
pub fn format_code(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    write_children(fragment.root_element(), &mut out, false, &|el| {
        if el.value().name() != "code" {
            return None;
        }
        let text = text_of(el);
        if text.contains('{') || text.contains('}') {
            return None;
        }
        Some(format!("{{@code {}}}", text))
    });
    out.trim().to_string()
}

/// Convert a page-relative `href` into a `package.Class#member(params)`
/// reference as seen from `class_name`.
///
/// ```text
/// ../../java/util/List.html        → java.util.List
/// Widget.html#resize-int:A-        → #resize(int[])     (inside Widget)
/// ../../java/lang/String.html      → String
/// ```
pub fn format_reference(class_name: &str, href: &str) -> String {
    let (package, simple) = match class_name.rfind('.') {
        Some(i) => (&class_name[..i], &class_name[i + 1..]),
        None => ("", class_name),
    };

    let path = href.replace(".html", "").replace('/', ".");
    let path = RE_DASH_PARAMS.replace(&path, "($1)");
    let path = path.replace('-', ",").replace(":A", "[]");
    let path = path.trim_start_matches('.');
    let mut path = RE_JAVA_LANG.replace_all(path, "$1").into_owned();

    if !package.is_empty() {
        let same_package = Regex::new(&format!(r"\b{}\.([A-Z])", regex::escape(package)));
        if let Ok(re) = same_package {
            path = re.replace_all(&path, "$1").into_owned();
        }
    }

    if let Some(member) = path.strip_prefix(simple).filter(|rest| rest.starts_with('#')) {
        path = member.to_string();
    }
    path
}

fn link_tag(class_name: &str, href: &str, el: ElementRef<'_>) -> String {
    let reference = format_reference(class_name, href);
    let text = text_of(el);
    let label = el.select(&CODE).next().map(text_of).unwrap_or_else(|| text.clone());

    if text != label {
        let mut inner = String::new();
        write_children(el, &mut inner, false, &|_| None);
        return format!("{{@linkplain {} {}}}", reference, inner.trim());
    }

    let mut link = format!("{{@link {}", reference);
    if !label.is_empty() {
        let target = reference.replace('#', ".");
        let bare = label.replace(' ', "").replace("java.lang.", "");
        if !target.ends_with(&bare) {
            link.push(' ');
            escape_text(&label, &mut link);
        }
    }
    link.push('}');
    link
}

/// Visible text of an element with whitespace collapsed, like a browser
/// would show it.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Serialize the children of `node` back to HTML, letting `rewrite` replace
/// whole elements with text. Comments are dropped; whitespace is collapsed
/// outside `<pre>`.
fn write_children(
    parent: ElementRef<'_>,
    out: &mut String,
    in_pre: bool,
    rewrite: &dyn Fn(ElementRef<'_>) -> Option<String>,
) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => {
                if in_pre {
                    escape_text(text, out);
                } else {
                    escape_text(&RE_BREAKABLE.replace_all(text, " "), out);
                }
            }
            Node::Element(element) => {
                let Some(el) = ElementRef::wrap(child) else {
                    continue;
                };
                if let Some(replacement) = rewrite(el) {
                    out.push_str(&replacement);
                    continue;
                }
                let name = element.name();
                out.push('<');
                out.push_str(name);
                for (key, value) in element.attrs() {
                    let _ = write!(out, " {}=\"", key);
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name) {
                    continue;
                }
                write_children(el, out, in_pre || name == "pre", rewrite);
                let _ = write!(out, "</{}>", name);
            }
            _ => {}
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
