//! Declaration signatures: the key that pairs a source comment slot with a
//! comment parsed from a reference page.
//!
//! Both sides go through the same two steps:
//!
//! 1. [`clean_header`]: strip markup, decode whitespace and angle-bracket
//!    entities, cut the `throws` clause, collapse whitespace.
//! 2. [`identity`]: reduce the cleaned header to what overload resolution
//!    cares about: `class Foo`, `foo(int,String[])` or a bare field name.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

// Lowercase tag names only, so generic parameters like `<T>` are never
// mistaken for markup when the header comes from source text.
static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)</?[a-z][a-z0-9]*(?:\s[^<>]*)?/?>").unwrap());

static RE_NBSP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp;|&#160;|&#xa0;|\x{a0}").unwrap());

static RE_THROWS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\sthrows\s.*").unwrap());

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\s*([\w.$]+)(?:\s*\((?:[^()]|\([^()]*\))*\))?").unwrap()
});

static RE_TYPE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(class|interface|@interface|enum)\s+([\w.$]+)").unwrap()
});

static RE_GENERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

static RE_VARARGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\.\.\.\s*").unwrap());

static RE_ARRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\[\s*\]").unwrap());

/// Identity of one declaration within one fully qualified class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    class_name: String,
    header: String,
}

impl Signature {
    /// Build a signature from a raw declaration header (HTML or source text).
    pub fn new(class_name: impl Into<String>, header: &str) -> Self {
        Signature {
            class_name: class_name.into(),
            header: identity(&clean_header(header)),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Simple name of the type this signature declares, if it is a type
    /// declaration (`class Foo` → `Foo`).
    pub fn declared_type(&self) -> Option<&str> {
        self.header.split_once(' ').map(|(_, name)| name)
    }

    /// `value()` → `value`. Any other header is returned as is.
    pub fn without_empty_params(self) -> Self {
        match self.header.strip_suffix("()") {
            Some(name) => Signature {
                header: name.to_string(),
                class_name: self.class_name,
            },
            None => self,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class_name, self.header)
    }
}

/// Textual normalization of a declaration header.
///
/// Idempotent, and a no-op for entity decoding on already-decoded text.
pub fn clean_header(header: &str) -> String {
    let s = RE_TAG.replace_all(header, " ");
    let s = RE_NBSP.replace_all(&s, " ");
    let s = s.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&");
    let s = RE_THROWS.replace(&s, "");
    RE_SPACES.replace_all(&s, " ").trim().to_string()
}

/// Reduce a cleaned header to its identity form.
pub fn identity(cleaned: &str) -> String {
    let text = RE_ANNOTATION.replace_all(cleaned, |caps: &Captures| {
        if &caps[1] == "interface" {
            caps[0].to_string()
        } else {
            " ".to_string()
        }
    });
    let text = text.trim();
    let paren = text.find('(');

    if let Some(caps) = RE_TYPE_DECL.captures(text) {
        let before_paren = paren.map_or(true, |p| caps.get(0).is_some_and(|m| m.start() < p));
        if before_paren {
            let name = strip_type_params(&caps[2]);
            return format!("{} {}", &caps[1], simple_name(&name));
        }
    }

    match paren {
        Some(open) => {
            let name = text[..open].split_whitespace().last().unwrap_or("");
            let params = balanced_params(&text[open + 1..]);
            let types: Vec<String> = erase_generics(params)
                .split(',')
                .filter_map(param_type)
                .collect();
            format!("{}({})", simple_name(name), types.join(","))
        }
        None => {
            let erased = erase_generics(text);
            erased
                .split_whitespace()
                .last()
                .unwrap_or("")
                .trim_end_matches("[]")
                .to_string()
        }
    }
}

/// First `class`/`interface`/`@interface`/`enum` keyword in `text` and the
/// name declared after it.
pub fn find_type_declaration(text: &str) -> Option<(&str, &str)> {
    let caps = RE_TYPE_DECL.captures(text)?;
    let kind = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    Some((kind, name))
}

/// Text between an opening paren (already consumed) and its matching close.
fn balanced_params(rest: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return &rest[..i],
            ')' => depth -= 1,
            _ => {}
        }
    }
    rest
}

fn erase_generics(s: &str) -> String {
    let mut out = s.to_string();
    loop {
        let next = RE_GENERIC.replace_all(&out, "").into_owned();
        if next == out {
            return out;
        }
        out = next;
    }
}

fn strip_type_params(name: &str) -> String {
    name.split('<').next().unwrap_or(name).to_string()
}

/// Type of one parameter declaration, without its name or qualifiers.
fn param_type(param: &str) -> Option<String> {
    let param = RE_VARARGS.replace_all(param, "... ");
    let param = RE_ARRAY.replace_all(&param, "[]");
    let tokens: Vec<&str> = param
        .split_whitespace()
        .filter(|t| *t != "final")
        .collect();

    let (ty, name) = match tokens.as_slice() {
        [] => return None,
        [ty] => (*ty, ""),
        [.., ty, name] => (*ty, *name),
    };

    // C-style arrays: `int values[]`
    let mut dims = String::new();
    let mut rest = name;
    while let Some(stripped) = rest.strip_suffix("[]") {
        dims.push_str("[]");
        rest = stripped;
    }

    let mut base = ty;
    let mut suffix = String::new();
    if let Some(stripped) = base.strip_suffix("...") {
        suffix.insert_str(0, "...");
        base = stripped;
    }
    while let Some(stripped) = base.strip_suffix("[]") {
        suffix.insert_str(0, "[]");
        base = stripped;
    }

    Some(format!("{}{}{}", simple_name(base), dims, suffix))
}

/// Last dot-separated segment: `java.util.Map.Entry` → `Entry`.
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(header: &str) -> Signature {
        Signature::new("a.b.C", header)
    }

    #[test]
    fn nbsp_and_space_are_equal() {
        assert_eq!(sig("void foo(int&nbsp;x)"), sig("void foo(int x)"));
    }

    #[test]
    fn throws_clause_is_ignored() {
        assert_eq!(sig("void foo() throws java.io.IOException"), sig("void foo()"));
    }

    #[test]
    fn parameter_types_distinguish_overloads() {
        assert_ne!(sig("void foo(int x)"), sig("void foo(String x)"));
    }

    #[test]
    fn class_name_is_part_of_identity() {
        assert_ne!(
            Signature::new("a.b.C", "void foo()"),
            Signature::new("a.b.C.Inner", "void foo()")
        );
    }

    #[test]
    fn clean_strips_markup_and_entities() {
        let html = "public&nbsp;<a href=\"../util/List.html\" title=\"interface in java.util\">List</a>&lt;<a href=\"String.html\">String</a>&gt;&nbsp;names()\n    throws <a href=\"X.html\">X</a>";
        assert_eq!(clean_header(html), "public List < String > names()");
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean_header("public&nbsp;void&nbsp;put(K&nbsp;key, java.util.List&lt;V&gt;&nbsp;v)");
        assert_eq!(clean_header(&once), once);
        assert_eq!(once, "public void put(K key, java.util.List<V> v)");
    }

    #[test]
    fn nested_generics_match_encoded_and_literal() {
        let encoded = "public&nbsp;void&nbsp;put(java.util.Map&lt;K,java.util.List&lt;V&gt;&gt;&nbsp;m)";
        let literal = "public void put(Map<K, List<V>> m)";
        assert_eq!(clean_header(encoded), "public void put(java.util.Map<K,java.util.List<V>> m)");
        assert_eq!(sig(encoded), sig(literal));
        assert_eq!(sig(literal).header(), "put(Map)");
    }

    #[test]
    fn source_generics_are_not_markup() {
        assert_eq!(clean_header("List<String> names()"), "List<String> names()");
    }

    #[test]
    fn method_identity_drops_names_modifiers_and_qualifiers() {
        assert_eq!(
            sig("public static <T> java.util.List<T> copy(@Nullable final java.util.Collection<? extends T> src, int[] idx, String... rest)").header(),
            "copy(Collection,int[],String...)"
        );
    }

    #[test]
    fn c_style_array_parameter() {
        assert_eq!(sig("void fill(int values[])"), sig("void fill(int[] values)"));
    }

    #[test]
    fn class_identity() {
        assert_eq!(
            sig("public class <span class=\"typeNameLabel\">Widget</span>&lt;T&gt;\nextends java.lang.Object\nimplements java.io.Serializable").header(),
            "class Widget"
        );
        assert_eq!(sig("public final class Widget<T> implements Serializable"), sig("public class Widget&lt;T&gt; extends Object"));
    }

    #[test]
    fn nested_class_uses_simple_name() {
        assert_eq!(sig("public static class Widget.Builder").header(), "class Builder");
        assert_eq!(sig("public Widget.Builder(int size)").header(), "Builder(int)");
    }

    #[test]
    fn finds_first_type_declaration() {
        assert_eq!(
            find_type_declaration("import x.Y; public final class Box<T> extends Y {"),
            Some(("class", "Box"))
        );
        assert_eq!(find_type_declaration("@interface Marker {"), Some(("@interface", "Marker")));
        assert_eq!(find_type_declaration("Foo.class.getName()"), None);
    }

    #[test]
    fn only_type_declarations_declare_a_type() {
        assert_eq!(sig("public enum Color").declared_type(), Some("Color"));
        assert_eq!(sig("void paint(int x, int y)").declared_type(), None);
        assert_eq!(sig("int count").declared_type(), None);
    }

    #[test]
    fn empty_parameter_list_can_be_dropped() {
        assert_eq!(sig("String value()").without_empty_params(), sig("public abstract java.lang.String value"));
        assert_eq!(sig("void set(int x)").without_empty_params().header(), "set(int)");
    }

    #[test]
    fn annotation_type_survives_annotation_stripping() {
        assert_eq!(sig("@Documented public @interface Marker").header(), "@interface Marker");
    }

    #[test]
    fn annotations_with_arguments_are_removed() {
        assert_eq!(
            sig("@SuppressWarnings(value = {\"a\", \"b\"}) @Deprecated public void run()").header(),
            "run()"
        );
    }

    #[test]
    fn field_identity() {
        assert_eq!(sig("public static final int MAX_SIZE").header(), "MAX_SIZE");
        assert_eq!(sig("private java.util.Map&lt;String,Integer&gt; counts"), sig("private Map<String, Integer> counts"));
    }

    #[test]
    fn identity_is_idempotent() {
        for header in ["class Widget", "copy(Collection,int[],String...)", "MAX_SIZE", "run()"] {
            assert_eq!(identity(header), header);
        }
    }
}
