use mergedoc::{ApiDocument, ClassKind, ListingCache, MergeOptions, Merger, Signature};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read(name: &str) -> String {
    fs::read_to_string(fixtures().join(name)).unwrap()
}

#[test]
fn merges_class_and_nested_pages() {
    let mut merger = Merger::new(fixtures().join("docs"));
    let merged = merger.merge(&read("Widget.java")).unwrap();

    assert_eq!(merged, read("Widget.expected.java"));
    assert_eq!(merger.merged_class_name(), Some("com.example.Widget"));
    assert_eq!(merger.class_kind(), Some(ClassKind::Class));
}

#[test]
fn merge_reaches_a_fixed_point() {
    let mut merger = Merger::new(fixtures().join("docs"));
    let once = merger.merge(&read("Widget.java")).unwrap();
    let twice = merger.merge(&once).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn undocumented_class_is_returned_verbatim() {
    let source = read("Gadget.java");
    let mut merger = Merger::new(fixtures().join("docs"));
    assert_eq!(merger.merge(&source).unwrap(), source);
    assert_eq!(merger.merged_class_name(), Some("com.example.Gadget"));
}

#[test]
fn class_name_is_cleared_between_merges() {
    let mut merger = Merger::new(fixtures().join("docs"));
    merger.merge(&read("Widget.java")).unwrap();
    merger.merge("class NoPackage {}").unwrap();
    assert_eq!(merger.merged_class_name(), None);
}

#[test]
fn code_tags_option() {
    let mut merger =
        Merger::new(fixtures().join("docs")).with_options(MergeOptions { code_tags: true });
    let merged = merger.merge(&read("Widget.java")).unwrap();
    assert!(merged.contains("     * @param unit unit name, such as {@code \"px\"}\n"));
}

#[test]
fn mergers_share_a_listing_cache() {
    let listing = Arc::new(ListingCache::new());
    let mut first = Merger::new(fixtures().join("docs")).with_listing(Arc::clone(&listing));
    let mut second = Merger::new(fixtures().join("docs")).with_listing(Arc::clone(&listing));

    let a = first.merge(&read("Widget.java")).unwrap();
    assert_eq!(listing.len(), 1);
    let b = second.merge(&read("Widget.java")).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(a, b);
}

#[test]
fn api_document_from_fixture_pages() {
    let docs = fixtures().join("docs");
    let doc = ApiDocument::load(&docs, "com.example.Widget", &ListingCache::new());
    assert_eq!(doc.len(), 7);

    let resize = doc
        .get(&Signature::new("com.example.Widget", "int resize(int w, String u)"))
        .unwrap();
    assert_eq!(resize.returns, vec!["the previous width"]);
    assert_eq!(resize.throws[0].reference, "java.io.IOException");

    let paint = doc.get(&Signature::new("com.example.Widget", "void paint()")).unwrap();
    assert_eq!(paint.deprecated.as_deref(), Some("use {@link #resize(int,String)}"));

    let constant = doc.get(&Signature::new("com.example.Widget", "int MAX_SIZE")).unwrap();
    assert!(constant.see.is_empty());

    let builder = doc
        .get(&Signature::new("com.example.Widget.Builder", "class Builder"))
        .unwrap();
    assert_eq!(
        builder.body.as_deref(),
        Some("Step-by-step construction of a {@link com.example.Widget}.")
    );
}

/// Minimal Javadoc 8 page: `description` is the class block, `details` the
/// member blocks.
fn javadoc_page(description: &str, details: &str) -> String {
    format!(
        r#"<html><body>
<div class="contentContainer">
<div class="description"><ul class="blockList"><li class="blockList">
{description}
</li></ul></div>
<div class="details"><ul class="blockList"><li class="blockList">
<ul class="blockList"><li class="blockList">
<h3>Detail</h3>
{details}
</li></ul>
</li></ul></div>
</div>
</body></html>"#
    )
}

fn member_block(name: &str, pre: &str, body: &str) -> String {
    format!(
        r#"<ul class="blockList">
<li class="blockList">
<h4>{name}</h4>
<pre>{pre}</pre>
<div class="block">{body}</div>
</li>
</ul>"#
    )
}

fn docs_with_page(class_path: &str, html: &str) -> tempfile::TempDir {
    let docs = tempfile::tempdir().unwrap();
    let page = docs.path().join(class_path);
    fs::create_dir_all(page.parent().unwrap()).unwrap();
    fs::write(page, html).unwrap();
    docs
}

#[test]
fn merges_annotation_type_elements() {
    let html = javadoc_page(
        r#"<pre>@Documented
public @interface <span class="memberNameLabel">Marker</span></pre>
<div class="block">Marks things.</div>"#,
        &[
            member_block(
                "value",
                "public abstract&nbsp;java.lang.String&nbsp;value",
                "The element value.",
            ),
            r#"<ul class="blockList">
<li class="blockList">
<h4>count</h4>
<pre>public abstract&nbsp;int&nbsp;count</pre>
<div class="block">How many.</div>
<dl>
<dt>Default:</dt>
<dd>1</dd>
</dl>
</li>
</ul>"#
                .to_string(),
        ]
        .concat(),
    );
    let docs = docs_with_page("a/b/Marker.html", &html);

    let source = r#"package a.b;

/** Old. */
public @interface Marker {
    /** Old value. */
    String value() default "";

    /** Old count. */
    int count() default 1;
}
"#;
    let mut merger = Merger::new(docs.path());
    let merged = merger.merge(source).unwrap();

    assert_eq!(
        merged,
        r#"package a.b;

/**
 * Marks things.
 */
public @interface Marker {
    /**
     * The element value.
     */
    String value() default "";

    /**
     * How many.
     */
    int count() default 1;
}
"#
    );
    assert_eq!(merger.class_kind(), Some(ClassKind::Annotation));
}

#[test]
fn overloads_differing_by_package_keep_their_comments() {
    let html = javadoc_page(
        "<pre>public class Dates</pre>",
        &[
            member_block("set", "public&nbsp;void&nbsp;set(java.util.Date&nbsp;d)", "Util date."),
            member_block("set", "public&nbsp;void&nbsp;set(java.sql.Date&nbsp;d)", "SQL date."),
            member_block("set", "public&nbsp;void&nbsp;set(int&nbsp;v)", "Int."),
        ]
        .concat(),
    );
    let docs = docs_with_page("a/b/Dates.html", &html);

    let source = r#"package a.b;

public class Dates {
    /** Old util. */
    public void set(java.util.Date d) {}

    /** Old sql. */
    public void set(java.sql.Date d) {}

    /** Old int. */
    public void set(int v) {}
}
"#;
    let merged = Merger::new(docs.path()).merge(source).unwrap();

    assert!(merged.contains("    /** Old util. */\n    public void set(java.util.Date d) {}"));
    assert!(merged.contains("    /** Old sql. */\n    public void set(java.sql.Date d) {}"));
    assert!(merged.contains("    /**\n     * Int.\n     */\n    public void set(int v) {}"));
    assert!(!merged.contains("SQL date."));
    assert!(!merged.contains("Util date."));
}
