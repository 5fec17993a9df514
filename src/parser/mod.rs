//! Reference-doc parser: Javadoc 8 pages → comments keyed by signature.

pub mod entries;
pub mod listing;
pub mod page;

pub use listing::ListingCache;

use crate::model::Comment;
use crate::signature::Signature;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// All comments documented for one class and its nested classes.
#[derive(Debug, Default, Clone)]
pub struct ApiDocument {
    comments: HashMap<Signature, Comment>,
}

impl ApiDocument {
    /// Load the page of `class_name` under `doc_root`, plus every nested
    /// class page next to it (`Outer.Inner.html`, `Outer.Inner.Deeper.html`).
    ///
    /// Missing or unreadable pages contribute nothing.
    pub fn load(doc_root: &Path, class_name: &str, listing: &ListingCache) -> Self {
        let mut doc = ApiDocument::default();
        let path = page_path(doc_root, class_name);
        doc.load_page(doc_root, &path);

        let (Some(dir), Some(stem)) = (path.parent(), path.file_stem().and_then(|s| s.to_str()))
        else {
            return doc;
        };
        let nested = match Regex::new(&format!(r"^{}\..+\.html$", regex::escape(stem))) {
            Ok(re) => re,
            Err(err) => {
                warn!(%err, class = class_name, "cannot match nested pages");
                return doc;
            }
        };
        for name in listing.list(dir).iter().filter(|name| nested.is_match(name)) {
            doc.load_page(doc_root, &dir.join(name));
        }
        doc
    }

    /// Parse an in-memory page documenting `class_name`.
    pub fn parse_page(&mut self, class_name: &str, html: &str) {
        let html = page::prepare(class_name, html);
        page::extract(class_name, &html, &mut self.comments);
    }

    pub fn get(&self, signature: &Signature) -> Option<&Comment> {
        self.comments.get(signature)
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }

    fn load_page(&mut self, doc_root: &Path, path: &Path) {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no page");
                return;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read page");
                return;
            }
        };
        let Some(class_name) = page_class_name(doc_root, path) else {
            return;
        };
        let before = self.len();
        self.parse_page(&class_name, &String::from_utf8_lossy(&bytes));
        debug!(
            path = %path.display(),
            class = class_name,
            comments = self.len() - before,
            "loaded page"
        );
    }
}

/// `a.b.C` → `<root>/a/b/C.html`
pub fn page_path(doc_root: &Path, class_name: &str) -> PathBuf {
    let mut path = doc_root.to_path_buf();
    path.extend(class_name.split('.'));
    path.set_extension("html");
    path
}

/// `<root>/a/b/C.Inner.html` → `a.b.C.Inner`
fn page_class_name(doc_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(doc_root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    let joined = parts.join(".");
    joined.strip_suffix(".html").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><div class="contentContainer">
<div class="description"><ul class="blockList"><li class="blockList">
<pre>public static class <span class="typeNameLabel">Widget.Builder</span></pre>
<div class="block">Builds widgets.</div>
</li></ul></div>
</div></body></html>"#;

    #[test]
    fn page_path_follows_package() {
        assert_eq!(
            page_path(Path::new("/docs"), "a.b.C"),
            PathBuf::from("/docs/a/b/C.html")
        );
    }

    #[test]
    fn page_class_name_from_nested_path() {
        assert_eq!(
            page_class_name(Path::new("/docs"), Path::new("/docs/a/b/C.Inner.html")).as_deref(),
            Some("a.b.C.Inner")
        );
    }

    #[test]
    fn missing_page_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = ApiDocument::load(dir.path(), "a.b.C", &ListingCache::new());
        assert!(doc.is_empty());
    }

    #[test]
    fn loads_nested_pages_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("com/example");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("Widget.Builder.html"), PAGE).unwrap();
        fs::write(pkg.join("WidgetFactory.html"), PAGE).unwrap();

        let doc = ApiDocument::load(dir.path(), "com.example.Widget", &ListingCache::new());
        assert_eq!(doc.len(), 1);
        let builder = Signature::new("com.example.Widget.Builder", "static class Builder");
        assert_eq!(
            doc.get(&builder).and_then(|c| c.body.as_deref()),
            Some("Builds widgets.")
        );
    }

    #[test]
    fn parse_page_in_memory() {
        let mut doc = ApiDocument::default();
        doc.parse_page("com.example.Widget.Builder", PAGE);
        assert_eq!(doc.comments().count(), 1);
    }
}
