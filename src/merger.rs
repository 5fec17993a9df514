//! Per-file merge: locate the class, load its pages, rewrite its slots.

use crate::error::{MergeError, Result};
use crate::lexer;
use crate::parser::{ApiDocument, ListingCache};
use crate::render::JavadocRenderer;
use crate::signature::find_type_declaration;
use crate::source::SourceBuffer;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::debug;

static RE_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s;])package\s+([\w.$\s]+?)\s*;").unwrap());

/// Kind of the top-level type of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Annotation,
    Enum,
}

impl ClassKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "@interface" => Some(ClassKind::Annotation),
            "enum" => Some(ClassKind::Enum),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Annotation => "@interface",
            ClassKind::Enum => "enum",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Rewrite `<code>` runs as `{@code}` tags.
    pub code_tags: bool,
}

/// Merges reference pages under one doc root into Java sources.
#[derive(Debug)]
pub struct Merger {
    doc_root: PathBuf,
    options: MergeOptions,
    listing: Arc<ListingCache>,
    class_name: Option<String>,
    class_kind: Option<ClassKind>,
}

impl Merger {
    pub fn new(doc_root: impl Into<PathBuf>) -> Self {
        Merger {
            doc_root: doc_root.into(),
            options: MergeOptions::default(),
            listing: Arc::new(ListingCache::new()),
            class_name: None,
            class_kind: None,
        }
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Share directory listings with other mergers over the same tree.
    pub fn with_listing(mut self, listing: Arc<ListingCache>) -> Self {
        self.listing = listing;
        self
    }

    pub fn doc_root(&self) -> &Path {
        &self.doc_root
    }

    /// Merge the pages of the class declared in `source` into its doc
    /// comments.
    ///
    /// Sources without a package clause, and classes without pages, come
    /// back unchanged. A package clause with no type declaration after it
    /// is an error.
    pub fn merge(&mut self, source: &str) -> Result<String> {
        self.class_name = None;
        self.class_kind = None;

        let code = lexer::strip_comments(source).replace(['\r', '\n'], " ");
        let Some(caps) = RE_PACKAGE.captures(&code) else {
            debug!("no package clause");
            return Ok(source.to_string());
        };
        let package: String = caps[1].split_whitespace().collect();
        let after = caps.get(0).map_or(code.len(), |m| m.end());

        let Some((keyword, name)) = find_type_declaration(&code[after..]) else {
            return Err(MergeError::ClassNotFound { package });
        };
        let class_name = format!("{}.{}", package, name);
        self.class_kind = ClassKind::from_keyword(keyword);
        self.class_name = Some(class_name.clone());

        let doc = ApiDocument::load(&self.doc_root, &class_name, &self.listing);
        if doc.is_empty() {
            debug!(class = class_name, "no documentation");
            return Ok(source.to_string());
        }

        let renderer = JavadocRenderer {
            code_tags: self.options.code_tags,
        };
        let mut buf = SourceBuffer::new(&package, source).with_renderer(renderer);
        let mut replaced = 0usize;
        while buf.next_comment() {
            let comment = buf.signature().and_then(|sig| doc.get(sig));
            if comment.is_some() {
                replaced += 1;
            }
            buf.set_comment(comment);
        }
        debug!(
            class = class_name,
            slots = buf.slot_count(),
            documented = doc.len(),
            replaced,
            "merged"
        );
        Ok(buf.finish())
    }

    /// Read `path` and merge it.
    pub fn merge_file(&mut self, path: &Path) -> Result<String> {
        let source = fs::read_to_string(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge(&source)
    }

    /// Fully qualified name found by the last merge, if it had a package.
    pub fn merged_class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn class_kind(&self) -> Option<ClassKind> {
        self.class_kind
    }
}
