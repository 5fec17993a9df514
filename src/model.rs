//! Structured doc-comment content parsed from a reference page.

use crate::signature::Signature;

/// One documented declaration.
///
/// Text fields hold HTML whose links have already been rewritten into inline
/// tags. Fields missing from the page stay empty and are skipped on render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub signature: Signature,
    /// Main description.
    pub body: Option<String>,
    pub params: Vec<ParamEntry>,
    pub returns: Vec<String>,
    pub throws: Vec<ThrowsEntry>,
    pub since: Vec<String>,
    /// Resolved references, or verbatim `<a>` markup.
    pub see: Vec<String>,
    pub deprecated: Option<String>,
}

/// `@param name description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamEntry {
    pub name: String,
    pub description: String,
}

/// `@throws Reference description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowsEntry {
    pub reference: String,
    pub description: String,
}

impl Comment {
    pub fn new(signature: Signature) -> Self {
        Comment {
            signature,
            body: None,
            params: Vec::new(),
            returns: Vec::new(),
            throws: Vec::new(),
            since: Vec::new(),
            see: Vec::new(),
            deprecated: None,
        }
    }

    /// True when the page carried nothing worth rendering.
    pub fn is_blank(&self) -> bool {
        self.body.as_deref().map_or(true, str::is_empty)
            && self.params.is_empty()
            && self.returns.is_empty()
            && self.throws.is_empty()
            && self.since.is_empty()
            && self.see.is_empty()
            && self.deprecated.is_none()
    }
}
