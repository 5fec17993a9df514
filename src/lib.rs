//! mergedoc: merge Javadoc 8 HTML reference pages back into the doc
//! comments of Java sources.
//!
//! ```text
//! let mut merger = Merger::new("docs/api");
//! let merged = merger.merge(&source)?;
//! ```
//!
//! A class `a.b.C` is documented by `<root>/a/b/C.html`; its nested classes
//! by `<root>/a/b/C.Inner.html`. Declarations are paired with page entries
//! through [`Signature`]s, so comments are only replaced where the page
//! documents exactly that declaration.

pub mod error;
pub mod lexer;
pub mod markup;
pub mod merger;
pub mod model;
pub mod parser;
pub mod render;
pub mod signature;
pub mod source;

pub use error::{MergeError, Result};
pub use merger::{ClassKind, MergeOptions, Merger};
pub use model::{Comment, ParamEntry, ThrowsEntry};
pub use parser::{ApiDocument, ListingCache};
pub use render::JavadocRenderer;
pub use signature::Signature;
pub use source::SourceBuffer;
