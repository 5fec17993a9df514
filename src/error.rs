//! Error types for the merge engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of [`crate::Merger`].
///
/// Missing or unreadable documentation is never an error; it only leaves the
/// source text unchanged.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The source has a package clause but no recognizable type declaration.
    #[error("no class, interface, @interface or enum declaration found after `package {package};`")]
    ClassNotFound { package: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MergeError>;
