//! Error types for the renderer.
//!
//! `RenderError` covers everything that can abort one document: unreadable
//! files, malformed XML, missing attributes needed for a title, and an
//! inclusion graph that is not a forest. Dangling citations are not errors.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the renderer library.
#[derive(Debug, Error)]
pub enum RenderError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The root element is not a `<level>`, so the file is not a code page.
    #[error("Root element is <{0}>, expected <level>")]
    NotALevel(String),

    /// A node is missing something required to display it.
    #[error("Invalid {kind} node: {reason}")]
    Validation { kind: String, reason: String },

    /// A referenced document could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document is included from two different parents.
    #[error("Document '{id}' is included by both '{first}' and '{second}'")]
    DuplicateParent {
        id: String,
        first: String,
        second: String,
    },

    /// A document includes itself, directly or transitively.
    #[error("Inclusion cycle: '{id}' is its own ancestor (via '{parent}')")]
    Cycle { id: String, parent: String },

    /// A path could not be expressed relative to the base directory.
    #[error("Path {} is outside base directory {}", .path.display(), .basedir.display())]
    OutsideBaseDir { path: PathBuf, basedir: PathBuf },

    /// Invalid user input (flags, filter patterns, citation queries).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid regular expression in configuration.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more files failed during a batch run.
    #[error("{failed} of {total} files failed to render")]
    BatchFailed { failed: usize, total: usize },
}

impl RenderError {
    /// Shorthand for a validation failure on a node of the given kind.
    pub fn validation(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;
