//! Tree flattening: nested levels in, display paragraphs out.
//!
//! Numbering and headings of a level are shown on the first paragraph inside
//! it, so `(a)` containing `(1)` containing "Lorem." becomes one line
//! "(a) (1) Lorem." pulled back to the indentation of `(a)`. Big structural
//! levels and the special groups (annotations, appendices, form) get a header
//! line of their own. Includes become child links, or in chapter pages the
//! included documents are expanded in place.

mod context;
mod engine;
mod table;

pub use context::{group_for, FlattenContext};
pub use engine::{mark_level_nums, Flattener};
pub use table::{inline_markup, table_markup};

use crate::config::DEFAULT_INLINE_KINDS;
use crate::source::MemorySource;

/// Per-request flattening options.
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// Page kinds whose includes are expanded in place.
    pub inline_kinds: Vec<String>,
    /// Unsaved documents that shadow the stored ones.
    pub overrides: MemorySource,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            inline_kinds: DEFAULT_INLINE_KINDS.iter().map(|k| (*k).to_string()).collect(),
            overrides: MemorySource::default(),
        }
    }
}

impl FlattenOptions {
    /// Use `overrides` in place of stored documents.
    #[must_use]
    pub fn with_overrides(mut self, overrides: MemorySource) -> Self {
        self.overrides = overrides;
        self
    }
}
