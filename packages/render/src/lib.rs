//! DC Code renderer - flatten hierarchical legal-code XML into display
//! paragraphs with hyperlinked citations.
//!
//! Each code document is a tree of nested levels: titles, chapters, sections
//! and their lettered and numbered subdivisions. This crate turns such a tree
//! into a flat list of indented paragraphs, links every citation it recognizes
//! and builds the section index that resolves internal citations and drives
//! page navigation.
//!
//! # Example
//!
//! ```
//! use dccode_render::citation::{Linker, LinkerConfig};
//! use dccode_render::flatten::{FlattenOptions, Flattener};
//! use dccode_render::index::SectionIndex;
//! use dccode_render::source::MemorySource;
//! use dccode_render::xml::parse_document;
//!
//! let root = parse_document(
//!     "<level><type>Section</type><num>1-101</num>\
//!      <level><num>(a)</num><level><num>(1)</num><text>Lorem.</text></level></level>\
//!      </level>",
//! )
//! .unwrap();
//!
//! let index = SectionIndex::default();
//! let source = MemorySource::new();
//! let linker = LinkerConfig::default();
//! let options = FlattenOptions::default();
//! let flattener = Flattener::new(&source, &index, &linker, &options);
//!
//! let paragraphs = flattener.flatten(&root, "Title-1/1-101.xml").unwrap();
//! assert_eq!(paragraphs[0].text(), "(a) (1) Lorem.");
//! assert_eq!(paragraphs[0].indentation, 0);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Document tree and paragraph types
//! - [`error`]: Error types and Result alias
//! - [`xml`]: XML reading into the owned document tree
//! - [`title`]: Page titles and index ids
//! - [`source`]: Where documents are loaded from
//! - [`citation`]: Citation recognition and linking
//! - [`index`]: Section index build, queries, persistence and search
//! - [`flatten`]: Tree flattening
//! - [`group`]: Paragraph grouping
//! - [`render`]: HTML output
//! - [`batch`]: Parallel rendering of a code directory
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod citation;
pub mod cli;
pub mod config;
pub mod error;
pub mod flatten;
pub mod group;
pub mod index;
pub mod render;
pub mod source;
pub mod title;
pub mod types;
pub mod xml;

// Re-export commonly used items
pub use error::{RenderError, Result};
pub use flatten::{FlattenOptions, Flattener};
pub use group::{group_paragraphs, ParagraphGroup};
pub use index::SectionIndex;
pub use render::{render_body, render_page, Body, Navigation};
pub use types::{DocNode, Group, Paragraph, ParagraphClass, Span, SpanClass};
