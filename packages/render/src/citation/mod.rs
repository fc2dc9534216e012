//! Citation recognition and linking.
//!
//! Text is escaped first, then scanned for five grammars: sections of this
//! code, D.C. laws, federal laws, D.C. Register notices and Statutes at Large.
//! Citations that resolve become anchors; everything else is left as escaped
//! text. A section citation that is not in the index is not an error.

mod linker;
mod patterns;

pub use linker::{escape_html, Linker, LinkerConfig};
pub use patterns::{recognize, Citation, CitationKind};
