//! State threaded through the recursive walk.

use crate::types::{Group, NodeKind, Span, SpanClass};

/// Flattening state for the children of one node.
///
/// Passed by value into each recursive call; a child gets a modified copy and
/// nothing is shared between siblings.
#[derive(Debug, Clone, Default)]
pub struct FlattenContext {
    /// Indentation of text directly inside the current node.
    pub indentation: usize,
    /// Whether nested levels stay at `indentation` instead of stepping in.
    pub top_level: bool,
    /// Numbering and headings of ancestors not yet shown.
    pub pending: Vec<Span>,
    /// Ancestor levels whose headers are folded into `pending`.
    pub debt: usize,
    pub group: Group,
    /// Depth of documents expanded inline, picks the heading weight.
    pub heading_depth: usize,
    /// Relative path of the document the current node belongs to.
    pub base_path: String,
    /// Documents being expanded inline, outermost first.
    pub include_chain: Vec<String>,
    /// Expand includes in place instead of linking to them.
    pub expand_includes: bool,
}

impl FlattenContext {
    /// Context for the body of a page's root node.
    #[must_use]
    pub fn root(base_path: impl Into<String>, kind: Option<&NodeKind>) -> Self {
        let base_path = base_path.into();
        Self {
            top_level: true,
            group: group_for(kind, Group::Primary),
            include_chain: vec![base_path.clone()],
            base_path,
            ..Self::default()
        }
    }

    /// Indentation of text inside a nested level.
    #[must_use]
    pub fn child_indentation(&self) -> usize {
        if self.top_level {
            self.indentation
        } else {
            self.indentation + 1
        }
    }

    /// Where a pending header is shown.
    #[must_use]
    pub fn header_indentation(&self) -> usize {
        self.indentation.saturating_sub(self.debt)
    }

    /// Context for the children of a nested level.
    #[must_use]
    pub fn descend(&self, kind: Option<&NodeKind>, pending: Vec<Span>, debt: usize) -> Self {
        Self {
            indentation: self.child_indentation(),
            top_level: false,
            pending,
            debt,
            group: group_for(kind, self.group),
            heading_depth: self.heading_depth,
            base_path: self.base_path.clone(),
            include_chain: self.include_chain.clone(),
            expand_includes: self.expand_includes,
        }
    }

    /// Context for a document expanded inline at the current position.
    #[must_use]
    pub fn expand(&self, path: &str, kind: Option<&NodeKind>) -> Self {
        let mut include_chain = self.include_chain.clone();
        include_chain.push(path.to_string());
        Self {
            indentation: self.indentation,
            top_level: true,
            pending: Vec::new(),
            debt: 0,
            group: group_for(kind, Group::Reset),
            heading_depth: self.heading_depth + 1,
            base_path: path.to_string(),
            include_chain,
            expand_includes: self.expand_includes,
        }
    }

    /// Whether the pending header already carries a heading.
    #[must_use]
    pub fn pending_has_heading(&self) -> bool {
        self.pending
            .iter()
            .any(|span| span.class == SpanClass::LevelHeading)
    }
}

/// Group of the paragraphs below a node of the given kind.
#[must_use]
pub fn group_for(kind: Option<&NodeKind>, inherited: Group) -> Group {
    match kind {
        Some(NodeKind::Document | NodeKind::Toc) => Group::TableOfContents,
        Some(NodeKind::Section) => Group::Reset,
        Some(kind) => kind.special_group().unwrap_or(inherited),
        None => inherited,
    }
}
