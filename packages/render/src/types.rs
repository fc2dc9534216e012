//! Core data types for the renderer.
//!
//! The input side is an owned document tree (`DocNode`) read from the code's
//! XML files. The output side is the flat paragraph stream (`Paragraph`) that
//! the template layer turns into a page.

use serde::{Deserialize, Serialize};

/// The `<type>` of a structural node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of the code or of a table of contents page.
    Document,
    /// Table of contents.
    Toc,
    /// A codified section.
    Section,
    /// Stands in for sections that are not separately stored.
    Placeholder,
    /// Editorial annotations following a section.
    Annotations,
    /// Appendices.
    Appendices,
    /// Form text.
    Form,
    /// A big level whose display prefix comes from `<prefix>`.
    Container,
    /// A big level named by its type ("Title", "Division", "Chapter", ...).
    Named(String),
}

impl NodeKind {
    /// Parse the text of a `<type>` element.
    #[must_use]
    pub fn from_type(text: &str) -> Self {
        match text.trim() {
            "document" => Self::Document,
            "toc" => Self::Toc,
            "Section" | "section" => Self::Section,
            "placeholder" => Self::Placeholder,
            "annotations" => Self::Annotations,
            "appendices" => Self::Appendices,
            "form" => Self::Form,
            "container" => Self::Container,
            other => Self::Named(other.to_string()),
        }
    }

    /// The type name as it appears in source documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "document",
            Self::Toc => "toc",
            Self::Section => "Section",
            Self::Placeholder => "placeholder",
            Self::Annotations => "annotations",
            Self::Appendices => "appendices",
            Self::Form => "form",
            Self::Container => "container",
            Self::Named(name) => name,
        }
    }

    /// Annotations, appendices and form text are grouped and styled apart.
    #[must_use]
    pub fn special_group(&self) -> Option<Group> {
        match self {
            Self::Annotations => Some(Group::Annotations),
            Self::Appendices => Some(Group::Appendices),
            Self::Form => Some(Group::Form),
            _ => None,
        }
    }

    /// Whether this is one of the specially grouped kinds.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.special_group().is_some()
    }
}

/// How a placeholder's start and end sections relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    /// Every section from start to end.
    Range,
    /// Just the two named sections.
    List,
}

impl RangeType {
    /// Parse the text of a `<section-range-type>` element.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "range" => Some(Self::Range),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

/// A structural node: the root of a document or a nested level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocNode {
    /// `None` for an inline-numbered level such as "(a)".
    pub kind: Option<NodeKind>,
    pub num: Option<String>,
    pub heading: Option<String>,
    pub prefix: Option<String>,
    pub reason: Option<String>,
    pub section: Option<String>,
    pub section_start: Option<String>,
    pub section_end: Option<String>,
    pub section_range_type: Option<RangeType>,
    /// Body content in document order.
    pub children: Vec<Child>,
}

impl DocNode {
    /// Create an inline-numbered level.
    #[must_use]
    pub fn level() -> Self {
        Self::default()
    }

    /// Create a node of the given kind.
    #[must_use]
    pub fn of_kind(kind: NodeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Set the number.
    #[must_use]
    pub fn with_num(mut self, num: impl Into<String>) -> Self {
        self.num = Some(num.into());
        self
    }

    /// Set the heading.
    #[must_use]
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Set the display prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append a plain text paragraph.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(TextNode::plain(text)));
        self
    }

    /// Append a nested level.
    #[must_use]
    pub fn with_level(mut self, level: DocNode) -> Self {
        self.children.push(Child::Level(level));
        self
    }

    /// Append an include of another document.
    #[must_use]
    pub fn with_include(mut self, href: impl Into<String>) -> Self {
        self.children.push(Child::Include(Include { href: href.into() }));
        self
    }

    /// Append an arbitrary child.
    #[must_use]
    pub fn with_child(mut self, child: Child) -> Self {
        self.children.push(child);
        self
    }

    /// Type name for messages; inline levels report "level".
    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.kind.as_ref().map_or("level", NodeKind::as_str)
    }

    #[must_use]
    pub fn is_section(&self) -> bool {
        self.kind == Some(NodeKind::Section)
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.kind == Some(NodeKind::Placeholder)
    }

    /// Hrefs of the includes directly in this node's body, in order.
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match child {
            Child::Include(include) => Some(include.href.as_str()),
            _ => None,
        })
    }

    /// Number of text nodes in this subtree (tables and includes excluded).
    #[must_use]
    pub fn text_node_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Child::Text(_) => 1,
                Child::Level(level) => level.text_node_count(),
                Child::Table(_) | Child::Include(_) => 0,
            })
            .sum()
    }
}

/// Body content of a structural node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Text(TextNode),
    Level(DocNode),
    Table(Table),
    Include(Include),
}

/// Mixed inline content: plain runs interleaved with styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    pub runs: Vec<TextRun>,
}

impl TextNode {
    /// A text node with a single unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// All run text concatenated, without styling.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// One run of text with an optional `style`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: Option<String>,
}

impl TextRun {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    #[must_use]
    pub fn styled(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Some(style.into()),
        }
    }
}

/// A table with an optional caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub caption: Option<TextNode>,
    pub rows: Vec<TableRow>,
}

/// A table row; heading rows render with header cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub heading: bool,
    pub cells: Vec<TextNode>,
}

/// A reference to another document, relative to the including file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub href: String,
}

/// Visual group of a paragraph.
///
/// `Primary` is the ordinary body; `Reset` marks paragraphs that explicitly
/// leave any surrounding group (section bodies, child links).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Group {
    #[default]
    Primary,
    Reset,
    Annotations,
    Appendices,
    Form,
    TableOfContents,
}

impl Group {
    /// CSS name; empty for the ungrouped body.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary | Self::Reset => "",
            Self::Annotations => "annotations",
            Self::Appendices => "appendices",
            Self::Form => "form",
            Self::TableOfContents => "table-of-contents",
        }
    }

    /// Headers are never merged into text inside a special group.
    #[must_use]
    pub fn is_special(&self) -> bool {
        !matches!(self, Self::Primary | Self::Reset)
    }
}

/// Role of a span within a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanClass {
    #[default]
    Text,
    LevelNum,
    LevelHeading,
}

impl SpanClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "",
            Self::LevelNum => "level-num",
            Self::LevelHeading => "level-heading",
        }
    }
}

/// A run of already escaped (and possibly linked) markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub class: SpanClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Span {
    #[must_use]
    pub fn new(text: impl Into<String>, class: SpanClass) -> Self {
        Self {
            text: text.into(),
            class,
            style: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }
}

/// Display class of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParagraphClass {
    #[default]
    Plain,
    Subheading,
    Heading,
    ChildLink,
    Table,
}

impl ParagraphClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Subheading => "subheading",
            Self::Heading => "heading",
            Self::ChildLink => "child-link",
            Self::Table => "table",
        }
    }
}

/// Paragraph content: spans, or a pre-rendered markup blob (tables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ParagraphBody {
    Spans(Vec<Span>),
    Markup(String),
}

/// Link to an included document, shown in shallow mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    /// Output location of the target, relative to the code's base directory.
    pub target: String,
    pub title: String,
    pub is_placeholder: bool,
    /// First and last section reachable below the target.
    pub section_range: (Option<String>, Option<String>),
}

/// One display paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub body: ParagraphBody,
    pub indentation: usize,
    pub group: Group,
    pub class: ParagraphClass,
    /// Set when a span carries level numbering that CSS must hang.
    #[serde(default)]
    pub has_level_num: bool,
    /// Nesting depth of an inlined document, picks the heading weight.
    #[serde(default)]
    pub heading_depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ChildLink>,
}

impl Paragraph {
    /// A paragraph of spans.
    #[must_use]
    pub fn spans(spans: Vec<Span>, indentation: usize, group: Group, class: ParagraphClass) -> Self {
        Self {
            body: ParagraphBody::Spans(spans),
            indentation,
            group,
            class,
            has_level_num: false,
            heading_depth: 0,
            link: None,
        }
    }

    /// The spans of this paragraph; empty for markup and link paragraphs.
    #[must_use]
    pub fn span_list(&self) -> &[Span] {
        match &self.body {
            ParagraphBody::Spans(spans) => spans,
            ParagraphBody::Markup(_) => &[],
        }
    }

    /// Concatenated span text (markup for table paragraphs).
    #[must_use]
    pub fn text(&self) -> String {
        match &self.body {
            ParagraphBody::Spans(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
            ParagraphBody::Markup(markup) => markup.clone(),
        }
    }
}
