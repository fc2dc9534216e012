//! The recursive walk that turns a document tree into paragraphs.

use super::context::FlattenContext;
use super::table::table_markup;
use super::FlattenOptions;
use crate::citation::{escape_html, Linker, LinkerConfig};
use crate::config::output_path_for;
use crate::error::{RenderError, Result};
use crate::index::{RangeEnd, SectionIndex};
use crate::source::{resolve_include, DocumentSource, OverrideSource};
use crate::title::{file_id, is_placeholder_like, page_title};
use crate::types::{
    Child, ChildLink, DocNode, Group, Include, Paragraph, ParagraphBody, ParagraphClass,
    Span, SpanClass, Table, TextNode,
};

/// Flattens documents against a fixed index, linker and document source.
///
/// Holds only shared references, so one flattener can serve any number of
/// documents, and independent flatteners can run on different threads.
pub struct Flattener<'a> {
    source: OverrideSource<'a>,
    index: &'a SectionIndex,
    linker: Linker<'a>,
    options: &'a FlattenOptions,
}

impl<'a> Flattener<'a> {
    /// Create a flattener. Documents in `options.overrides` shadow `source`.
    pub fn new(
        source: &'a dyn DocumentSource,
        index: &'a SectionIndex,
        linker: &'a LinkerConfig,
        options: &'a FlattenOptions,
    ) -> Self {
        Self {
            source: OverrideSource::new(&options.overrides, source),
            index,
            linker: Linker::new(index, linker),
            options,
        }
    }

    /// Whether includes below `root` are expanded in place.
    ///
    /// Only pages of an inline kind qualify, and never while overrides are
    /// active: an edited view always links to its children.
    #[must_use]
    pub fn expands_includes(&self, root: &DocNode) -> bool {
        self.options.overrides.is_empty()
            && root
                .kind
                .as_ref()
                .is_some_and(|kind| self.options.inline_kinds.iter().any(|k| k == kind.as_str()))
    }

    /// Flatten the body of `root`, stored at relative path `path`.
    ///
    /// The root's own number and heading are not emitted; they belong to the
    /// page title.
    pub fn flatten(&self, root: &DocNode, path: &str) -> Result<Vec<Paragraph>> {
        let mut ctx = FlattenContext::root(path, root.kind.as_ref());
        ctx.expand_includes = self.expands_includes(root);

        let mut paragraphs = Vec::new();
        self.flatten_children(root, ctx, &mut paragraphs)?;
        mark_level_nums(&mut paragraphs);

        tracing::debug!(
            path = %path,
            paragraphs = paragraphs.len(),
            "Flattened document"
        );
        Ok(paragraphs)
    }

    /// Only the first child sees the pending header; later children start clean.
    fn flatten_children(
        &self,
        node: &DocNode,
        ctx: FlattenContext,
        out: &mut Vec<Paragraph>,
    ) -> Result<()> {
        if node.children.is_empty() {
            flush_header(&ctx, out);
            return Ok(());
        }

        for (i, child) in node.children.iter().enumerate() {
            let here = if i == 0 {
                ctx.clone()
            } else {
                FlattenContext {
                    pending: Vec::new(),
                    debt: 0,
                    ..ctx.clone()
                }
            };

            match child {
                Child::Text(text) => self.flatten_text(text, &here, out),
                Child::Level(level) => self.flatten_level(level, here, out)?,
                Child::Table(table) => self.flatten_table(table, &here, out),
                Child::Include(include) => self.flatten_include(include, &here, out)?,
            }
        }

        Ok(())
    }

    fn flatten_text(&self, text: &TextNode, ctx: &FlattenContext, out: &mut Vec<Paragraph>) {
        let mut spans = Vec::new();
        let mut indentation = ctx.indentation;

        if !ctx.pending.is_empty() {
            if ctx.group.is_special() {
                flush_header(ctx, out);
            } else {
                spans.extend(ctx.pending.iter().cloned());
                indentation = ctx.header_indentation();
            }
        }

        spans.extend(text.runs.iter().map(|run| {
            Span::new(self.linker.escape_and_link(&run.text), SpanClass::Text)
                .with_style(run.style.clone())
        }));

        out.push(Paragraph::spans(
            spans,
            indentation,
            ctx.group,
            ParagraphClass::Plain,
        ));
    }

    fn flatten_level(
        &self,
        level: &DocNode,
        mut ctx: FlattenContext,
        out: &mut Vec<Paragraph>,
    ) -> Result<()> {
        let Some(kind) = &level.kind else {
            let declares = level.num.is_some() || level.heading.is_some();
            if declares && ctx.pending_has_heading() {
                flush_header(&ctx, out);
                ctx.pending.clear();
            }

            let debt = if ctx.pending.is_empty() { 0 } else { ctx.debt + 1 };
            let mut pending = std::mem::take(&mut ctx.pending);
            pending.extend(header_spans(level, ctx.group));

            let inner = ctx.descend(None, pending, debt);
            return self.flatten_children(level, inner, out);
        };

        flush_header(&ctx, out);
        let inner = ctx.descend(Some(kind), Vec::new(), 0);

        if kind.is_special() {
            let spans = header_spans(level, inner.group);
            if !spans.is_empty() {
                out.push(Paragraph::spans(
                    spans,
                    inner.indentation,
                    inner.group,
                    ParagraphClass::Subheading,
                ));
            }
        } else {
            let title = page_title(level)?;
            if !title.is_empty() {
                out.push(Paragraph::spans(
                    vec![Span::new(escape_html(&title), SpanClass::LevelHeading)],
                    inner.indentation,
                    inner.group,
                    ParagraphClass::Heading,
                ));
            }
        }

        self.flatten_children(level, inner, out)
    }

    fn flatten_table(&self, table: &Table, ctx: &FlattenContext, out: &mut Vec<Paragraph>) {
        flush_header(ctx, out);
        out.push(Paragraph {
            body: ParagraphBody::Markup(table_markup(table, &self.linker)),
            indentation: ctx.indentation + 1,
            group: ctx.group,
            class: ParagraphClass::Table,
            has_level_num: false,
            heading_depth: 0,
            link: None,
        });
    }

    fn flatten_include(
        &self,
        include: &Include,
        ctx: &FlattenContext,
        out: &mut Vec<Paragraph>,
    ) -> Result<()> {
        flush_header(ctx, out);

        let path = resolve_include(&ctx.base_path, &include.href)?;
        let document = self.source.load(&path)?;
        let title = page_title(&document)?;

        if ctx.expand_includes {
            if ctx.include_chain.contains(&path) {
                return Err(RenderError::Cycle {
                    id: path,
                    parent: ctx.base_path.clone(),
                });
            }

            let inner = ctx.expand(&path, document.kind.as_ref());
            let mut heading = Paragraph::spans(
                vec![Span::new(escape_html(&title), SpanClass::Text)],
                ctx.indentation,
                inner.group,
                ParagraphClass::Heading,
            );
            heading.heading_depth = inner.heading_depth;
            out.push(heading);

            return self.flatten_children(&document, inner, out);
        }

        let id = file_id(&document, &path)?;
        let section_range = (
            self.index.section_range(&id, RangeEnd::Start),
            self.index.section_range(&id, RangeEnd::End),
        );
        out.push(Paragraph {
            body: ParagraphBody::Spans(Vec::new()),
            indentation: ctx.indentation,
            group: Group::Reset,
            class: ParagraphClass::ChildLink,
            has_level_num: false,
            heading_depth: 0,
            link: Some(ChildLink {
                target: output_path_for(&path),
                is_placeholder: is_placeholder_like(&document, &title),
                title,
                section_range,
            }),
        });
        Ok(())
    }
}

/// Emit the pending header on its own line, if there is one.
fn flush_header(ctx: &FlattenContext, out: &mut Vec<Paragraph>) {
    if ctx.pending.is_empty() {
        return;
    }
    out.push(Paragraph::spans(
        ctx.pending.clone(),
        ctx.header_indentation(),
        ctx.group,
        ParagraphClass::Subheading,
    ));
}

/// Number and heading spans of a level.
///
/// Outside special groups the heading runs into the text after a dash.
fn header_spans(level: &DocNode, group: Group) -> Vec<Span> {
    let mut spans = Vec::new();
    if let Some(num) = &level.num {
        spans.push(Span::new(
            format!("{} ", escape_html(num)),
            SpanClass::LevelNum,
        ));
    }
    if let Some(heading) = &level.heading {
        let separator = if group.is_special() { "" } else { " — " };
        spans.push(Span::new(
            format!("{}{separator}", escape_html(heading)),
            SpanClass::LevelHeading,
        ));
    }
    spans
}

/// Flag paragraphs whose spans include level numbering.
pub fn mark_level_nums(paragraphs: &mut [Paragraph]) {
    for paragraph in paragraphs {
        paragraph.has_level_num = paragraph
            .span_list()
            .iter()
            .any(|span| span.class == SpanClass::LevelNum);
    }
}
