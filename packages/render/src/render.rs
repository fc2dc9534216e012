//! HTML for flattened bodies and whole pages.

use serde::Serialize;

use crate::citation::escape_html;
use crate::error::Result;
use crate::flatten::Flattener;
use crate::group::{group_paragraphs, ParagraphGroup};
use crate::index::{Breadcrumb, Direction, SectionIndex};
use crate::title::page_title;
use crate::types::{ChildLink, DocNode, Paragraph, ParagraphBody, ParagraphClass, Span};

/// A page's title and grouped body.
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    pub title: String,
    pub groups: Vec<ParagraphGroup>,
}

impl Body {
    /// Flatten and group the body of `root`.
    pub fn build(flattener: &Flattener<'_>, root: &DocNode, path: &str) -> Result<Self> {
        let title = page_title(root)?;
        let paragraphs = flattener.flatten(root, path)?;
        Ok(Self {
            title,
            groups: group_paragraphs(paragraphs),
        })
    }
}

/// Links around a page: its ancestors and its neighbours in reading order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Navigation {
    pub breadcrumbs: Vec<Breadcrumb>,
    pub previous: Option<Breadcrumb>,
    pub next: Option<Breadcrumb>,
}

impl Navigation {
    /// Navigation for the page with the given index id.
    #[must_use]
    pub fn for_page(index: &SectionIndex, id: &str) -> Self {
        let neighbour = |direction: Direction| -> Option<Breadcrumb> {
            let sibling = index.sibling(id, direction)?;
            let location = index.location(sibling)?;
            Some(Breadcrumb {
                id: sibling.to_string(),
                title: location.title.clone(),
                output: location.output.clone(),
            })
        };

        Self {
            breadcrumbs: index.breadcrumbs(id),
            previous: neighbour(Direction::Previous),
            next: neighbour(Direction::Next),
        }
    }
}

/// Render grouped paragraphs as an HTML fragment.
///
/// `link_root` is the normalized prefix of internal links.
pub fn render_body(groups: &[ParagraphGroup], link_root: &str) -> String {
    let mut html = String::new();

    for group in groups {
        let name = group.group.as_str();
        if name.is_empty() {
            html.push_str("<div class=\"group\">\n");
        } else {
            html.push_str(&format!("<div class=\"group {name}\">\n"));
        }
        for paragraph in &group.paragraphs {
            render_paragraph(&mut html, paragraph, link_root);
        }
        html.push_str("</div>\n");
    }

    html
}

/// Render a complete page around an already rendered body.
pub fn render_page(title: &str, body_html: &str, nav: &Navigation, link_root: &str) -> String {
    let title = escape_html(title);
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));

    if !nav.breadcrumbs.is_empty() {
        html.push_str("<nav class=\"breadcrumbs\">\n");
        for crumb in &nav.breadcrumbs {
            html.push_str(&format!(
                "<a href='{link_root}/{}'>{}</a>\n",
                escape_html(&crumb.output),
                escape_html(&crumb.title)
            ));
        }
        html.push_str("</nav>\n");
    }

    html.push_str(&format!("<h1>{title}</h1>\n<main>\n{body_html}</main>\n"));

    if nav.previous.is_some() || nav.next.is_some() {
        html.push_str("<nav class=\"pager\">\n");
        for (class, link) in [("previous", &nav.previous), ("next", &nav.next)] {
            if let Some(link) = link {
                html.push_str(&format!(
                    "<a class=\"{class}\" href='{link_root}/{}'>{}</a>\n",
                    escape_html(&link.output),
                    escape_html(&link.title)
                ));
            }
        }
        html.push_str("</nav>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_paragraph(html: &mut String, paragraph: &Paragraph, link_root: &str) {
    let indent = paragraph.indentation;

    match (&paragraph.class, &paragraph.body) {
        (ParagraphClass::Table, ParagraphBody::Markup(markup)) => {
            html.push_str(&format!("<div class=\"table indent-{indent}\">{markup}</div>\n"));
        }
        (ParagraphClass::Heading, _) => {
            let level = (paragraph.heading_depth + 2).min(6);
            html.push_str(&format!(
                "<h{level} class=\"indent-{indent}\">{}</h{level}>\n",
                render_spans(paragraph.span_list())
            ));
        }
        (ParagraphClass::ChildLink, _) => {
            if let Some(link) = &paragraph.link {
                render_child_link(html, link, indent, link_root);
            }
        }
        (class, body) => {
            let mut classes = vec![format!("indent-{indent}")];
            if !class.as_str().is_empty() {
                classes.push(class.as_str().to_string());
            }
            if paragraph.has_level_num {
                classes.push("has-level-num".to_string());
            }
            let content = match body {
                ParagraphBody::Spans(spans) => render_spans(spans),
                ParagraphBody::Markup(markup) => markup.clone(),
            };
            html.push_str(&format!("<p class=\"{}\">{content}</p>\n", classes.join(" ")));
        }
    }
}

fn render_child_link(html: &mut String, link: &ChildLink, indent: usize, link_root: &str) {
    let mut class = format!("child-link indent-{indent}");
    if link.is_placeholder {
        class.push_str(" placeholder");
    }

    html.push_str(&format!(
        "<p class=\"{class}\"><a href='{link_root}/{}'>{}</a>",
        escape_html(&link.target),
        escape_html(&link.title)
    ));
    if let Some(range) = section_range_label(&link.section_range) {
        html.push_str(&format!(" <span class=\"section-range\">{}</span>", escape_html(&range)));
    }
    html.push_str("</p>\n");
}

/// `§§ 1-101 - 1-105`, or a single bound when only one is known.
fn section_range_label(range: &(Option<String>, Option<String>)) -> Option<String> {
    match range {
        (Some(start), Some(end)) if start == end => Some(format!("§ {start}")),
        (Some(start), Some(end)) => Some(format!("§§ {start} - {end}")),
        (Some(one), None) | (None, Some(one)) => Some(format!("§ {one}")),
        (None, None) => None,
    }
}

fn render_spans(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| {
            let class = span.class.as_str();
            match (class, &span.style) {
                ("", None) => span.text.clone(),
                (class, style) => {
                    let mut attrs = String::new();
                    if !class.is_empty() {
                        attrs.push_str(&format!(" class=\"{class}\""));
                    }
                    if let Some(style) = style {
                        attrs.push_str(&format!(" style=\"{}\"", escape_html(style)));
                    }
                    format!("<span{attrs}>{}</span>", span.text)
                }
            }
        })
        .collect()
}
