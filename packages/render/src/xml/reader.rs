//! Reads code XML into the owned `DocNode` tree.

use roxmltree::{Document, Node};

use super::utils::{element_children, full_text, get_tag_name, get_text};
use crate::error::{RenderError, Result};
use crate::types::{Child, DocNode, Include, NodeKind, RangeType, Table, TableRow, TextNode, TextRun};

/// Parse a code document.
///
/// The root element must be `<level>`. The returned tree has been checked
/// against the section and placeholder attribute rules.
///
/// # Examples
/// ```
/// use dccode_render::xml::parse_document;
///
/// let node = parse_document("<level><type>Section</type><num>1-101</num><text>Lorem.</text></level>").unwrap();
/// assert_eq!(node.num.as_deref(), Some("1-101"));
/// assert_eq!(node.children.len(), 1);
/// ```
pub fn parse_document(xml: &str) -> Result<DocNode> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    let tag = get_tag_name(root);
    if tag != "level" {
        return Err(RenderError::NotALevel(tag.to_string()));
    }

    let node = read_level(root)?;
    validate(&node)?;
    Ok(node)
}

fn read_level(node: Node<'_, '_>) -> Result<DocNode> {
    let mut level = DocNode::level();

    for child in element_children(node) {
        match get_tag_name(child) {
            "type" => level.kind = Some(NodeKind::from_type(&get_text(child))),
            "num" => level.num = Some(get_text(child)),
            "heading" => level.heading = Some(get_text(child)),
            "prefix" => level.prefix = Some(get_text(child)),
            "reason" => level.reason = Some(get_text(child)),
            "section" => level.section = Some(get_text(child)),
            "section-start" => level.section_start = Some(get_text(child)),
            "section-end" => level.section_end = Some(get_text(child)),
            "section-range-type" => {
                let text = get_text(child);
                let range_type = RangeType::parse(&text).ok_or_else(|| {
                    RenderError::validation(
                        "placeholder",
                        format!("unknown section-range-type '{text}'"),
                    )
                })?;
                level.section_range_type = Some(range_type);
            }
            "text" => level.children.push(Child::Text(read_text(child))),
            "level" => level.children.push(Child::Level(read_level(child)?)),
            "table" => level.children.push(Child::Table(read_table(child))),
            "include" => {
                let href = child.attribute("href").ok_or_else(|| {
                    RenderError::validation(level.kind_name(), "<include> without href")
                })?;
                level.children.push(Child::Include(Include {
                    href: href.to_string(),
                }));
            }
            other => {
                tracing::warn!(
                    tag = %other,
                    parent = %level.kind_name(),
                    "Unknown element in level, skipping"
                );
            }
        }
    }

    Ok(level)
}

/// Turn mixed content into runs: unstyled text nodes and styled child elements.
fn read_text(node: Node<'_, '_>) -> TextNode {
    let mut runs = Vec::new();

    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text().filter(|t| !t.is_empty()) {
                runs.push(TextRun::plain(text));
            }
        } else if child.is_element() {
            let text = full_text(child);
            if text.is_empty() {
                continue;
            }
            runs.push(TextRun {
                text,
                style: child.attribute("style").map(String::from),
            });
        }
    }

    TextNode { runs }
}

fn read_table(node: Node<'_, '_>) -> Table {
    let mut table = Table::default();

    for child in element_children(node) {
        match get_tag_name(child) {
            "caption" => table.caption = Some(read_text(child)),
            "heading-row" => table.rows.push(read_row(child, true)),
            "row" => table.rows.push(read_row(child, false)),
            other => {
                tracing::warn!(tag = %other, "Unknown element in table, skipping");
            }
        }
    }

    table
}

fn read_row(node: Node<'_, '_>, heading: bool) -> TableRow {
    TableRow {
        heading,
        cells: element_children(node).map(read_text).collect(),
    }
}

/// Check the attribute rules for sections and placeholders, recursively.
pub fn validate(node: &DocNode) -> Result<()> {
    match node.kind {
        Some(NodeKind::Section) => {
            if node.section.is_some()
                || node.section_start.is_some()
                || node.section_end.is_some()
                || node.section_range_type.is_some()
            {
                return Err(RenderError::validation(
                    "Section",
                    "a section carries only <num>, not placeholder attributes",
                ));
            }
        }
        Some(NodeKind::Placeholder) => {
            let triple = [
                node.section_start.is_some(),
                node.section_end.is_some(),
                node.section_range_type.is_some(),
            ]
            .iter()
            .filter(|present| **present)
            .count();

            let single = node.section.is_some() && triple == 0;
            let range = node.section.is_none() && triple == 3;
            if !single && !range {
                return Err(RenderError::validation(
                    "placeholder",
                    "expected either <section> or <section-start>, <section-end> and <section-range-type>",
                ));
            }
        }
        _ => {}
    }

    for child in &node.children {
        if let Child::Level(level) = child {
            validate(level)?;
        }
    }

    Ok(())
}
