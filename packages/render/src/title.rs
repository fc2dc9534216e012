//! Display titles and stable identifiers for code pages.

use crate::config::strip_source_extension;
use crate::error::{RenderError, Result};
use crate::types::{DocNode, NodeKind, RangeType};

/// Marker that flags a page as repealed in its title.
pub const REPEALED_MARKER: &str = "[Repealed]";

/// Create the canonical display name for a page or level.
///
/// - document: the heading alone
/// - section: `§ 1-101. Heading`
/// - placeholder: `§ 1-101`, `§1-101-§1-105` (range) or `§1-101, §1-102` (list),
///   followed by ` [reason]` when a reason is given
/// - big levels: `Division I. Heading`, prefix from `<prefix>` or the type name
///
/// # Examples
/// ```
/// use dccode_render::title::page_title;
/// use dccode_render::types::{DocNode, NodeKind};
///
/// let section = DocNode::of_kind(NodeKind::Section).with_num("1-101").with_heading("Territorial area");
/// assert_eq!(page_title(&section).unwrap(), "§ 1-101. Territorial area");
/// ```
pub fn page_title(node: &DocNode) -> Result<String> {
    let label = match &node.kind {
        Some(NodeKind::Document | NodeKind::Toc) => None,
        Some(NodeKind::Section) => Some(format!("§ {}", required_num(node)?)),
        Some(NodeKind::Placeholder) => Some(placeholder_label(node)?),
        Some(NodeKind::Container) => {
            let prefix = node.prefix.as_deref().ok_or_else(|| {
                RenderError::validation("container", "missing <prefix> needed for its title")
            })?;
            Some(with_num(prefix, node.num.as_deref()))
        }
        Some(kind) => {
            let prefix = node.prefix.as_deref().unwrap_or_else(|| kind_label(kind));
            Some(with_num(prefix, node.num.as_deref()))
        }
        None => node.num.clone(),
    };

    let mut title = match (label, node.heading.as_deref()) {
        (Some(label), Some(heading)) => format!("{label}. {heading}"),
        (Some(label), None) => label,
        (None, Some(heading)) => heading.to_string(),
        (None, None) => String::new(),
    };

    if let Some(reason) = &node.reason {
        title.push_str(&format!(" [{reason}]"));
    }

    Ok(title)
}

/// Identifier of a document in the section index.
///
/// Sections are known by their number, single-section placeholders by that
/// section's number, and everything else by its path relative to the code's
/// base directory without the `.xml` suffix.
pub fn file_id(node: &DocNode, relative_path: &str) -> Result<String> {
    match &node.kind {
        Some(NodeKind::Section) => Ok(required_num(node)?.to_string()),
        Some(NodeKind::Placeholder) => Ok(node
            .section
            .clone()
            .unwrap_or_else(|| strip_source_extension(relative_path).to_string())),
        _ => Ok(strip_source_extension(relative_path).to_string()),
    }
}

/// First and last section number a page itself stands for.
///
/// `None` for pages that are not a section or placeholder.
#[must_use]
pub fn section_span(node: &DocNode) -> Option<(String, String)> {
    match &node.kind {
        Some(NodeKind::Section) => node.num.clone().map(|num| (num.clone(), num)),
        Some(NodeKind::Placeholder) => match (&node.section, &node.section_start, &node.section_end) {
            (Some(section), _, _) => Some((section.clone(), section.clone())),
            (None, Some(start), Some(end)) => Some((start.clone(), end.clone())),
            _ => None,
        },
        _ => None,
    }
}

/// Whether a page should be shown as a placeholder in child listings.
#[must_use]
pub fn is_placeholder_like(node: &DocNode, title: &str) -> bool {
    node.is_placeholder() || title.contains(REPEALED_MARKER)
}

fn required_num(node: &DocNode) -> Result<&str> {
    node.num
        .as_deref()
        .ok_or_else(|| RenderError::validation(node.kind_name(), "missing <num> needed for its title"))
}

fn placeholder_label(node: &DocNode) -> Result<String> {
    if let Some(section) = &node.section {
        return Ok(format!("§ {section}"));
    }

    match (&node.section_start, &node.section_end, node.section_range_type) {
        (Some(start), Some(end), Some(RangeType::Range)) => Ok(format!("§{start}-§{end}")),
        (Some(start), Some(end), Some(RangeType::List)) => Ok(format!("§{start}, §{end}")),
        _ => Err(RenderError::validation(
            "placeholder",
            "missing <section> or section range needed for its title",
        )),
    }
}

fn with_num(prefix: &str, num: Option<&str>) -> String {
    match num {
        Some(num) => format!("{prefix} {num}"),
        None => prefix.to_string(),
    }
}

fn kind_label(kind: &NodeKind) -> &str {
    match kind {
        NodeKind::Annotations => "Annotations",
        NodeKind::Appendices => "Appendices",
        NodeKind::Form => "Form",
        other => other.as_str(),
    }
}
