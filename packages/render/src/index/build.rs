//! Build the section index by following includes from the root document.

use super::{Location, SectionIndex};
use crate::config::output_path_for;
use crate::error::{RenderError, Result};
use crate::source::{normalize_path, resolve_include, DocumentSource};
use crate::title::{file_id, page_title, section_span};
use crate::types::{Child, DocNode};

impl Location {
    /// Location of a parsed document stored at `source`.
    pub fn for_document(node: &DocNode, source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            output: output_path_for(source),
            title: page_title(node)?,
            span: section_span(node),
        })
    }
}

/// Walk the include graph from `root` and index every reachable document.
///
/// Fails with `DuplicateParent` when a document is included twice and with
/// `Cycle` when a document includes one of its own ancestors.
pub fn build_index(source: &dyn DocumentSource, root: &str) -> Result<SectionIndex> {
    let root = normalize_path(root);
    let document = source.load(&root)?;
    let root_id = file_id(&document, &root)?;

    let mut index = SectionIndex::default();
    index.insert_location(root_id.clone(), Location::for_document(&document, &root)?);

    let mut ancestors = Vec::new();
    visit(source, &mut index, &document, &root, &root_id, &mut ancestors)?;

    tracing::info!(
        root = %root_id,
        documents = index.len(),
        edges = index.edge_count(),
        "Built section index"
    );
    Ok(index)
}

fn visit(
    source: &dyn DocumentSource,
    index: &mut SectionIndex,
    document: &DocNode,
    path: &str,
    id: &str,
    ancestors: &mut Vec<String>,
) -> Result<()> {
    ancestors.push(id.to_string());

    let mut hrefs = Vec::new();
    collect_includes(document, &mut hrefs);

    for href in hrefs {
        let child_path = resolve_include(path, href)?;
        let child = source.load(&child_path)?;
        let child_id = file_id(&child, &child_path)?;

        if ancestors.contains(&child_id) {
            return Err(RenderError::Cycle {
                id: child_id,
                parent: id.to_string(),
            });
        }
        if let Some(first) = index.parent(&child_id) {
            return Err(RenderError::DuplicateParent {
                first: first.to_string(),
                second: id.to_string(),
                id: child_id,
            });
        }

        tracing::debug!(parent = %id, child = %child_id, "Indexed include");
        index.insert_location(child_id.clone(), Location::for_document(&child, &child_path)?);
        index.insert_edge(id, &child_id);

        visit(source, index, &child, &child_path, &child_id, ancestors)?;
    }

    ancestors.pop();
    Ok(())
}

/// Include hrefs anywhere in the document, in document order.
fn collect_includes<'a>(node: &'a DocNode, out: &mut Vec<&'a str>) {
    for child in &node.children {
        match child {
            Child::Include(include) => out.push(&include.href),
            Child::Level(level) => collect_includes(level, out),
            Child::Text(_) | Child::Table(_) => {}
        }
    }
}
