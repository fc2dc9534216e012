//! Section index: where every document lives and how documents nest.
//!
//! The index is built once per batch run by following includes from the root
//! document, or loaded once from disk by the service. It is read-only after
//! that and shared by reference with the flattener and the linker.

mod build;
mod search;
mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use build::build_index;
pub use search::{lookup_citation, parse_citation_query, CitationLookup, TitleShard};

/// Where a document is stored and rendered, and what it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Relative path of the source XML.
    pub source: String,
    /// Relative path of the rendered page.
    pub output: String,
    /// Display title of the page.
    pub title: String,
    /// First and last section number the page itself stands for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<(String, String)>,
}

/// Direction for sibling navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Which end of a section range to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Start,
    End,
}

/// One step of breadcrumb navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub id: String,
    pub title: String,
    pub output: String,
}

/// Id → location, parent and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    locations: BTreeMap<String, Location>,
    parents: BTreeMap<String, String>,
    children: BTreeMap<String, Vec<String>>,
}

impl SectionIndex {
    /// Record where a document lives.
    pub fn insert_location(&mut self, id: impl Into<String>, location: Location) {
        self.locations.insert(id.into(), location);
    }

    /// Record an include edge, appending `child` to `parent`'s children.
    pub fn insert_edge(&mut self, parent: &str, child: &str) {
        self.parents.insert(child.to_string(), parent.to_string());
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
    }

    #[must_use]
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    #[must_use]
    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    /// Ordered child ids; empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    /// Number of documents with a known location.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of include edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parents.len()
    }

    /// All ids with their locations, in id order.
    pub fn locations(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.locations.iter().map(|(id, loc)| (id.as_str(), loc))
    }

    /// The document nothing includes; the smallest id if there are several.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.locations
            .keys()
            .find(|id| !self.parents.contains_key(*id))
            .map(String::as_str)
    }

    /// Parent chain of `id`, closest first.
    ///
    /// The walk stops after as many steps as there are edges, so a corrupt
    /// index loaded from disk cannot loop forever.
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if chain.len() >= self.parents.len() {
                tracing::warn!(id = %id, "Parent chain longer than the index, stopping");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Ancestors of `id`, root first, with their titles and pages.
    #[must_use]
    pub fn breadcrumbs(&self, id: &str) -> Vec<Breadcrumb> {
        let mut chain = self.ancestors(id);
        chain.reverse();
        chain
            .into_iter()
            .filter_map(|ancestor| {
                self.location(ancestor).map(|location| Breadcrumb {
                    id: ancestor.to_string(),
                    title: location.title.clone(),
                    output: location.output.clone(),
                })
            })
            .collect()
    }

    /// The page before or after `id` in reading order.
    ///
    /// Without an earlier sibling the previous page is the parent. Without a
    /// later sibling the search climbs to the parent's next sibling, and so on
    /// up to the root.
    #[must_use]
    pub fn sibling(&self, id: &str, direction: Direction) -> Option<&str> {
        let mut current = id;
        let mut steps = 0;
        loop {
            let parent = self.parent(current)?;
            let siblings = self.children(parent);
            let position = siblings.iter().position(|s| s == current)?;

            match direction {
                Direction::Previous => {
                    return Some(match position.checked_sub(1) {
                        Some(before) => siblings[before].as_str(),
                        None => parent,
                    });
                }
                Direction::Next => {
                    if let Some(after) = siblings.get(position + 1) {
                        return Some(after.as_str());
                    }
                }
            }

            steps += 1;
            if steps > self.parents.len() {
                return None;
            }
            current = parent;
        }
    }

    /// First or last section reachable below `id`.
    ///
    /// Follows first (or last) children down to a leaf. A section or
    /// placeholder leaf reports its number, or the start or end of its range;
    /// any other leaf reports its title. `None` when `id` has no children.
    #[must_use]
    pub fn section_range(&self, id: &str, end: RangeEnd) -> Option<String> {
        let mut current = id;
        let mut depth = 0;
        loop {
            let children = self.children(current);
            let next = match end {
                RangeEnd::Start => children.first(),
                RangeEnd::End => children.last(),
            };
            let Some(next) = next else { break };
            current = next;
            depth += 1;
            if depth > self.parents.len() {
                return None;
            }
        }

        if depth == 0 {
            return None;
        }

        let location = self.location(current)?;
        Some(match (&location.span, end) {
            (Some((start, _)), RangeEnd::Start) => start.clone(),
            (Some((_, last)), RangeEnd::End) => last.clone(),
            (None, _) => location.title.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn location(id: &str, span: Option<(&str, &str)>) -> Location {
        Location {
            source: format!("{id}.xml"),
            output: format!("{id}.html"),
            title: format!("Title of {id}"),
            span: span.map(|(a, b)| (a.to_string(), b.to_string())),
        }
    }

    /// root → [A, B, C]; B → [B1, B2]
    fn sample() -> SectionIndex {
        let mut index = SectionIndex::default();
        for id in ["root", "A", "B", "C", "B1", "B2"] {
            index.insert_location(id, location(id, None));
        }
        index.insert_edge("root", "A");
        index.insert_edge("root", "B");
        index.insert_edge("root", "C");
        index.insert_edge("B", "B1");
        index.insert_edge("B", "B2");
        index
    }

    #[test]
    fn test_ancestors_and_breadcrumbs() {
        let index = sample();
        assert_eq!(index.ancestors("B2"), vec!["B", "root"]);
        assert!(index.ancestors("root").is_empty());

        let crumbs: Vec<String> = index.breadcrumbs("B2").into_iter().map(|b| b.id).collect();
        assert_eq!(crumbs, vec!["root", "B"]);
    }

    #[test]
    fn test_sibling_navigation() {
        let index = sample();
        assert_eq!(index.sibling("B", Direction::Next), Some("C"));
        assert_eq!(index.sibling("A", Direction::Previous), Some("root"));
        assert_eq!(index.sibling("B", Direction::Previous), Some("A"));
        assert_eq!(index.sibling("C", Direction::Next), index.sibling("root", Direction::Next));
        assert_eq!(index.sibling("C", Direction::Next), None);
    }

    #[test]
    fn test_sibling_climbs_to_parent_next() {
        let index = sample();
        assert_eq!(index.sibling("B2", Direction::Next), Some("C"));
        assert_eq!(index.sibling("B1", Direction::Previous), Some("B"));
    }

    #[test]
    fn test_section_range() {
        let mut index = SectionIndex::default();
        index.insert_location("Title-12", location("Title-12", None));
        index.insert_location("Title-12/Chapter-3", location("Title-12/Chapter-3", None));
        index.insert_location("12-301", location("12-301", Some(("12-301", "12-301"))));
        index.insert_location("12-303", location("12-303", Some(("12-303", "12-303"))));
        index.insert_location("12-305", location("12-305", Some(("12-305", "12-305"))));
        index.insert_edge("Title-12", "Title-12/Chapter-3");
        index.insert_edge("Title-12/Chapter-3", "12-301");
        index.insert_edge("Title-12/Chapter-3", "12-303");
        index.insert_edge("Title-12/Chapter-3", "12-305");

        assert_eq!(index.section_range("Title-12", RangeEnd::Start).as_deref(), Some("12-301"));
        assert_eq!(index.section_range("Title-12", RangeEnd::End).as_deref(), Some("12-305"));
        assert_eq!(index.section_range("12-303", RangeEnd::Start), None);
        assert_eq!(index.section_range("12-303", RangeEnd::End), None);
    }

    #[test]
    fn test_section_range_uses_placeholder_span_and_title() {
        let mut index = SectionIndex::default();
        index.insert_location("Title-1", location("Title-1", None));
        index.insert_location("Title-1/1-101-105", location("Title-1/1-101-105", Some(("1-101", "1-105"))));
        index.insert_location("Title-1/Appendix", location("Title-1/Appendix", None));
        index.insert_edge("Title-1", "Title-1/1-101-105");
        index.insert_edge("Title-1", "Title-1/Appendix");

        assert_eq!(index.section_range("Title-1", RangeEnd::Start).as_deref(), Some("1-101"));
        assert_eq!(
            index.section_range("Title-1", RangeEnd::End).as_deref(),
            Some("Title of Title-1/Appendix")
        );
    }

    #[test]
    fn test_root_and_counts() {
        let index = sample();
        assert_eq!(index.root(), Some("root"));
        assert_eq!(index.len(), 6);
        assert_eq!(index.edge_count(), 5);
        assert_eq!(index.children("B"), ["B1".to_string(), "B2".to_string()]);
        assert!(index.children("C").is_empty());
    }
}
