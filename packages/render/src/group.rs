//! Clusters paragraphs into runs of the same group.

use serde::Serialize;

use crate::types::{Group, Paragraph};

/// Consecutive paragraphs sharing a group, rendered in one `<div>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphGroup {
    pub group: Group,
    pub paragraphs: Vec<Paragraph>,
}

/// Split the paragraph stream wherever the group changes.
///
/// Order is preserved and no group is empty.
pub fn group_paragraphs(paragraphs: Vec<Paragraph>) -> Vec<ParagraphGroup> {
    let mut groups: Vec<ParagraphGroup> = Vec::new();

    for paragraph in paragraphs {
        match groups.last_mut() {
            Some(current) if current.group == paragraph.group => current.paragraphs.push(paragraph),
            _ => groups.push(ParagraphGroup {
                group: paragraph.group,
                paragraphs: vec![paragraph],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParagraphClass, Span, SpanClass};
    use pretty_assertions::assert_eq;

    fn para(text: &str, group: Group) -> Paragraph {
        Paragraph::spans(
            vec![Span::new(text, SpanClass::Text)],
            0,
            group,
            ParagraphClass::Plain,
        )
    }

    #[test]
    fn test_groups_contiguous_runs() {
        let groups = group_paragraphs(vec![
            para("a", Group::Reset),
            para("b", Group::Reset),
            para("c", Group::Annotations),
            para("d", Group::Annotations),
            para("e", Group::Reset),
        ]);

        let shape: Vec<(Group, usize)> = groups.iter().map(|g| (g.group, g.paragraphs.len())).collect();
        assert_eq!(
            shape,
            vec![(Group::Reset, 2), (Group::Annotations, 2), (Group::Reset, 1)]
        );
        assert_eq!(groups[2].paragraphs[0].text(), "e");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_paragraphs(Vec::new()).is_empty());
    }
}
