//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use dccode_render::xml::get_tag_name;
///
/// let xml = r#"<level xmlns:xi="http://www.w3.org/2001/XInclude"><xi:include href="a.xml"/></level>"#;
/// let doc = Document::parse(xml).unwrap();
/// let include = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(include), "include");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Concatenated text of a node and all of its descendants, untrimmed.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use dccode_render::xml::full_text;
///
/// let doc = Document::parse("<heading>Duties of <i>the</i> Mayor</heading>").unwrap();
/// assert_eq!(full_text(doc.root_element()), "Duties of the Mayor");
/// ```
pub fn full_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Get the full text content of a node, trimmed.
pub fn get_text(node: Node<'_, '_>) -> String {
    full_text(node).trim().to_string()
}
