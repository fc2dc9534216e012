//! Table markup.

use crate::citation::{escape_html, Linker};
use crate::types::{Table, TextNode};

/// Render a table as a self-contained HTML blob.
///
/// Cell text goes through the linker like any other body text.
pub fn table_markup(table: &Table, linker: &Linker<'_>) -> String {
    let mut html = String::from("<table>");

    if let Some(caption) = &table.caption {
        html.push_str("<caption>");
        html.push_str(&inline_markup(caption, linker));
        html.push_str("</caption>");
    }

    for row in &table.rows {
        let tag = if row.heading { "th" } else { "td" };
        html.push_str("<tr>");
        for cell in &row.cells {
            html.push_str(&format!("<{tag}>{}</{tag}>", inline_markup(cell, linker)));
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

/// Mixed content as markup, styled runs wrapped in a `<span>`.
pub fn inline_markup(text: &TextNode, linker: &Linker<'_>) -> String {
    text.runs
        .iter()
        .map(|run| {
            let linked = linker.escape_and_link(&run.text);
            match &run.style {
                Some(style) => format!("<span style='{}'>{linked}</span>", escape_html(style)),
                None => linked,
            }
        })
        .collect()
}
