//! Citation search over the per-title shards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::store::read_json;
use crate::config::BY_TITLE_DIR;
use crate::error::{RenderError, Result};

/// Section numbers of one title mapped to their pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleShard {
    pub sec: BTreeMap<String, String>,
}

/// Outcome of a citation search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationLookup {
    /// The query has no `TITLE-SECTION` shape.
    NotACitation,
    /// Well-formed, but no such section.
    NotFound,
    /// Output location of the section.
    Found(String),
}

/// Shard name for the title part of a section number.
pub(super) fn shard_key(title: &str) -> String {
    title.replace(':', "-")
}

/// Split a user query like `§ 50-102` into shard name and local number.
///
/// # Examples
/// ```
/// use dccode_render::index::parse_citation_query;
///
/// assert_eq!(parse_citation_query("§ 50-102"), Some(("50".to_string(), "102".to_string())));
/// assert_eq!(parse_citation_query("28:9-101"), Some(("28-9".to_string(), "101".to_string())));
/// assert_eq!(parse_citation_query("chapter five"), None);
/// ```
#[must_use]
pub fn parse_citation_query(query: &str) -> Option<(String, String)> {
    let compact: String = query
        .chars()
        .filter(|c| *c != '§' && !c.is_whitespace())
        .collect();
    let (title, section) = compact.split_once('-')?;
    if title.is_empty() || section.is_empty() {
        return None;
    }
    Some((shard_key(title), section.to_string()))
}

/// Resolve a citation through the shards stored under `index_dir`.
pub fn lookup_citation(index_dir: &Path, query: &str) -> Result<CitationLookup> {
    let Some((title, section)) = parse_citation_query(query) else {
        return Ok(CitationLookup::NotACitation);
    };
    if title.contains(['/', '\\', '.']) {
        return Err(RenderError::InvalidInput(format!(
            "'{title}' is not a title number"
        )));
    }

    let shard_path = index_dir.join(BY_TITLE_DIR).join(format!("{title}.json"));
    if !shard_path.exists() {
        tracing::debug!(title = %title, "No shard for title");
        return Ok(CitationLookup::NotFound);
    }

    let shard: TitleShard = read_json(&shard_path)?;
    Ok(match shard.sec.get(&section) {
        Some(output) => CitationLookup::Found(output.clone()),
        None => CitationLookup::NotFound,
    })
}
