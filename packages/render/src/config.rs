//! Configuration constants and validation functions for the renderer.

use crate::error::{RenderError, Result};

/// File extension of source documents.
pub const SOURCE_EXTENSION: &str = "xml";

/// File extension of rendered pages.
pub const OUTPUT_EXTENSION: &str = "html";

/// Directories never descended into when scanning a code tree.
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Id → location index file.
pub const SECTION_INDEX_FILE: &str = "section_index.json";

/// Id → parent id index file.
pub const PARENTS_INDEX_FILE: &str = "section_parents_index.json";

/// Id → ordered child ids index file.
pub const CHILDREN_INDEX_FILE: &str = "section_children_index.json";

/// Directory holding the per-title lookup shards.
pub const BY_TITLE_DIR: &str = "by_title";

/// Container kinds whose included documents are expanded inline.
pub const DEFAULT_INLINE_KINDS: &[&str] = &["Chapter"];

/// Characters before an internal citation searched for a prior-codification note.
pub const PRIOR_CODIFICATION_LOOKBEHIND: usize = 40;

/// Phrases marking a citation as pointing at a superseded edition of the code.
pub const PRIOR_CODIFICATION_PATTERN: &str =
    r"(?i)prior\s+codifications\s+\d{4}\s+ed\.?,?|\d{4}\s+ed\.,\s*";

/// Register volumes below this are not online.
pub const DCR_MIN_VOLUME: u32 = 57;

/// Register volume + offset = publication year.
pub const DCR_YEAR_OFFSET: u32 = 1953;

/// Statutes at Large volumes below this are not online.
pub const STAT_MIN_VOLUME: u32 = 65;

/// Base URL for D.C. law PDFs.
pub const OPENLIMS_URL: &str = "http://openlims.org/public";

/// Search endpoint used for federal public and private laws.
pub const GOVTRACK_SEARCH_URL: &str = "http://www.govtrack.us/search";

/// D.C. Register issue list, one page per year.
pub const DCREGS_ISSUE_LIST_URL: &str = "http://www.dcregs.dc.gov/Gateway/IssueList.aspx";

/// Statutes at Large lookup service.
pub const FDSYS_LINK_URL: &str = "http://api.fdsys.gov/link";

/// Normalize the URL prefix put in front of internal links.
///
/// # Examples
/// ```
/// use dccode_render::config::normalize_link_root;
///
/// assert_eq!(normalize_link_root("dc-code/"), "/dc-code");
/// assert_eq!(normalize_link_root("/"), "");
/// assert_eq!(normalize_link_root(""), "");
/// ```
pub fn normalize_link_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Validate a worker count given on the command line.
pub fn validate_worker_count(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(RenderError::InvalidInput(
            "worker count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Strip the source extension from a relative path.
///
/// # Examples
/// ```
/// use dccode_render::config::strip_source_extension;
///
/// assert_eq!(strip_source_extension("Title-1/1-101.xml"), "Title-1/1-101");
/// assert_eq!(strip_source_extension("index"), "index");
/// ```
pub fn strip_source_extension(path: &str) -> &str {
    path.strip_suffix(".xml").unwrap_or(path)
}

/// Map a relative source path onto the rendered page path.
///
/// # Examples
/// ```
/// use dccode_render::config::output_path_for;
///
/// assert_eq!(output_path_for("Title-1/1-101.xml"), "Title-1/1-101.html");
/// ```
pub fn output_path_for(source: &str) -> String {
    format!("{}.{OUTPUT_EXTENSION}", strip_source_extension(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_link_root() {
        assert_eq!(normalize_link_root("dc-code-prototype"), "/dc-code-prototype");
        assert_eq!(normalize_link_root("/a/b/"), "/a/b");
        assert_eq!(normalize_link_root("  "), "");
    }

    #[test]
    fn test_validate_worker_count() {
        assert!(validate_worker_count(1).is_ok());
        assert!(validate_worker_count(16).is_ok());
        assert!(validate_worker_count(0).is_err());
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(output_path_for("index.xml"), "index.html");
        assert_eq!(output_path_for("Title-1/Chapter-3/1-301.01.xml"), "Title-1/Chapter-3/1-301.01.html");
        assert_eq!(output_path_for("no-extension"), "no-extension.html");
    }

    #[test]
    fn test_prior_codification_pattern_compiles() {
        let re = regex::Regex::new(PRIOR_CODIFICATION_PATTERN).unwrap();
        assert!(re.is_match("Prior Codifications 1981 Ed., "));
        assert!(re.is_match("1973 Ed., "));
        assert!(!re.is_match("as amended"));
    }
}
