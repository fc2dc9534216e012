//! Turns recognized citations into anchors.

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{recognize, Citation, CitationKind};
use crate::config::{
    normalize_link_root, DCREGS_ISSUE_LIST_URL, DCR_MIN_VOLUME, DCR_YEAR_OFFSET, FDSYS_LINK_URL,
    GOVTRACK_SEARCH_URL, OPENLIMS_URL, PRIOR_CODIFICATION_LOOKBEHIND, PRIOR_CODIFICATION_PATTERN,
    STAT_MIN_VOLUME,
};
use crate::error::Result;
use crate::index::SectionIndex;

#[allow(clippy::expect_used)] // Pattern constant is tested in config
static PRIOR_CODIFICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRIOR_CODIFICATION_PATTERN).expect("valid regex"));

/// Escape the characters that are significant in HTML.
///
/// # Examples
/// ```
/// use dccode_render::citation::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
///            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Tunables of the linker.
#[derive(Debug, Clone)]
pub struct LinkerConfig {
    /// Prefix of internal links, normalized to `""` or `/path`.
    pub link_root: String,
    /// Phrase that marks an internal citation as pointing at an old edition.
    pub prior_codification: Regex,
    /// Characters before a citation searched for `prior_codification`.
    pub lookbehind: usize,
    pub dcr_min_volume: u32,
    pub stat_min_volume: u32,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            link_root: String::new(),
            prior_codification: PRIOR_CODIFICATION.clone(),
            lookbehind: PRIOR_CODIFICATION_LOOKBEHIND,
            dcr_min_volume: DCR_MIN_VOLUME,
            stat_min_volume: STAT_MIN_VOLUME,
        }
    }
}

impl LinkerConfig {
    /// Set the internal link prefix.
    #[must_use]
    pub fn with_link_root(mut self, root: &str) -> Self {
        self.link_root = normalize_link_root(root);
        self
    }

    /// Replace the prior-codification phrase and its search window.
    pub fn with_prior_codification(mut self, pattern: &str, lookbehind: usize) -> Result<Self> {
        self.prior_codification = Regex::new(pattern)?;
        self.lookbehind = lookbehind;
        Ok(self)
    }
}

/// Links citations in escaped text against a section index.
#[derive(Debug, Clone, Copy)]
pub struct Linker<'a> {
    index: &'a SectionIndex,
    config: &'a LinkerConfig,
}

impl<'a> Linker<'a> {
    pub fn new(index: &'a SectionIndex, config: &'a LinkerConfig) -> Self {
        Self { index, config }
    }

    /// Replace every resolvable citation in already escaped text with an anchor.
    ///
    /// Text that is not part of a linked citation is returned unchanged.
    pub fn link(&self, escaped: &str) -> String {
        let citations = recognize(escaped, self.config.lookbehind);
        if citations.is_empty() {
            return escaped.to_string();
        }

        let mut out = String::with_capacity(escaped.len());
        let mut last = 0;
        for citation in &citations {
            let Some(href) = self.href(citation) else {
                continue;
            };
            out.push_str(&escaped[last..citation.start]);
            out.push_str(&format!(
                "<a href='{href}'>{}</a>",
                display_text(citation)
            ));
            last = citation.end;
        }
        out.push_str(&escaped[last..]);
        out
    }

    /// Escape raw text, then link it.
    pub fn escape_and_link(&self, raw: &str) -> String {
        self.link(&escape_html(raw))
    }

    /// Target of a citation, or `None` when it stays plain text.
    pub fn href(&self, citation: &Citation) -> Option<String> {
        match &citation.kind {
            CitationKind::CodeSection { .. } => {
                if self.config.prior_codification.is_match(&citation.excerpt) {
                    tracing::trace!(citation = %citation.matched, "Prior codification, not linking");
                    return None;
                }
                let id = citation.kind.section_id()?;
                let location = self.index.location(&id)?;
                Some(format!("{}/{}", self.config.link_root, location.output))
            }
            CitationKind::DcLaw { period, number } => {
                Some(format!("{OPENLIMS_URL}/L{period}-{number}.pdf"))
            }
            CitationKind::FederalLaw {
                law_type,
                congress,
                number,
            } => {
                let query = format!("{law_type} law {congress}-{number}");
                Some(format!(
                    "{GOVTRACK_SEARCH_URL}?q={}",
                    urlencoding::encode(&query)
                ))
            }
            CitationKind::Register { volume, .. } => {
                let volume: u32 = volume.parse().ok()?;
                if volume < self.config.dcr_min_volume {
                    return None;
                }
                let year = volume.checked_add(DCR_YEAR_OFFSET)?;
                Some(format!("{DCREGS_ISSUE_LIST_URL}?IssueYear={year}"))
            }
            CitationKind::Statute { volume, page } => {
                let number: u32 = volume.parse().ok()?;
                if number < self.config.stat_min_volume {
                    return None;
                }
                Some(format!(
                    "{FDSYS_LINK_URL}?collection=statute&amp;volume={volume}&amp;page={page}"
                ))
            }
        }
    }
}

/// Anchor text; internal section citations must not wrap inside the number.
fn display_text(citation: &Citation) -> String {
    match citation.kind {
        CitationKind::CodeSection { .. } => citation
            .matched
            .replace("§ ", "§&nbsp;")
            .replace('-', "&#8209;"),
        _ => citation.matched.clone(),
    }
}
