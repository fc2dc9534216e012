//! Citation grammars and the recognizer.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `§ 1-301.01`, `§§ 47-1801.04(a)(2)`, `§ 28:9-101`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CODE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"§§?\s*(?P<title>\d+[A-Z]?(?::\d+)?)\s?-\s?(?P<section>\d+[A-Za-z]?(?:[.:]\d+[A-Za-z]*)*)(?:\([A-Za-z0-9]+\))*",
    )
    .expect("valid regex")
});

/// `D.C. Law 20-17`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DC_LAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"D\.\s?C\.\s+Law\s+(?P<period>\d+)-(?P<number>\d+)").expect("valid regex")
});

/// `Pub. L. 111-148`, `Public Law 111-148`, `Pub. L. No. 90-623`, `Private Law 85-12`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FEDERAL_LAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<type>pub(?:lic)?|priv(?:ate)?)\.?\s*l(?:aw)?\.?\s*(?:no\.?\s*)?(?P<congress>\d+)[-–](?P<number>\d+)",
    )
    .expect("valid regex")
});

/// `57 DCR 1234`, `60 D.C. Reg. 9`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REGISTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<volume>\d+)\s+(?:DCR|D\.\s?C\.\s+Reg\.?)\s+(?P<page>\d+)").expect("valid regex")
});

/// `84 Stat. 473`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STATUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<volume>\d+)\s+Stat\.?\s+(?P<page>\d+)").expect("valid regex")
});

/// Parsed fields of a recognized citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationKind {
    /// A section of this code, identified as `title-section`.
    CodeSection { title: String, section: String },
    /// A D.C. law by council period and number.
    DcLaw { period: String, number: String },
    /// A federal public or private law.
    FederalLaw {
        law_type: String,
        congress: String,
        number: String,
    },
    /// A D.C. Register notice.
    Register { volume: String, page: String },
    /// A Statutes at Large citation.
    Statute { volume: String, page: String },
}

impl CitationKind {
    /// Section index id for internal code citations.
    #[must_use]
    pub fn section_id(&self) -> Option<String> {
        match self {
            Self::CodeSection { title, section } => Some(format!("{title}-{section}")),
            _ => None,
        }
    }
}

/// A citation found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub kind: CitationKind,
    /// The matched substring.
    pub matched: String,
    /// Byte offsets of the match in the scanned text.
    pub start: usize,
    pub end: usize,
    /// Text immediately before the match, at most the lookbehind window.
    pub excerpt: String,
}

/// Find all citations in `text`, in order and without overlaps.
///
/// When two matches overlap the one starting first wins; on equal starts the
/// longer match wins.
///
/// # Examples
/// ```
/// use dccode_render::citation::{recognize, CitationKind};
///
/// let found = recognize("See 84 Stat. 473 and § 1-101.", 40);
/// assert_eq!(found.len(), 2);
/// assert!(matches!(found[0].kind, CitationKind::Statute { .. }));
/// assert_eq!(found[1].matched, "§ 1-101");
/// ```
#[must_use]
pub fn recognize(text: &str, lookbehind: usize) -> Vec<Citation> {
    let mut candidates: Vec<(usize, usize, CitationKind)> = Vec::new();

    collect(&CODE_SECTION, text, &mut candidates, |c| CitationKind::CodeSection {
        title: c["title"].to_string(),
        section: c["section"].to_string(),
    });
    collect(&DC_LAW, text, &mut candidates, |c| CitationKind::DcLaw {
        period: c["period"].to_string(),
        number: c["number"].to_string(),
    });
    collect(&FEDERAL_LAW, text, &mut candidates, |c| CitationKind::FederalLaw {
        law_type: normalize_law_type(&c["type"]).to_string(),
        congress: c["congress"].to_string(),
        number: c["number"].to_string(),
    });
    collect(&REGISTER, text, &mut candidates, |c| CitationKind::Register {
        volume: c["volume"].to_string(),
        page: c["page"].to_string(),
    });
    collect(&STATUTE, text, &mut candidates, |c| CitationKind::Statute {
        volume: c["volume"].to_string(),
        page: c["page"].to_string(),
    });

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut citations = Vec::new();
    let mut last_end = 0;
    for (start, end, kind) in candidates {
        if start < last_end {
            continue;
        }
        citations.push(Citation {
            kind,
            matched: text[start..end].to_string(),
            start,
            end,
            excerpt: tail_chars(&text[..start], lookbehind).to_string(),
        });
        last_end = end;
    }

    citations
}

fn collect(
    pattern: &Regex,
    text: &str,
    out: &mut Vec<(usize, usize, CitationKind)>,
    build: impl Fn(&Captures<'_>) -> CitationKind,
) {
    for caps in pattern.captures_iter(text) {
        if let Some(m) = caps.get(0) {
            out.push((m.start(), m.end(), build(&caps)));
        }
    }
}

fn normalize_law_type(raw: &str) -> &'static str {
    if raw.to_lowercase().starts_with("priv") {
        "private"
    } else {
        "public"
    }
}

/// The last `n` characters of `text`.
pub(crate) fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
