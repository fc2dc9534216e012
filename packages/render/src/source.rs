//! Where documents come from: the code directory, memory, or in-flight edits.
//!
//! Paths are always relative to the code's base directory and use `/`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::types::DocNode;
use crate::xml::parse_document;

/// Loads parsed documents by relative path.
pub trait DocumentSource: Send + Sync {
    /// Load and parse the document at `relative`.
    fn load(&self, relative: &str) -> Result<DocNode>;
}

/// Documents stored under a base directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    basedir: PathBuf,
}

impl FsSource {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }

    #[must_use]
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Express a path below the base directory as a relative `/` path.
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(&self.basedir)
            .map_err(|_| RenderError::OutsideBaseDir {
                path: path.to_path_buf(),
                basedir: self.basedir.clone(),
            })?;

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }

    /// Read a document's raw XML.
    ///
    /// Absolute paths and paths climbing above the base directory are refused.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.basedir.join(checked_relative(relative)?);
        std::fs::read_to_string(&path).map_err(|source| RenderError::Read { path, source })
    }
}

impl DocumentSource for FsSource {
    fn load(&self, relative: &str) -> Result<DocNode> {
        tracing::trace!(path = %relative, "Loading document");
        parse_document(&self.read(relative)?)
    }
}

/// Documents held in memory, keyed by normalized relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, DocNode>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every `path → XML` pair.
    pub fn from_xml<I, K, V>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut source = Self::new();
        for (path, xml) in documents {
            source.insert(path.as_ref(), parse_document(xml.as_ref())?);
        }
        Ok(source)
    }

    pub fn insert(&mut self, relative: &str, node: DocNode) {
        self.documents.insert(normalize_path(relative), node);
    }

    #[must_use]
    pub fn contains(&self, relative: &str) -> bool {
        self.documents.contains_key(&normalize_path(relative))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, relative: &str) -> Result<DocNode> {
        self.documents
            .get(&normalize_path(relative))
            .cloned()
            .ok_or_else(|| RenderError::Read {
                path: PathBuf::from(relative),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "document not available"),
            })
    }
}

/// Unsaved edits layered over another source.
pub struct OverrideSource<'a> {
    overrides: &'a MemorySource,
    fallback: &'a dyn DocumentSource,
}

impl<'a> OverrideSource<'a> {
    pub fn new(overrides: &'a MemorySource, fallback: &'a dyn DocumentSource) -> Self {
        Self {
            overrides,
            fallback,
        }
    }
}

impl DocumentSource for OverrideSource<'_> {
    fn load(&self, relative: &str) -> Result<DocNode> {
        if self.overrides.contains(relative) {
            self.overrides.load(relative)
        } else {
            self.fallback.load(relative)
        }
    }
}

/// Resolve an include href against the path of the including document.
///
/// Both paths must stay inside the base directory.
///
/// # Examples
/// ```
/// use dccode_render::source::resolve_include;
///
/// assert_eq!(resolve_include("Title-1/index.xml", "Chapter-3/index.xml").unwrap(), "Title-1/Chapter-3/index.xml");
/// assert_eq!(resolve_include("Title-1/Chapter-3/index.xml", "../1-101.xml").unwrap(), "Title-1/1-101.xml");
/// ```
pub fn resolve_include(including: &str, href: &str) -> Result<String> {
    if is_absolute(href) {
        return Err(outside(href));
    }

    let including = checked_relative(including)?;
    match including.rsplit_once('/') {
        Some((dir, _)) => checked_relative(&format!("{dir}/{href}")),
        None => checked_relative(href),
    }
}

/// Normalize a path that must stay inside the base directory.
///
/// A leading `/`, a backslash, or a `..` that climbs above the root is
/// rejected with `OutsideBaseDir`.
///
/// # Examples
/// ```
/// use dccode_render::source::checked_relative;
///
/// assert_eq!(checked_relative("./Title-1/../Title-1/1-101.xml").unwrap(), "Title-1/1-101.xml");
/// assert!(checked_relative("../secret.xml").is_err());
/// assert!(checked_relative("/etc/passwd").is_err());
/// ```
pub fn checked_relative(relative: &str) -> Result<String> {
    if is_absolute(relative) {
        return Err(outside(relative));
    }

    let mut parts: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(outside(relative));
                }
            }
            other => parts.push(other),
        }
    }
    Ok(parts.join("/"))
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.contains('\\') || Path::new(path).is_absolute()
}

fn outside(path: &str) -> RenderError {
    RenderError::OutsideBaseDir {
        path: PathBuf::from(path),
        basedir: PathBuf::from("."),
    }
}

/// Canonical form of a relative path: no `.` segments, no leading `./` or `/`.
pub fn normalize_path(relative: &str) -> String {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_include() {
        assert_eq!(resolve_include("index.xml", "Title-1/index.xml").unwrap(), "Title-1/index.xml");
        assert_eq!(
            resolve_include("Title-1/index.xml", "./1-101.xml").unwrap(),
            "Title-1/1-101.xml"
        );
        assert!(resolve_include("index.xml", "../outside.xml").is_err());
    }

    #[test]
    fn test_resolve_include_checks_including_path() {
        for including in ["../x.xml", "/tmp/code/x.xml", "Title-1/../../x.xml"] {
            let err = resolve_include(including, "secret.xml").unwrap_err();
            assert!(matches!(err, RenderError::OutsideBaseDir { .. }), "{including}");
        }
        assert!(resolve_include("index.xml", "/etc/passwd").is_err());
        assert_eq!(
            resolve_include("./Title-1/index.xml", "1-101.xml").unwrap(),
            "Title-1/1-101.xml"
        );
    }

    #[test]
    fn test_fs_source_stays_inside_basedir() {
        let outer = TempDir::new().unwrap();
        let code = outer.path().join("code");
        fs::create_dir_all(&code).unwrap();
        let secret = outer.path().join("secret.xml");
        fs::write(&secret, "<level><num>SECRET</num></level>").unwrap();

        let source = FsSource::new(&code);
        for relative in ["../secret.xml", secret.to_str().unwrap()] {
            let err = source.load(relative).unwrap_err();
            assert!(matches!(err, RenderError::OutsideBaseDir { .. }), "{relative}");
        }
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./Title-1//1-101.xml"), "Title-1/1-101.xml");
        assert_eq!(normalize_path("/index.xml"), "index.xml");
    }

    #[test]
    fn test_fs_source_loads_documents() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Title-1")).unwrap();
        fs::write(
            dir.path().join("Title-1/1-101.xml"),
            "<level><type>Section</type><num>1-101</num></level>",
        )
        .unwrap();

        let source = FsSource::new(dir.path());
        let node = source.load("Title-1/1-101.xml").unwrap();
        assert_eq!(node.num.as_deref(), Some("1-101"));

        let err = source.load("Title-1/missing.xml").unwrap_err();
        assert!(matches!(err, RenderError::Read { .. }));
    }

    #[test]
    fn test_fs_source_relative_path() {
        let source = FsSource::new("/code");
        assert_eq!(
            source.relative_path(Path::new("/code/Title-1/1-101.xml")).unwrap(),
            "Title-1/1-101.xml"
        );
        assert!(source.relative_path(Path::new("/elsewhere/a.xml")).is_err());
    }

    #[test]
    fn test_override_source_prefers_overrides() {
        let mut base = MemorySource::new();
        base.insert("a.xml", DocNode::level().with_num("base"));
        base.insert("b.xml", DocNode::level().with_num("untouched"));

        let overrides =
            MemorySource::from_xml([("./a.xml", "<level><num>edited</num></level>")]).unwrap();
        let layered = OverrideSource::new(&overrides, &base);

        assert_eq!(layered.load("a.xml").unwrap().num.as_deref(), Some("edited"));
        assert_eq!(layered.load("b.xml").unwrap().num.as_deref(), Some("untouched"));
        assert!(layered.load("c.xml").is_err());
    }
}
