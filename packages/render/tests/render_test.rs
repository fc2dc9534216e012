//! End-to-end tests over a small code tree.
//!
//! The fixture under `tests/fixtures/code` is a document root including one
//! title, which includes one chapter holding two sections.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use dccode_render::batch::{discover, render_all, BatchConfig};
use dccode_render::citation::LinkerConfig;
use dccode_render::index::{build_index, lookup_citation, CitationLookup, Direction, RangeEnd};
use dccode_render::source::FsSource;
use dccode_render::types::{Group, ParagraphClass};
use dccode_render::{Body, FlattenOptions, Flattener, SectionIndex};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("code")
}

fn fixture_index() -> SectionIndex {
    build_index(&FsSource::new(fixture_dir()), "index.xml").expect("fixture index builds")
}

/// Copy the fixture tree so rendering can write next to the sources.
fn copy_fixtures(to: &Path) {
    for file in discover(&fixture_dir(), None).unwrap() {
        let target = to.join(&file);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::copy(fixture_dir().join(&file), target).unwrap();
    }
}

fn body_of(relative: &str, index: &SectionIndex, linker: &LinkerConfig) -> Body {
    let source = FsSource::new(fixture_dir());
    let options = FlattenOptions::default();
    let flattener = Flattener::new(&source, index, linker, &options);
    let root = dccode_render::xml::parse_document(&source.read(relative).unwrap()).unwrap();
    Body::build(&flattener, &root, relative).unwrap()
}

#[test]
fn test_index_covers_tree() {
    let index = fixture_index();

    assert_eq!(index.len(), 5);
    assert_eq!(index.edge_count(), 4);
    assert_eq!(index.root(), Some("index"));
    assert_eq!(index.parent("1-101"), Some("Title-1/Chapter-1/index"));
    assert_eq!(
        index.location("1-102").map(|l| l.output.as_str()),
        Some("Title-1/Chapter-1/1-102.html")
    );
}

#[test]
fn test_index_navigation() {
    let index = fixture_index();

    assert_eq!(index.sibling("1-101", Direction::Next), Some("1-102"));
    assert_eq!(
        index.sibling("1-101", Direction::Previous),
        Some("Title-1/Chapter-1/index")
    );
    assert_eq!(index.sibling("1-102", Direction::Next), None);

    assert_eq!(
        index.section_range("Title-1/index", RangeEnd::Start).as_deref(),
        Some("1-101")
    );
    assert_eq!(
        index.section_range("Title-1/index", RangeEnd::End).as_deref(),
        Some("1-102")
    );

    let crumbs: Vec<String> = index.breadcrumbs("1-102").into_iter().map(|b| b.title).collect();
    assert_eq!(
        crumbs,
        vec![
            "Code of the District of Columbia",
            "Title 1. Government Organization",
            "Chapter 1. General Provisions",
        ]
    );
}

#[test]
fn test_saved_index_answers_citations() {
    let dir = TempDir::new().unwrap();
    let index = fixture_index();
    index.save(dir.path()).unwrap();

    assert_eq!(SectionIndex::load(dir.path()).unwrap(), index);
    assert_eq!(
        lookup_citation(dir.path(), "§ 1-101").unwrap(),
        CitationLookup::Found("Title-1/Chapter-1/1-101.html".to_string())
    );
    assert_eq!(lookup_citation(dir.path(), "§ 1-999").unwrap(), CitationLookup::NotFound);
    assert_eq!(lookup_citation(dir.path(), "hello").unwrap(), CitationLookup::NotACitation);
}

#[test]
fn test_section_page_links_citations() {
    let index = fixture_index();
    let linker = LinkerConfig::default().with_link_root("/dc");
    let body = body_of("Title-1/Chapter-1/1-101.xml", &index, &linker);

    assert_eq!(body.title, "§ 1-101. Definitions");

    let paragraphs: Vec<_> = body.groups.iter().flat_map(|g| &g.paragraphs).collect();
    let first = paragraphs[0].text();
    assert!(first.starts_with("(a) (1) The term &quot;District&quot;"));
    assert!(first.contains(
        "<a href='/dc/Title-1/Chapter-1/1-102.html'>§&nbsp;1&#8209;102</a>"
    ));
    assert_eq!(paragraphs[0].indentation, 0);

    let second = paragraphs[1].text();
    assert!(second.starts_with("(2) "));
    assert!(second.contains("<a href='http://openlims.org/public/L5-10.pdf'>D.C. Law 5-10</a>"));
    assert!(second.contains("collection=statute&amp;volume=90&amp;page=1234"));

    // The history note cites a superseded edition and stays plain.
    let history = paragraphs.last().unwrap().text();
    assert!(history.contains("§ 1-101"));
    assert!(!history.contains("<a "));

    assert!(body.groups.iter().any(|g| g.group == Group::Annotations));
    let plain = paragraphs.iter().filter(|p| p.class == ParagraphClass::Plain).count();
    assert_eq!(plain, 3);
}

#[test]
fn test_chapter_page_expands_sections() {
    let index = fixture_index();
    let body = body_of("Title-1/Chapter-1/index.xml", &index, &LinkerConfig::default());

    let headings: Vec<String> = body
        .groups
        .iter()
        .flat_map(|g| &g.paragraphs)
        .filter(|p| p.class == ParagraphClass::Heading)
        .map(|p| p.text())
        .collect();
    assert_eq!(headings, vec!["§ 1-101. Definitions", "§ 1-102. Scope"]);
}

#[test]
fn test_title_page_links_chapter() {
    let index = fixture_index();
    let body = body_of("Title-1/index.xml", &index, &LinkerConfig::default());

    let links: Vec<_> = body
        .groups
        .iter()
        .flat_map(|g| &g.paragraphs)
        .filter_map(|p| p.link.as_ref())
        .collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "Title-1/Chapter-1/index.html");
    assert_eq!(links[0].title, "Chapter 1. General Provisions");
    assert_eq!(
        links[0].section_range,
        (Some("1-101".to_string()), Some("1-102".to_string()))
    );
}

#[test]
fn test_batch_renders_every_page() {
    let dir = TempDir::new().unwrap();
    copy_fixtures(dir.path());

    let index = build_index(&FsSource::new(dir.path()), "index.xml").unwrap();
    let mut config = BatchConfig::new(dir.path());
    config.workers = 2;
    let files = discover(dir.path(), None).unwrap();

    let report = render_all(&config, &index, &files, |_| {}).unwrap();
    assert_eq!(report.rendered, 5);
    assert!(report.is_success());

    let page = fs::read_to_string(dir.path().join("Title-1/Chapter-1/1-101.html")).unwrap();
    assert!(page.contains("<title>§ 1-101. Definitions</title>"));
    assert!(page.contains("<a class=\"next\" href='/Title-1/Chapter-1/1-102.html'>"));
    assert!(page.contains("<div class=\"group annotations\">"));
}
