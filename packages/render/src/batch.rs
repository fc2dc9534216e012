//! Batch rendering of a whole code directory on a fixed worker pool.
//!
//! Files are dealt to workers by a checksum of their relative path, so a
//! given file always lands on the same worker for a given pool size. Workers
//! share the read-only index and write disjoint output files. A failing file
//! is recorded and the rest of the batch carries on.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;
use walkdir::WalkDir;

use crate::citation::LinkerConfig;
use crate::config::{output_path_for, validate_worker_count, SKIPPED_DIRS, SOURCE_EXTENSION};
use crate::error::{RenderError, Result};
use crate::flatten::{FlattenOptions, Flattener};
use crate::index::SectionIndex;
use crate::render::{render_body, render_page, Body, Navigation};
use crate::source::FsSource;
use crate::title::file_id;
use crate::xml::parse_document;

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Code directory holding the source XML.
    pub basedir: PathBuf,
    /// Where rendered pages are written; mirrors the source layout.
    pub output_dir: PathBuf,
    /// Only render files whose relative path matches.
    pub filter: Option<Regex>,
    pub workers: usize,
    pub linker: LinkerConfig,
    pub options: FlattenOptions,
}

impl BatchConfig {
    /// Render `basedir` in place with one worker per available core.
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        let basedir = basedir.into();
        Self {
            output_dir: basedir.clone(),
            basedir,
            filter: None,
            workers: default_workers(),
            linker: LinkerConfig::default(),
            options: FlattenOptions::default(),
        }
    }
}

/// Number of workers when none is requested.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// A file that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: String,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub rendered: usize,
    /// XML files that are not code pages.
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.rendered + self.skipped + self.failures.len()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn recorded failures into an error.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RenderError::BatchFailed {
                failed: self.failures.len(),
                total: self.total(),
            })
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.rendered += other.rendered;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
        self
    }
}

enum FileOutcome {
    Rendered,
    Skipped,
}

/// Worker a file belongs to: byte sum of its relative path modulo `workers`.
///
/// # Examples
/// ```
/// use dccode_render::batch::partition;
///
/// assert_eq!(partition("ab", 4), (97 + 98) % 4);
/// assert_eq!(partition("anything.xml", 1), 0);
/// ```
#[must_use]
pub fn partition(relative: &str, workers: usize) -> usize {
    let sum = relative
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_add(usize::from(b)));
    sum % workers.max(1)
}

/// Relative paths of all source documents under `basedir`, sorted.
pub fn discover(basedir: &Path, filter: Option<&Regex>) -> Result<Vec<String>> {
    let source = FsSource::new(basedir);
    let mut files = Vec::new();

    let walker = WalkDir::new(basedir).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && SKIPPED_DIRS.iter().any(|skip| entry.file_name() == *skip))
    });

    for entry in walker {
        let entry = entry.map_err(|e| RenderError::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION)
        {
            continue;
        }

        let relative = source.relative_path(path)?;
        if filter.is_some_and(|re| !re.is_match(&relative)) {
            continue;
        }
        files.push(relative);
    }

    files.sort();
    Ok(files)
}

/// Render every file on a pool of `config.workers` threads.
///
/// `progress` is called once per finished file from the worker threads.
pub fn render_all<F>(
    config: &BatchConfig,
    index: &SectionIndex,
    files: &[String],
    progress: F,
) -> Result<BatchReport>
where
    F: Fn(&str) + Sync,
{
    validate_worker_count(config.workers)?;

    let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); config.workers];
    for file in files {
        buckets[partition(file, config.workers)].push(file);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| RenderError::InvalidInput(format!("cannot start worker pool: {e}")))?;

    tracing::info!(
        files = files.len(),
        workers = config.workers,
        "Rendering code"
    );

    let report = pool.install(|| {
        buckets
            .par_iter()
            .enumerate()
            .map(|(worker, bucket)| run_worker(config, index, worker, bucket, &progress))
            .reduce(BatchReport::default, BatchReport::merge)
    });

    Ok(report)
}

fn run_worker<F>(
    config: &BatchConfig,
    index: &SectionIndex,
    worker: usize,
    files: &[&str],
    progress: &F,
) -> BatchReport
where
    F: Fn(&str) + Sync,
{
    let source = FsSource::new(&config.basedir);
    let flattener = Flattener::new(&source, index, &config.linker, &config.options);
    let mut report = BatchReport::default();

    for file in files {
        match render_file(config, &source, &flattener, index, file) {
            Ok(FileOutcome::Rendered) => report.rendered += 1,
            Ok(FileOutcome::Skipped) => report.skipped += 1,
            Err(e) => {
                tracing::error!(worker, path = %file, error = %e, "Failed to render");
                report.failures.push(BatchFailure {
                    path: (*file).to_string(),
                    error: e.to_string(),
                });
            }
        }
        progress(file);
    }

    tracing::debug!(worker, rendered = report.rendered, "Worker finished");
    report
}

fn render_file(
    config: &BatchConfig,
    source: &FsSource,
    flattener: &Flattener<'_>,
    index: &SectionIndex,
    relative: &str,
) -> Result<FileOutcome> {
    let root = match parse_document(&source.read(relative)?) {
        Ok(root) => root,
        Err(RenderError::NotALevel(tag)) => {
            tracing::debug!(path = %relative, root = %tag, "Not a code page, skipping");
            return Ok(FileOutcome::Skipped);
        }
        Err(e) => return Err(e),
    };

    let body = Body::build(flattener, &root, relative)?;
    let nav = Navigation::for_page(index, &file_id(&root, relative)?);
    let link_root = &config.linker.link_root;
    let html = render_page(&body.title, &render_body(&body.groups, link_root), &nav, link_root);

    let output = config.output_dir.join(output_path_for(relative));
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, html)?;

    tracing::debug!(path = %relative, output = %output.display(), "Rendered page");
    Ok(FileOutcome::Rendered)
}
