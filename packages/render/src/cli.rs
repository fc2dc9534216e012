//! Command-line interface for the renderer.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

use crate::batch::{default_workers, discover, render_all, BatchConfig};
use crate::citation::LinkerConfig;
use crate::config::{validate_worker_count, SECTION_INDEX_FILE};
use crate::error::{RenderError, Result};
use crate::index::{build_index, lookup_citation, CitationLookup, SectionIndex};
use crate::source::FsSource;

/// DC Code renderer - flatten legal-code XML into linked HTML pages.
#[derive(Parser)]
#[command(name = "dccode-render")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the section index for a code directory.
    Index {
        /// Code directory
        basedir: PathBuf,

        /// Root document, relative to the code directory
        #[arg(short, long, default_value = "index.xml")]
        root: String,

        /// Index output directory (default: the code directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render every page of a code directory.
    Render {
        /// Code directory
        basedir: PathBuf,

        /// Only render files whose relative path matches this regex
        #[arg(short, long)]
        filter: Option<String>,

        /// Worker threads (default: available cores)
        #[arg(short, long)]
        workers: Option<usize>,

        /// URL prefix for internal links
        #[arg(short, long, default_value = "")]
        link_root: String,

        /// Directory holding the section index (default: the code directory)
        #[arg(short, long)]
        index_dir: Option<PathBuf>,

        /// Output directory (default: next to the sources)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a citation such as "§ 1-101" to its page.
    Lookup {
        /// Code directory
        basedir: PathBuf,

        /// Citation to look up
        citation: String,

        /// Directory holding the section index (default: the code directory)
        #[arg(short, long)]
        index_dir: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { basedir, root, out } => index_command(&basedir, &root, out.as_deref()),
        Commands::Render {
            basedir,
            filter,
            workers,
            link_root,
            index_dir,
            output,
        } => {
            let mut config = BatchConfig::new(&basedir);
            config.filter = filter.as_deref().map(Regex::new).transpose()?;
            config.workers = workers.unwrap_or_else(default_workers);
            config.linker = LinkerConfig::default().with_link_root(&link_root);
            if let Some(output) = output {
                config.output_dir = output;
            }
            render_command(&config, index_dir.as_deref().unwrap_or(&basedir))
        }
        Commands::Lookup {
            basedir,
            citation,
            index_dir,
        } => lookup_command(index_dir.as_deref().unwrap_or(&basedir), &citation),
    }
}

fn require_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(RenderError::InvalidInput(format!(
            "not a directory: {}",
            dir.display()
        )));
    }
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the index command.
fn index_command(basedir: &Path, root: &str, out: Option<&Path>) -> Result<()> {
    require_dir(basedir)?;
    let out = out.unwrap_or(basedir);

    println!(
        "{} {} from {}",
        style("Indexing").bold(),
        style(basedir.display()).cyan(),
        style(root).green()
    );

    let pb = spinner("Walking includes...");
    let index = match build_index(&FsSource::new(basedir), root) {
        Ok(index) => index,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Saving index...");
    let saved = index.save(out);
    pb.finish_and_clear();
    saved?;

    println!("  Pages: {}", index.len());
    println!("  Edges: {}", index.edge_count());
    println!();
    println!("{} {}", style("Saved to:").green().bold(), out.display());

    Ok(())
}

/// Load the index from `dir`, or an empty one when none was built.
fn load_index(dir: &Path) -> Result<SectionIndex> {
    if dir.join(SECTION_INDEX_FILE).exists() {
        SectionIndex::load(dir)
    } else {
        tracing::warn!(dir = %dir.display(), "No section index found, citations will not link");
        Ok(SectionIndex::default())
    }
}

/// Execute the render command.
fn render_command(config: &BatchConfig, index_dir: &Path) -> Result<()> {
    require_dir(&config.basedir)?;
    validate_worker_count(config.workers)?;

    let index = load_index(index_dir)?;
    let files = discover(&config.basedir, config.filter.as_ref())?;

    println!(
        "{} {} pages with {} workers",
        style("Rendering").bold(),
        style(files.len()).cyan(),
        style(config.workers).green()
    );

    let pb = ProgressBar::new(files.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let report = render_all(config, &index, &files, |file| {
        pb.set_message(file.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = report?;

    println!("  Rendered: {}", style(report.rendered).green());
    if report.skipped > 0 {
        println!("  Skipped: {}", report.skipped);
    }
    if !report.is_success() {
        println!("  Failed: {}", style(report.failures.len()).red().bold());
        for failure in &report.failures {
            println!("    {} {}", style(&failure.path).yellow(), failure.error);
        }
    }

    report.into_result().map(|_| ())
}

/// Execute the lookup command.
fn lookup_command(index_dir: &Path, citation: &str) -> Result<()> {
    match lookup_citation(index_dir, citation)? {
        CitationLookup::Found(output) => println!("{output}"),
        CitationLookup::NotFound => {
            return Err(RenderError::InvalidInput(format!(
                "no page for citation: {citation}"
            )))
        }
        CitationLookup::NotACitation => {
            return Err(RenderError::InvalidInput(format!(
                "not a code citation: {citation}"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parse_index() {
        let cli = Cli::parse_from(["dccode-render", "index", "code"]);

        let Commands::Index { basedir, root, out } = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(basedir, PathBuf::from("code"));
        assert_eq!(root, "index.xml");
        assert!(out.is_none());
    }

    #[test]
    fn test_cli_parse_render_with_options() {
        let cli = Cli::parse_from([
            "dccode-render",
            "render",
            "code",
            "--filter",
            "^Title-1/",
            "--workers",
            "4",
            "--link-root",
            "/dc/council/code",
        ]);

        let Commands::Render {
            filter,
            workers,
            link_root,
            index_dir,
            ..
        } = cli.command
        else {
            panic!("expected render command");
        };
        assert_eq!(filter.as_deref(), Some("^Title-1/"));
        assert_eq!(workers, Some(4));
        assert_eq!(link_root, "/dc/council/code");
        assert!(index_dir.is_none());
    }

    #[test]
    fn test_cli_parse_lookup() {
        let cli = Cli::parse_from(["dccode-render", "lookup", "code", "§ 1-101"]);

        let Commands::Lookup { citation, .. } = cli.command else {
            panic!("expected lookup command");
        };
        assert_eq!(citation, "§ 1-101");
    }

    #[test]
    fn test_load_index_missing_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_index(dir.path()).unwrap().is_empty());
    }
}
