use std::sync::Arc;

use dccode_render::citation::LinkerConfig;
use dccode_render::config::SECTION_INDEX_FILE;
use dccode_render::source::{DocumentSource, FsSource, MemorySource};
use dccode_render::SectionIndex;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SectionIndex>,
    pub source: Arc<dyn DocumentSource>,
    pub linker: Arc<LinkerConfig>,
}

impl AppState {
    pub fn new(index: SectionIndex, source: Arc<dyn DocumentSource>, linker: LinkerConfig) -> Self {
        Self {
            index: Arc::new(index),
            source,
            linker: Arc::new(linker),
        }
    }

    /// Load the index and open the code directory named in `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let index = match &config.index_dir {
            Some(dir) if dir.join(SECTION_INDEX_FILE).exists() => {
                let index = SectionIndex::load(dir)?;
                tracing::info!(pages = index.len(), dir = %dir.display(), "loaded section index");
                index
            }
            Some(dir) => {
                tracing::warn!(dir = %dir.display(), "no section index found, citations will not link");
                SectionIndex::default()
            }
            None => SectionIndex::default(),
        };

        let source: Arc<dyn DocumentSource> = match &config.code_dir {
            Some(dir) => Arc::new(FsSource::new(dir)),
            None => Arc::new(MemorySource::new()),
        };

        let linker = LinkerConfig::default().with_link_root(&config.link_root);
        Ok(Self::new(index, source, linker))
    }
}
