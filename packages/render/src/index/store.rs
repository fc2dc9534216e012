//! Reading and writing the index files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::search::{shard_key, TitleShard};
use super::SectionIndex;
use crate::config::{BY_TITLE_DIR, CHILDREN_INDEX_FILE, PARENTS_INDEX_FILE, SECTION_INDEX_FILE};
use crate::error::{RenderError, Result};

impl SectionIndex {
    /// Write the three index files and the per-title shards into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        write_json(&dir.join(SECTION_INDEX_FILE), &self.locations)?;
        write_json(&dir.join(PARENTS_INDEX_FILE), &self.parents)?;
        write_json(&dir.join(CHILDREN_INDEX_FILE), &self.children)?;

        let shards = self.title_shards();
        let shard_dir = dir.join(BY_TITLE_DIR);
        fs::create_dir_all(&shard_dir)?;
        for (title, shard) in &shards {
            write_json(&shard_dir.join(format!("{title}.json")), shard)?;
        }

        tracing::info!(
            dir = %dir.display(),
            documents = self.len(),
            shards = shards.len(),
            "Saved section index"
        );
        Ok(())
    }

    /// Read an index written by [`SectionIndex::save`].
    pub fn load(dir: &Path) -> Result<Self> {
        let index = Self {
            locations: read_json(&dir.join(SECTION_INDEX_FILE))?,
            parents: read_json(&dir.join(PARENTS_INDEX_FILE))?,
            children: read_json(&dir.join(CHILDREN_INDEX_FILE))?,
        };
        tracing::debug!(dir = %dir.display(), documents = index.len(), "Loaded section index");
        Ok(index)
    }

    /// Section numbers grouped by title, for citation search.
    ///
    /// Only pages that stand for exactly one section are listed.
    #[must_use]
    pub fn title_shards(&self) -> BTreeMap<String, TitleShard> {
        let mut shards: BTreeMap<String, TitleShard> = BTreeMap::new();
        for (id, location) in &self.locations {
            let Some((start, end)) = &location.span else {
                continue;
            };
            if start != end || start != id {
                continue;
            }
            let Some((title, local)) = id.split_once('-') else {
                continue;
            };
            shards
                .entry(shard_key(title))
                .or_default()
                .sec
                .insert(local.to_string(), location.output.clone());
        }
        shards
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub(super) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|source| RenderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}
