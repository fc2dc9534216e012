use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ServerError;

/// Listen address when `RENDER_ADDR` is not set.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8001";

/// Relative path assumed for a document posted without one.
pub const DEFAULT_DOCUMENT_PATH: &str = "index.xml";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Base directory includes are resolved against.
    pub code_dir: Option<PathBuf>,
    /// Directory holding the section index.
    pub index_dir: Option<PathBuf>,
    pub link_root: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("RENDER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|_| ServerError::Config(format!("RENDER_ADDR is not an address: {raw_addr}")))?;

        let code_dir = lookup("CODE_DIR").filter(|v| !v.is_empty()).map(PathBuf::from);
        let index_dir = lookup("INDEX_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| code_dir.clone());

        if code_dir.is_none() {
            tracing::warn!("CODE_DIR is not set, includes cannot be resolved");
        }

        Ok(Self {
            addr,
            code_dir,
            index_dir,
            link_root: lookup("LINK_ROOT").unwrap_or_default(),
        })
    }
}
