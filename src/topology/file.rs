//! File-backed topology source.
//!
//! URIs are resolved against a root directory the way a static web server
//! resolves request paths: `/geo/countries-110m.json` under root `public`
//! reads `public/geo/countries-110m.json`.

use std::path::{Component, Path, PathBuf};
use async_trait::async_trait;

use super::TopologySource;

/// Error type for the file source.
#[derive(Debug, thiserror::Error)]
pub enum FileSourceError {
    /// The URI escapes the root directory.
    #[error("Topology path escapes root: {0}")]
    OutsideRoot(String),
    /// Reading the file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Resolved path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Reads topology documents from a directory tree.
#[derive(Debug, Clone)]
pub struct FileTopologySource {
    root: PathBuf,
}

impl FileTopologySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a URI to a path under the root.
    pub fn resolve(&self, uri: &str) -> Result<PathBuf, FileSourceError> {
        let relative = Path::new(uri.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FileSourceError::OutsideRoot(uri.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl TopologySource for FileTopologySource {
    type Error = FileSourceError;

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, Self::Error> {
        let path = self.resolve(uri)?;
        tokio::fs::read(&path)
            .await
            .map_err(|source| FileSourceError::Io { path, source })
    }
}
