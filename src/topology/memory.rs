//! In-memory topology source.

use std::collections::BTreeMap;
use async_trait::async_trait;

use super::TopologySource;

/// Error type for the in-memory source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StaticSourceError {
    /// No document registered under the URI.
    #[error("Topology document not found: {0}")]
    NotFound(String),
}

/// Serves pre-registered documents by URI.
///
/// Useful for tests and for embedding a topology in the binary.
#[derive(Debug, Clone, Default)]
pub struct StaticTopologySource {
    documents: BTreeMap<String, Vec<u8>>,
}

impl StaticTopologySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document.
    pub fn add_document(&mut self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.documents.insert(uri.into(), bytes.into());
    }

    /// Builder-style [`add_document`](Self::add_document).
    pub fn with_document(mut self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.add_document(uri, bytes);
        self
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document is registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl TopologySource for StaticTopologySource {
    type Error = StaticSourceError;

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, Self::Error> {
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| StaticSourceError::NotFound(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_registered() {
        let source = StaticTopologySource::new().with_document("/geo/a.json", "{}");
        assert_eq!(source.fetch("/geo/a.json").await.unwrap(), b"{}".to_vec());
        assert_eq!(source.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let source = StaticTopologySource::new();
        let err = source.fetch("/geo/a.json").await.unwrap_err();
        assert_eq!(err.to_string(), "Topology document not found: /geo/a.json");
    }
}
