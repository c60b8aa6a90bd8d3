//! Topology sources and the topology loader.
//!
//! ## Contract
//!
//! `load(uri) -> FeatureCollection`, asynchronous, one attempt per mount.
//! The decoded collection is cached for the rest of the session; a failure
//! is cached too and only an explicit [`TopologyLoader::retry`] re-arms the
//! loader. While the fetch is pending there is no geometry and nothing is
//! drawn.
//!
//! ```text
//! Idle ──load──▶ Pending ──ok──▶ Ready(collection)
//!   ▲               │
//!   │               └──err──▶ Failed(error) ──retry──▶ Idle
//!   └── dropped while pending
//! ```

pub mod decode;
pub mod memory;

#[cfg(feature = "fs")]
pub mod file;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::FeatureCollection;

pub use decode::decode_topology;
pub use memory::StaticTopologySource;

#[cfg(feature = "fs")]
pub use file::FileTopologySource;

/// Errors raised while fetching or decoding a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The source could not deliver the document.
    #[error("Failed to fetch topology from {uri}: {reason}")]
    Fetch {
        /// Requested URI.
        uri: String,
        /// Source-specific failure description.
        reason: String,
    },
    /// The document is not valid JSON or has the wrong shape.
    #[error("Invalid topology JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document's `type` is not `Topology`.
    #[error("Not a topology document (type = {0})")]
    NotTopology(String),
    /// The named object is absent from `objects`.
    #[error("Topology object not found: {0}")]
    MissingObject(String),
    /// A geometry references an arc that does not exist.
    #[error("Arc index out of range: {0}")]
    InvalidArc(i64),
    /// An arc contains a position with fewer than two components.
    #[error("Invalid position in arc {0}")]
    InvalidPosition(usize),
}

/// Trait for topology document sources.
///
/// Implementations deliver raw bytes for a relative URI; decoding is the
/// loader's job.
#[async_trait]
pub trait TopologySource: Send + Sync {
    /// Error type for fetch operations.
    type Error: std::error::Error + Send + Sync;

    /// Fetch the raw document at `uri`.
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, Self::Error>;
}

/// Fetch and decode a topology in one attempt.
pub async fn fetch_topology<S: TopologySource>(
    source: &S,
    uri: &str,
    object_name: &str,
) -> Result<FeatureCollection, TopologyError> {
    let bytes = source.fetch(uri).await.map_err(|e| TopologyError::Fetch {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    decode_topology(&bytes, object_name)
}

/// Summary of a completed load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// URI the topology was loaded from.
    pub uri: String,
    /// Number of decoded features.
    pub feature_count: usize,
    /// When decoding finished.
    pub loaded_at: DateTime<Utc>,
}

/// Load state of a mounted map's topology.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Pending,
    /// Decoded geometry, cached for the session.
    Ready {
        /// The decoded collection.
        collection: Arc<FeatureCollection>,
        /// Load summary.
        report: LoadReport,
    },
    /// The single attempt failed.
    Failed(Arc<TopologyError>),
}

impl LoadState {
    /// Whether a fetch is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The decoded collection, if ready.
    pub fn collection(&self) -> Option<&Arc<FeatureCollection>> {
        match self {
            Self::Ready { collection, .. } => Some(collection),
            _ => None,
        }
    }

    /// The failure, if failed.
    pub fn error(&self) -> Option<&Arc<TopologyError>> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Loads one topology document per mount and caches the outcome.
#[derive(Debug, Clone)]
pub struct TopologyLoader {
    uri: String,
    object_name: String,
    state: LoadState,
}

impl TopologyLoader {
    /// Create an idle loader for `uri`, extracting `object_name`.
    pub fn new(uri: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            object_name: object_name.into(),
            state: LoadState::Idle,
        }
    }

    /// The configured URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Current load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Load the topology, or return the cached outcome.
    ///
    /// Only an `Idle` loader touches the source. If the returned future is
    /// dropped before completion the loader falls back to `Idle`.
    pub async fn load<S: TopologySource>(
        &mut self,
        source: &S,
    ) -> Result<Arc<FeatureCollection>, Arc<TopologyError>> {
        match &self.state {
            LoadState::Ready { collection, .. } => return Ok(Arc::clone(collection)),
            LoadState::Failed(err) => return Err(Arc::clone(err)),
            LoadState::Pending | LoadState::Idle => {}
        }

        let uri = self.uri.clone();
        let object_name = self.object_name.clone();
        let guard = PendingGuard::arm(&mut self.state);

        let outcome = fetch_topology(source, &uri, &object_name).await;
        match outcome {
            Ok(collection) => {
                let collection = Arc::new(collection);
                let report = LoadReport {
                    uri,
                    feature_count: collection.len(),
                    loaded_at: Utc::now(),
                };
                tracing::info!(
                    uri = %report.uri,
                    feature_count = report.feature_count,
                    "Topology loaded"
                );
                guard.complete(LoadState::Ready {
                    collection: Arc::clone(&collection),
                    report,
                });
                Ok(collection)
            }
            Err(err) => {
                tracing::warn!(uri = %uri, error = %err, "Topology load failed");
                let err = Arc::new(err);
                guard.complete(LoadState::Failed(Arc::clone(&err)));
                Err(err)
            }
        }
    }

    /// Re-arm a failed loader. Returns `true` if the state changed.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, LoadState::Failed(_)) {
            self.state = LoadState::Idle;
            true
        } else {
            false
        }
    }
}

/// Holds the loader in `Pending` and restores `Idle` if dropped early.
struct PendingGuard<'a> {
    state: &'a mut LoadState,
    completed: bool,
}

impl<'a> PendingGuard<'a> {
    fn arm(state: &'a mut LoadState) -> Self {
        *state = LoadState::Pending;
        Self {
            state,
            completed: false,
        }
    }

    fn complete(mut self, outcome: LoadState) {
        *self.state = outcome;
        self.completed = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *self.state = LoadState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DOC: &str = r#"{
        "type": "Topology",
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "840", "arcs": [[0]]}
        ]}},
        "arcs": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
    }"#;

    /// Counts fetches to prove the cache holds.
    struct CountingSource {
        inner: StaticTopologySource,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl TopologySource for CountingSource {
        type Error = memory::StaticSourceError;

        async fn fetch(&self, uri: &str) -> Result<Vec<u8>, Self::Error> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(uri).await
        }
    }

    fn counting(uri: &str) -> CountingSource {
        CountingSource {
            inner: StaticTopologySource::new().with_document(uri, DOC),
            fetches: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_load_caches_collection() {
        let source = counting("/geo/world.json");
        let mut loader = TopologyLoader::new("/geo/world.json", "countries");

        let first = loader.load(&source).await.unwrap();
        let second = loader.load(&source).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(loader.state().collection().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_sticky_until_retry() {
        let source = counting("/geo/other.json");
        let mut loader = TopologyLoader::new("/geo/world.json", "countries");

        assert!(loader.load(&source).await.is_err());
        assert!(loader.load(&source).await.is_err());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(loader.state().error().is_some());

        assert!(loader.retry());
        assert!(matches!(loader.state(), LoadState::Idle));
        assert!(loader.load(&source).await.is_err());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_decode_failure_surfaces() {
        let source = StaticTopologySource::new().with_document("/bad.json", "{not json");
        let mut loader = TopologyLoader::new("/bad.json", "countries");
        let err = loader.load(&source).await.unwrap_err();
        assert!(matches!(err.as_ref(), TopologyError::Json(_)));
    }

    /// Never answers.
    struct HangingSource;

    #[async_trait]
    impl TopologySource for HangingSource {
        type Error = memory::StaticSourceError;

        async fn fetch(&self, _uri: &str) -> Result<Vec<u8>, Self::Error> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_dropped_load_returns_to_idle() {
        let mut loader = TopologyLoader::new("/geo/world.json", "countries");
        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            loader.load(&HangingSource),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(matches!(loader.state(), LoadState::Idle));
    }

    #[test]
    fn test_retry_noop_when_not_failed() {
        let mut loader = TopologyLoader::new("/geo/world.json", "countries");
        assert!(!loader.retry());
    }
}
