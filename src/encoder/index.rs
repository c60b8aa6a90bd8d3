//! Derived per-pass indices and their memo cache.
//!
//! The alliance index is first-match-wins in input order: a country listed
//! by several alliances takes the color of the earliest one. The conflict
//! index is the union of every party and every supporter of every conflict.
//!
//! Indices are cached by a canonical fingerprint of the alliance and
//! conflict arrays, so unchanged inputs reuse the previous build and any
//! change (including reordering) rebuilds it.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;

use crate::canonical::canonical_hash;
use crate::types::{Alliance, Conflict};

/// Country id -> alliance color, and the set of conflict-involved ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerIndex {
    alliance_colors: BTreeMap<String, String>,
    conflict_parties: BTreeSet<String>,
}

impl LayerIndex {
    /// Build both indices from scratch.
    pub fn build(alliances: &[Alliance], conflicts: &[Conflict]) -> Self {
        let mut alliance_colors = BTreeMap::new();
        // A blank color never claims a member; the next alliance may.
        for alliance in alliances.iter().filter(|a| !a.color.trim().is_empty()) {
            for member in &alliance.members {
                alliance_colors
                    .entry(member.clone())
                    .or_insert_with(|| alliance.color.clone());
            }
        }

        let conflict_parties: BTreeSet<String> = conflicts
            .iter()
            .flat_map(Conflict::involved)
            .map(str::to_string)
            .collect();

        tracing::debug!(
            alliance_members = alliance_colors.len(),
            conflict_parties = conflict_parties.len(),
            "Layer index built"
        );

        Self {
            alliance_colors,
            conflict_parties,
        }
    }

    /// Fill color of the first alliance listing this country.
    pub fn alliance_color(&self, country_id: &str) -> Option<&str> {
        self.alliance_colors.get(country_id).map(String::as_str)
    }

    /// Whether the country is a party or supporter in any conflict.
    pub fn in_conflict(&self, country_id: &str) -> bool {
        self.conflict_parties.contains(country_id)
    }

    /// Distinct alliance colors that can appear as fills.
    pub fn alliance_palette(&self) -> BTreeSet<&str> {
        self.alliance_colors.values().map(String::as_str).collect()
    }
}

/// Configuration for the index cache.
#[derive(Debug, Clone)]
pub struct IndexCacheConfig {
    /// Maximum number of memoized indices.
    pub max_entries: usize,
}

impl Default for IndexCacheConfig {
    fn default() -> Self {
        Self { max_entries: 16 }
    }
}

/// LRU memo of [`LayerIndex`] builds keyed by input fingerprint.
pub struct IndexCache {
    cache: RwLock<LruCache<u64, Arc<LayerIndex>>>,
}

impl IndexCache {
    /// Create a cache.
    pub fn new(config: IndexCacheConfig) -> Self {
        let size = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(size)),
        }
    }

    /// Return the memoized index for these inputs, building it on a miss.
    pub fn get_or_build(&self, alliances: &[Alliance], conflicts: &[Conflict]) -> Arc<LayerIndex> {
        let key = canonical_hash(&(alliances, conflicts));

        if let Some(index) = self.cache.read().peek(&key) {
            return Arc::clone(index);
        }

        let index = Arc::new(LayerIndex::build(alliances, conflicts));
        self.cache.write().put(key, Arc::clone(&index));
        index
    }

    /// Number of memoized indices.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Whether nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Drop every memoized index.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new(IndexCacheConfig::default())
    }
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.read();
        f.debug_struct("IndexCache")
            .field("len", &cache.len())
            .field("cap", &cache.cap().get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_alliance_wins() {
        let alliances = vec![
            Alliance::new("a", "A", "#aaaaaa", ["fra", "deu"]),
            Alliance::new("b", "B", "#bbbbbb", ["fra", "pol"]),
        ];
        let index = LayerIndex::build(&alliances, &[]);
        assert_eq!(index.alliance_color("fra"), Some("#aaaaaa"));
        assert_eq!(index.alliance_color("pol"), Some("#bbbbbb"));
        assert_eq!(index.alliance_color("usa"), None);
    }

    #[test]
    fn test_order_changes_winner() {
        let a = Alliance::new("a", "A", "#aaaaaa", ["fra"]);
        let b = Alliance::new("b", "B", "#bbbbbb", ["fra"]);
        let index = LayerIndex::build(&[b, a], &[]);
        assert_eq!(index.alliance_color("fra"), Some("#bbbbbb"));
    }

    #[test]
    fn test_blank_alliance_color_falls_through() {
        let blank = Alliance::new("x", "X", "", ["fra", "ita"]);
        let b = Alliance::new("b", "B", "#bbbbbb", ["fra"]);
        let index = LayerIndex::build(&[blank, b], &[]);
        assert_eq!(index.alliance_color("fra"), Some("#bbbbbb"));
        assert_eq!(index.alliance_color("ita"), None);
        assert!(!index.alliance_palette().contains(""));
    }

    #[test]
    fn test_conflict_union_includes_supporters() {
        let conflicts = vec![
            Conflict::new("c1", "One", ["rus", "ukr"]).with_supporters("ukr", ["gbr"]),
            Conflict::new("c2", "Two", ["yem"]).with_supporters("yem", ["irn"]),
        ];
        let index = LayerIndex::build(&[], &conflicts);
        for id in ["rus", "ukr", "gbr", "yem", "irn"] {
            assert!(index.in_conflict(id), "{id} should be involved");
        }
        assert!(!index.in_conflict("fra"));
    }

    #[test]
    fn test_cache_reuses_unchanged_inputs() {
        let cache = IndexCache::default();
        let alliances = vec![Alliance::new("a", "A", "#aaaaaa", ["fra"])];

        let first = cache.get_or_build(&alliances, &[]);
        let second = cache.get_or_build(&alliances.clone(), &[]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_rebuilds_on_change() {
        let cache = IndexCache::default();
        let a = Alliance::new("a", "A", "#aaaaaa", ["fra"]);
        let b = Alliance::new("b", "B", "#bbbbbb", ["fra"]);

        let first = cache.get_or_build(&[a.clone(), b.clone()], &[]);
        let reordered = cache.get_or_build(&[b, a], &[]);

        assert!(!Arc::ptr_eq(&first, &reordered));
        assert_eq!(first.alliance_color("fra"), Some("#aaaaaa"));
        assert_eq!(reordered.alliance_color("fra"), Some("#bbbbbb"));
    }

    #[test]
    fn test_cache_capacity_floor() {
        let cache = IndexCache::new(IndexCacheConfig { max_entries: 0 });
        cache.get_or_build(&[], &[]);
        cache.get_or_build(&[Alliance::new("a", "A", "#aaa", ["x"])], &[]);
        assert_eq!(cache.len(), 1);
    }
}
