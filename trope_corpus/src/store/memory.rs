//! In-memory association store backed by a hash map.
//!
//! Used as a test fixture and for serving a corpus snapshot loaded from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::{AssociationStore, StoreError};
use crate::{CorpusStats, Trope, TropeRecord};

/// Minimum query length for [`InMemoryStore::search`].
pub const MIN_SEARCH_LEN: usize = 2;

/// On-disk snapshot layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub corpus: Option<CorpusStats>,

    #[serde(default)]
    pub tropes: HashMap<Trope, TropeRecord>,
}

/// Association table held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: HashMap<Trope, TropeRecord>,
    corpus: Option<CorpusStats>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row (builder style).
    pub fn with_trope(mut self, trope: impl Into<Trope>, record: TropeRecord) -> Self {
        self.insert(trope, record);
        self
    }

    /// Attach corpus totals.
    pub fn with_corpus_stats(mut self, stats: CorpusStats) -> Self {
        self.corpus = Some(stats);
        self
    }

    /// Insert or replace a row, returning the previous one.
    pub fn insert(&mut self, trope: impl Into<Trope>, record: TropeRecord) -> Option<TropeRecord> {
        self.records.insert(trope.into(), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All known tropes, sorted.
    pub fn all_tropes(&self) -> Vec<&Trope> {
        let mut tropes: Vec<_> = self.records.keys().collect();
        tropes.sort();
        tropes
    }

    /// Case-insensitive substring search over trope names.
    ///
    /// The query is trimmed first; a trimmed query shorter than
    /// [`MIN_SEARCH_LEN`] returns nothing.
    pub fn search(&self, query: &str) -> Vec<&Trope> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let mut matches: Vec<_> = self
            .records
            .keys()
            .filter(|t| t.as_str().to_lowercase().contains(&needle))
            .collect();
        matches.sort();
        matches
    }

    /// Build a store from a decoded snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            records: snapshot.tropes,
            corpus: snapshot.corpus,
        }
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a JSON snapshot from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&contents)?;
        info!(path = %path.display(), tropes = store.len(), "loaded association snapshot");
        Ok(store)
    }

    /// Export the current contents as a snapshot.
    pub fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            corpus: self.corpus,
            tropes: self.records.clone(),
        }
    }
}

impl AssociationStore for InMemoryStore {
    fn exists(&self, trope: &Trope) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(trope))
    }

    fn fetch(&self, trope: &Trope) -> Result<TropeRecord, StoreError> {
        match self.records.get(trope) {
            Some(record) => Ok(record.clone()),
            None => {
                debug!(%trope, "lookup miss");
                Err(StoreError::not_found(trope))
            }
        }
    }

    fn corpus_stats(&self) -> Option<CorpusStats> {
        self.corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_store() -> InMemoryStore {
        InMemoryStore::new()
            .with_trope(
                "HauntedHouse",
                TropeRecord::new(0.01).with_neighbor("OhCrap", 3),
            )
            .with_trope(
                "IronicNurseryTune",
                TropeRecord::new(0.02).with_neighbor("OhCrap", 4),
            )
            .with_trope("OhCrap", TropeRecord::new(2.0))
            .with_trope("HouseOfBlues", TropeRecord::new(0.5))
    }

    #[test]
    fn test_exists_and_fetch() {
        let store = sample_store();

        assert!(store.exists(&Trope::from("OhCrap")).unwrap());
        assert!(!store.exists(&Trope::from("ShoutOut")).unwrap());

        let record = store.fetch(&Trope::from("HauntedHouse")).unwrap();
        assert_eq!(record.weight_with(&Trope::from("OhCrap")), Some(3));

        let missing = store.fetch(&Trope::from("ShoutOut"));
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_all_tropes_sorted() {
        let store = sample_store();
        let names: Vec<_> = store.all_tropes().iter().map(|t| t.as_str()).collect();
        assert_eq!(
            names,
            vec!["HauntedHouse", "HouseOfBlues", "IronicNurseryTune", "OhCrap"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = sample_store();
        let hits: Vec<_> = store.search("house").iter().map(|t| t.as_str()).collect();
        assert_eq!(hits, vec!["HauntedHouse", "HouseOfBlues"]);
    }

    #[test]
    fn test_search_ignores_short_queries() {
        let store = sample_store();
        assert!(store.search("h").is_empty());
        assert!(store.search("  ").is_empty());
        assert_eq!(store.search("oh").len(), 1);
    }

    #[test]
    fn test_search_trims_query() {
        let store = sample_store();
        assert_eq!(store.search("  house \t"), store.search("house"));
        assert!(store.search(" h ").is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut store = InMemoryStore::new();
        assert!(store.insert("OhCrap", TropeRecord::new(1.0)).is_none());
        let previous = store.insert("OhCrap", TropeRecord::new(3.0));
        assert_eq!(previous.map(|r| r.frequency), Some(1.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_json_snapshot() {
        let json = r#"{
            "corpus": {"total_transactions": 100, "total_apparences": 5000},
            "tropes": {
                "HauntedHouse": {"frequency": 0.01, "neighbors": {"OhCrap": 3}},
                "OhCrap": {"frequency": 2.0}
            }
        }"#;

        let store = InMemoryStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.corpus_stats(), Some(CorpusStats::new(100, 5000)));
        assert!(store.exists(&Trope::from("HauntedHouse")).unwrap());
    }

    #[test]
    fn test_snapshot_without_corpus() {
        let store = InMemoryStore::from_json_str(r#"{"tropes": {}}"#).unwrap();
        assert!(store.is_empty());
        assert!(store.corpus_stats().is_none());
    }

    #[test]
    fn test_malformed_snapshot() {
        let result = InMemoryStore::from_json_str("{not json");
        assert!(matches!(result, Err(StoreError::Snapshot(_))));
    }

    #[test]
    fn test_load_json_from_file() {
        let snapshot = sample_store()
            .with_corpus_stats(CorpusStats::new(10, 20))
            .to_snapshot();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&snapshot).unwrap().as_bytes())
            .unwrap();

        let loaded = InMemoryStore::load_json(file.path()).unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.corpus_stats(), Some(CorpusStats::new(10, 20)));
    }

    #[test]
    fn test_load_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = InMemoryStore::load_json(dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
