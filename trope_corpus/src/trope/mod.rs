//! Trope identifiers and the association rows attached to them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical trope identifier, e.g. `HauntedHouse`.
///
/// The engine's normalizer is the only place raw user text turns into a
/// `Trope`; the store keys its rows by the same canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trope(pub String);

impl Trope {
    /// Wrap an already canonical name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Trope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Trope {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Trope {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::borrow::Borrow<str> for Trope {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Co-occurrence weights of one trope with its neighbors.
pub type NeighborMap = HashMap<Trope, u64>;

/// Global frequency per trope.
pub type FrequencyTable = HashMap<Trope, f64>;

/// One row of the association table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TropeRecord {
    /// Global occurrence count, or normalized frequency, depending on the corpus.
    pub frequency: f64,

    /// Tropes this one co-occurs with, weighted by co-occurrence count.
    #[serde(default)]
    pub neighbors: NeighborMap,
}

impl TropeRecord {
    /// Create a record with no neighbors.
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            neighbors: NeighborMap::new(),
        }
    }

    /// Add a neighbor with the given co-occurrence weight.
    pub fn with_neighbor(mut self, trope: impl Into<Trope>, weight: u64) -> Self {
        self.neighbors.insert(trope.into(), weight);
        self
    }

    /// Add several neighbors at once.
    pub fn with_neighbors<T: Into<Trope>>(
        mut self,
        neighbors: impl IntoIterator<Item = (T, u64)>,
    ) -> Self {
        self.neighbors
            .extend(neighbors.into_iter().map(|(t, w)| (t.into(), w)));
        self
    }

    /// Co-occurrence weight with `other`, if they are neighbors.
    pub fn weight_with(&self, other: &Trope) -> Option<u64> {
        self.neighbors.get(other).copied()
    }
}
