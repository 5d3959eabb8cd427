//! Association store gateway.
//!
//! The engine never owns corpus data. It asks a store whether a trope exists
//! and fetches its row; everything behind this trait (database, snapshot
//! file, in-memory fixture) is the store's business.

mod memory;

pub use memory::*;

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::{CorpusStats, FrequencyTable, Trope, TropeRecord};

/// Errors raised by an association store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested trope has no row in the store.
    #[error("trope '{trope}' not found in the association store")]
    NotFound { trope: Trope },

    /// A snapshot file could not be read.
    #[error("failed to read store snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be decoded.
    #[error("malformed store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Transport or query failure in an external backend.
    #[error("association store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(trope: &Trope) -> Self {
        Self::NotFound {
            trope: trope.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Read-only lookup service over the trope association table.
///
/// Implementations must tolerate concurrent reads; the engine never mutates
/// a store.
pub trait AssociationStore: Send + Sync {
    /// Whether the store has a row for `trope`.
    fn exists(&self, trope: &Trope) -> Result<bool, StoreError>;

    /// Fetch the row for `trope`, or [`StoreError::NotFound`].
    fn fetch(&self, trope: &Trope) -> Result<TropeRecord, StoreError>;

    /// Frequencies for a batch of tropes.
    ///
    /// Tropes without a row are left out of the table. Backends that can
    /// answer in one round trip should override this.
    fn frequencies(&self, tropes: &[Trope]) -> Result<FrequencyTable, StoreError> {
        let mut table = FrequencyTable::with_capacity(tropes.len());
        for trope in tropes {
            match self.fetch(trope) {
                Ok(record) => {
                    table.insert(trope.clone(), record.frequency);
                }
                Err(StoreError::NotFound { trope }) => {
                    debug!(%trope, "no frequency row, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(table)
    }

    /// Corpus totals, when the store knows them.
    fn corpus_stats(&self) -> Option<CorpusStats> {
        None
    }
}

impl<S: AssociationStore + ?Sized> AssociationStore for &S {
    fn exists(&self, trope: &Trope) -> Result<bool, StoreError> {
        (**self).exists(trope)
    }

    fn fetch(&self, trope: &Trope) -> Result<TropeRecord, StoreError> {
        (**self).fetch(trope)
    }

    fn frequencies(&self, tropes: &[Trope]) -> Result<FrequencyTable, StoreError> {
        (**self).frequencies(tropes)
    }

    fn corpus_stats(&self) -> Option<CorpusStats> {
        (**self).corpus_stats()
    }
}

impl<S: AssociationStore + ?Sized> AssociationStore for std::sync::Arc<S> {
    fn exists(&self, trope: &Trope) -> Result<bool, StoreError> {
        (**self).exists(trope)
    }

    fn fetch(&self, trope: &Trope) -> Result<TropeRecord, StoreError> {
        (**self).fetch(trope)
    }

    fn frequencies(&self, tropes: &[Trope]) -> Result<FrequencyTable, StoreError> {
        (**self).frequencies(tropes)
    }

    fn corpus_stats(&self) -> Option<CorpusStats> {
        (**self).corpus_stats()
    }
}
