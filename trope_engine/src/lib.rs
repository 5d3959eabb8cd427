//! # Trope Engine
//!
//! Recommends tropes that are strongly associated with every trope in a
//! user-supplied seed list. The engine reads per-trope co-occurrence rows
//! from an [`AssociationStore`](trope_corpus::AssociationStore) and does
//! everything else in memory.
//!
//! ## Core Components
//!
//! - **text**: Canonicalizes free-form trope names into lookup keys
//! - **affinity**: Combines neighbor maps and selects the best-K entries
//! - **scoring**: Frequency-penalized count and average-lift scoring policies
//! - **recommender**: The request pipeline and the `TropeRecommender` facade
//!
//! ## Request Flow
//!
//! raw input → normalize → validate against the store → combine shared
//! neighbors → score → top-N → ranked recommendations

pub mod affinity;
pub mod config;
pub mod error;
pub mod recommender;
pub mod scoring;
pub mod text;

pub use affinity::*;
pub use config::*;
pub use error::*;
pub use recommender::*;
pub use scoring::*;
pub use text::*;

pub use trope_corpus::{
    AssociationStore, CorpusStats, FrequencyTable, InMemoryStore, NeighborMap, StoreError, Trope,
    TropeRecord,
};
