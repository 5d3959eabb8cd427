//! # Trope Corpus
//!
//! The data side of the trope recommender: canonical trope identifiers,
//! per-trope association records, corpus-level statistics, and the
//! [`AssociationStore`] gateway through which the engine reads them.
//!
//! This crate holds no ranking logic. The engine treats any store as a
//! read-only key-value lookup service.

pub mod corpus;
pub mod store;
pub mod trope;

pub use corpus::*;
pub use store::*;
pub use trope::*;
