//! Affinity operations over neighbor maps.
//!
//! - **combine**: intersect several neighbor maps, summing or just keeping keys
//! - **select**: bounded best-K extraction over any weight map

mod combine;
mod select;

pub use combine::*;
pub use select::*;
