//! Corpus-level statistics used by the lift scorer.

use serde::{Deserialize, Serialize};

/// Totals describing the corpus the association table was mined from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Number of documents (movies) in the corpus.
    pub total_transactions: u64,

    /// Total number of trope appearances across all documents.
    pub total_apparences: u64,
}

impl CorpusStats {
    pub fn new(total_transactions: u64, total_apparences: u64) -> Self {
        Self {
            total_transactions,
            total_apparences,
        }
    }

    /// Absolute appearance count for a normalized frequency.
    pub fn appearance_count(&self, frequency: f64) -> f64 {
        frequency * self.total_apparences as f64
    }

    /// Fraction of all appearances taken by a trope with raw count `frequency`.
    pub fn appearance_share(&self, frequency: f64) -> f64 {
        frequency / self.total_apparences as f64
    }

    /// Both totals must be positive for lift to be defined.
    pub fn is_valid(&self) -> bool {
        self.total_transactions > 0 && self.total_apparences > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appearance_conversions() {
        let stats = CorpusStats::new(10, 200);

        assert!((stats.appearance_count(0.05) - 10.0).abs() < 1e-9);
        assert!((stats.appearance_share(50.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_validity() {
        assert!(CorpusStats::new(1, 1).is_valid());
        assert!(!CorpusStats::new(0, 100).is_valid());
        assert!(!CorpusStats::new(100, 0).is_valid());
    }
}
