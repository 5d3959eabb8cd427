//! Average-lift scoring.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::ScoreMap;
use trope_corpus::{CorpusStats, FrequencyTable, NeighborMap, Trope};

/// Lift of a pair: observed co-occurrence over what independence predicts.
///
/// `count_uc * total_transactions / (count_u * count_c)`. Values above 1 mean
/// the pair appears together more often than chance.
pub fn lift(count_uc: f64, count_u: f64, count_c: f64, total_transactions: f64) -> f64 {
    count_uc * total_transactions / (count_u * count_c)
}

/// Mean lift of each candidate against every seed.
///
/// Frequencies are normalized, so absolute counts are recovered with the
/// corpus appearance total. A candidate missing a frequency or a pair count,
/// or producing a non-finite lift, is skipped.
pub fn average_lift_scores(
    seeds: &[Trope],
    seed_neighbors: &HashMap<Trope, NeighborMap>,
    candidates: &[Trope],
    frequencies: &FrequencyTable,
    corpus: &CorpusStats,
) -> ScoreMap {
    let mut scores = ScoreMap::with_capacity(candidates.len());
    if seeds.is_empty() {
        return scores;
    }
    let total_transactions = corpus.total_transactions as f64;

    'candidates: for candidate in candidates {
        let Some(&freq_c) = frequencies.get(candidate) else {
            debug!(%candidate, "no frequency for candidate, dropping");
            continue;
        };
        let count_c = corpus.appearance_count(freq_c);

        let mut total = 0.0;
        for seed in seeds {
            let count_uc = seed_neighbors
                .get(seed)
                .and_then(|neighbors| neighbors.get(candidate));
            let (Some(&count_uc), Some(&freq_u)) = (count_uc, frequencies.get(seed)) else {
                debug!(%candidate, %seed, "incomplete pair counts, dropping");
                continue 'candidates;
            };
            let count_u = corpus.appearance_count(freq_u);
            total += lift(count_uc as f64, count_u, count_c, total_transactions);
        }

        let average = total / seeds.len() as f64;
        if average.is_finite() {
            scores.insert(candidate.clone(), average);
        } else {
            warn!(%candidate, "non-finite average lift, dropping");
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(entries: &[(&str, u64)]) -> NeighborMap {
        entries.iter().map(|(k, v)| (Trope::from(*k), *v)).collect()
    }

    #[test]
    fn test_lift_formula() {
        // 10 co-occurrences in 1000 docs, each trope seen 100 times.
        assert!((lift(10.0, 100.0, 100.0, 1000.0) - 1.0).abs() < 1e-12);
        assert!((lift(20.0, 100.0, 100.0, 1000.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_lift_over_seeds() {
        let u1 = Trope::from("HauntedHouse");
        let u2 = Trope::from("IronicNurseryTune");
        let c = Trope::from("OhCrap");
        let seeds = vec![u1.clone(), u2.clone()];

        let mut seed_neighbors = HashMap::new();
        seed_neighbors.insert(u1.clone(), neighbors(&[("OhCrap", 3)]));
        seed_neighbors.insert(u2.clone(), neighbors(&[("OhCrap", 4)]));

        let mut freq = FrequencyTable::new();
        freq.insert(u1, 0.01);
        freq.insert(u2, 0.02);
        freq.insert(c.clone(), 0.05);
        let corpus = CorpusStats::new(500, 1000);

        // counts: u1 = 10, u2 = 20, c = 50
        // lift1 = 3*500/(10*50) = 3, lift2 = 4*500/(20*50) = 2
        let scores = average_lift_scores(&seeds, &seed_neighbors, &[c], &freq, &corpus);
        assert!((scores["OhCrap"] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_average_lift_skips_incomplete_candidates() {
        let u = Trope::from("U");
        let seeds = vec![u.clone()];
        let mut seed_neighbors = HashMap::new();
        seed_neighbors.insert(u.clone(), neighbors(&[("Known", 1), ("NoFreq", 1)]));

        let mut freq = FrequencyTable::new();
        freq.insert(u, 0.1);
        freq.insert(Trope::from("Known"), 0.1);
        freq.insert(Trope::from("NotNeighbor"), 0.1);
        let corpus = CorpusStats::new(10, 10);

        let candidates = [
            Trope::from("Known"),
            Trope::from("NoFreq"),
            Trope::from("NotNeighbor"),
        ];
        let scores = average_lift_scores(&seeds, &seed_neighbors, &candidates, &freq, &corpus);

        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key("Known"));
    }

    #[test]
    fn test_average_lift_without_seeds() {
        let corpus = CorpusStats::new(10, 10);
        let scores = average_lift_scores(
            &[],
            &HashMap::new(),
            &[Trope::from("A")],
            &FrequencyTable::new(),
            &corpus,
        );
        assert!(scores.is_empty());
    }
}
