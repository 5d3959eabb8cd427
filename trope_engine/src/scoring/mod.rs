//! Scoring policies.
//!
//! Raw co-occurrence favors tropes that are common everywhere. Both policies
//! correct for that: the count policy divides the summed weight by each
//! candidate's global frequency, the lift policy compares observed
//! co-occurrence against what the marginal frequencies predict.

mod lift;

pub use lift::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::affinity::shared_keys;
use trope_corpus::{CorpusStats, FrequencyTable, NeighborMap, Trope};

/// Candidate trope -> score.
pub type ScoreMap = HashMap<Trope, f64>;

/// What the summed co-occurrence weight is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyPenalty {
    /// Rank by summed weight alone.
    Off,
    /// Divide by the frequency stored for the candidate.
    #[default]
    Raw,
    /// Divide by the candidate's share of all corpus appearances.
    CorpusShare,
}

/// How candidates are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Summed co-occurrence weight, optionally frequency-penalized.
    Count {
        #[serde(default)]
        penalty: FrequencyPenalty,
    },
    /// Mean lift of the candidate against each seed.
    AverageLift,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::penalized()
    }
}

impl ScoringPolicy {
    /// Count policy divided by raw frequency.
    pub fn penalized() -> Self {
        Self::Count {
            penalty: FrequencyPenalty::Raw,
        }
    }

    /// Count policy without any frequency penalty.
    pub fn unpenalized() -> Self {
        Self::Count {
            penalty: FrequencyPenalty::Off,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringPolicy::Count {
                penalty: FrequencyPenalty::Off,
            } => "count",
            ScoringPolicy::Count {
                penalty: FrequencyPenalty::Raw,
            } => "penalized_count",
            ScoringPolicy::Count {
                penalty: FrequencyPenalty::CorpusShare,
            } => "share_penalized_count",
            ScoringPolicy::AverageLift => "average_lift",
        }
    }

    /// Score every candidate the inputs admit.
    pub fn score(&self, inputs: &ScoringInputs<'_>) -> ScoreMap {
        match *self {
            ScoringPolicy::Count { penalty } => {
                penalized_scores(inputs.common, inputs.frequencies, penalty, inputs.corpus)
            }
            ScoringPolicy::AverageLift => {
                let seed_maps: Vec<&NeighborMap> = inputs
                    .seeds
                    .iter()
                    .filter_map(|s| inputs.seed_neighbors.get(s))
                    .collect();
                let candidates = shared_keys(&seed_maps);
                average_lift_scores(
                    inputs.seeds,
                    inputs.seed_neighbors,
                    &candidates,
                    inputs.frequencies,
                    inputs.corpus,
                )
            }
        }
    }
}

/// Everything a policy may need, borrowed from a combined request.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    /// Validated seeds in input order.
    pub seeds: &'a [Trope],
    /// Neighbor map of each distinct seed.
    pub seed_neighbors: &'a HashMap<Trope, NeighborMap>,
    /// Summed weights of the neighbors every seed shares.
    pub common: &'a NeighborMap,
    /// Frequencies of seeds and candidates.
    pub frequencies: &'a FrequencyTable,
    pub corpus: &'a CorpusStats,
}

/// Summed weight divided by the candidate's frequency, per `penalty`.
///
/// Candidates with no known frequency, or whose score is not finite, are left
/// out.
pub fn penalized_scores(
    common: &NeighborMap,
    frequencies: &FrequencyTable,
    penalty: FrequencyPenalty,
    corpus: &CorpusStats,
) -> ScoreMap {
    let mut scores = ScoreMap::with_capacity(common.len());

    for (candidate, &weight) in common {
        let weight = weight as f64;
        let denominator = match penalty {
            FrequencyPenalty::Off => {
                scores.insert(candidate.clone(), weight);
                continue;
            }
            FrequencyPenalty::Raw => frequencies.get(candidate).copied(),
            FrequencyPenalty::CorpusShare => frequencies
                .get(candidate)
                .map(|f| corpus.appearance_share(*f)),
        };

        let Some(denominator) = denominator else {
            debug!(%candidate, "no frequency for candidate, dropping");
            continue;
        };

        let score = weight / denominator;
        if score.is_finite() {
            scores.insert(candidate.clone(), score);
        } else {
            warn!(%candidate, denominator, "non-finite penalized score, dropping");
        }
    }

    scores
}
