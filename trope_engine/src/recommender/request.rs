//! Request stages.
//!
//! A request moves `Received → Normalized → Validated → Combined → Scored →
//! Complete`. Each stage is its own type, so a later step cannot run on data
//! an earlier step has not checked. Only validation and combination can fail.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::affinity::{sum_intersection, top_n};
use crate::error::RecommendError;
use crate::scoring::{ScoreMap, ScoringInputs, ScoringPolicy};
use crate::text::{display_form, normalize, parse_list};
use trope_corpus::{AssociationStore, CorpusStats, FrequencyTable, NeighborMap, StoreError, Trope};

/// Identifier correlating the log lines of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline stage, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Normalized,
    Validated,
    Combined,
    Scored,
    Complete,
}

impl std::fmt::Display for RequestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestStage::Received => "received",
            RequestStage::Normalized => "normalized",
            RequestStage::Validated => "validated",
            RequestStage::Combined => "combined",
            RequestStage::Scored => "scored",
            RequestStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Canonical key, e.g. `ShoutOut`.
    pub trope: Trope,
    /// Presentation form, e.g. `Shout Out`.
    pub display: String,
    pub score: f64,
}

impl Recommendation {
    pub fn new(trope: Trope, score: f64) -> Self {
        let display = display_form(&trope);
        Self {
            trope,
            display,
            score,
        }
    }
}

/// Input split and canonicalized, not yet checked against the store.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub id: RequestId,
    pub tropes: Vec<Trope>,
}

impl NormalizedRequest {
    /// Received → Normalized.
    pub fn from_input(id: RequestId, input: &str) -> Self {
        let tropes: Vec<Trope> = parse_list(input).iter().map(|s| normalize(s)).collect();
        debug!(request_id = %id, stage = %RequestStage::Normalized, count = tropes.len(), "normalized input");
        Self { id, tropes }
    }

    /// Normalized → Validated.
    ///
    /// Tropes the store does not know are dropped. Order and duplicates of
    /// the survivors are kept; each distinct trope is fetched once.
    pub fn validate<S>(self, store: &S, min_seeds: usize) -> Result<ValidatedRequest, RecommendError>
    where
        S: AssociationStore + ?Sized,
    {
        let mut seeds = Vec::with_capacity(self.tropes.len());
        let mut records: HashMap<Trope, (f64, NeighborMap)> = HashMap::new();

        for trope in self.tropes {
            if trope.is_empty() {
                continue;
            }
            if records.contains_key(&trope) {
                seeds.push(trope);
                continue;
            }
            if !store.exists(&trope)? {
                debug!(request_id = %self.id, %trope, "unknown trope, dropping");
                continue;
            }
            match store.fetch(&trope) {
                Ok(record) => {
                    records.insert(trope.clone(), (record.frequency, record.neighbors));
                    seeds.push(trope);
                }
                Err(StoreError::NotFound { trope }) => {
                    debug!(request_id = %self.id, %trope, "trope vanished between lookups, dropping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if seeds.len() < min_seeds {
            return Err(RecommendError::InsufficientTropes {
                found: seeds.len(),
                required: min_seeds,
            });
        }

        debug!(request_id = %self.id, stage = %RequestStage::Validated, seeds = seeds.len(), "validated seeds");

        let mut frequencies = FrequencyTable::with_capacity(records.len());
        let mut seed_neighbors = HashMap::with_capacity(records.len());
        for (trope, (frequency, neighbors)) in records {
            frequencies.insert(trope.clone(), frequency);
            seed_neighbors.insert(trope, neighbors);
        }

        Ok(ValidatedRequest {
            id: self.id,
            seeds,
            seed_neighbors,
            frequencies,
        })
    }
}

/// Seeds confirmed by the store, with their rows.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub id: RequestId,
    pub seeds: Vec<Trope>,
    pub seed_neighbors: HashMap<Trope, NeighborMap>,
    /// Seed frequencies so far; candidates are added when combining.
    pub frequencies: FrequencyTable,
}

impl ValidatedRequest {
    /// Validated → Combined.
    ///
    /// Sums the neighbors every seed shares and fetches their frequencies in
    /// one batch.
    pub fn combine<S>(self, store: &S) -> Result<CombinedRequest, RecommendError>
    where
        S: AssociationStore + ?Sized,
    {
        let maps: Vec<&NeighborMap> = self
            .seeds
            .iter()
            .filter_map(|s| self.seed_neighbors.get(s))
            .collect();
        let common = sum_intersection(&maps);

        if common.is_empty() {
            return Err(RecommendError::NoSharedAssociations { seeds: self.seeds });
        }

        let candidates: Vec<Trope> = common.keys().cloned().collect();
        let mut frequencies = self.frequencies;
        frequencies.extend(store.frequencies(&candidates)?);

        debug!(
            request_id = %self.id,
            stage = %RequestStage::Combined,
            candidates = common.len(),
            "combined shared neighbors"
        );

        Ok(CombinedRequest {
            id: self.id,
            seeds: self.seeds,
            seed_neighbors: self.seed_neighbors,
            common,
            frequencies,
        })
    }
}

/// Shared neighbors of all seeds, ready to score under any policy.
#[derive(Debug, Clone)]
pub struct CombinedRequest {
    pub id: RequestId,
    pub seeds: Vec<Trope>,
    pub seed_neighbors: HashMap<Trope, NeighborMap>,
    /// Never empty.
    pub common: NeighborMap,
    /// Seeds and every candidate the store could price.
    pub frequencies: FrequencyTable,
}

impl CombinedRequest {
    /// Combined → Scored.
    pub fn score(&self, policy: ScoringPolicy, corpus: &CorpusStats) -> ScoredRequest {
        let inputs = ScoringInputs {
            seeds: &self.seeds,
            seed_neighbors: &self.seed_neighbors,
            common: &self.common,
            frequencies: &self.frequencies,
            corpus,
        };
        let scores = policy.score(&inputs);
        debug!(
            request_id = %self.id,
            stage = %RequestStage::Scored,
            policy = policy.name(),
            scored = scores.len(),
            "scored candidates"
        );
        ScoredRequest {
            id: self.id,
            scores,
        }
    }
}

/// Candidate scores under one policy.
#[derive(Debug, Clone)]
pub struct ScoredRequest {
    pub id: RequestId,
    pub scores: ScoreMap,
}

impl ScoredRequest {
    /// Scored → Complete: the best `n` candidates.
    pub fn complete(self, n: usize) -> Vec<Recommendation> {
        let ranked: Vec<Recommendation> = top_n(&self.scores, n)
            .into_iter()
            .map(|(trope, score)| Recommendation::new(trope, score))
            .collect();
        debug!(request_id = %self.id, stage = %RequestStage::Complete, returned = ranked.len(), "ranked");
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trope_corpus::{InMemoryStore, TropeRecord};

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_trope(
                "HauntedHouse",
                TropeRecord::new(1.0).with_neighbors([("OhCrap", 3), ("JumpScare", 1)]),
            )
            .with_trope(
                "IronicNurseryTune",
                TropeRecord::new(1.0).with_neighbors([("OhCrap", 4), ("CreepyChild", 2)]),
            )
            .with_trope("OhCrap", TropeRecord::new(2.0))
            .with_trope("Loner", TropeRecord::new(1.0).with_neighbor("Solitude", 1))
    }

    #[test]
    fn test_normalize_stage() {
        let request = NormalizedRequest::from_input(RequestId::new(), "haunted house, , OH CRAP");
        assert_eq!(
            request.tropes,
            vec![Trope::from("HauntedHouse"), Trope::default(), Trope::from("OhCrap")]
        );
    }

    #[test]
    fn test_validate_drops_unknown() {
        let request =
            NormalizedRequest::from_input(RequestId::new(), "Haunted House, Nope, Ironic Nursery Tune");
        let validated = request.validate(&store(), 2).unwrap();

        assert_eq!(
            validated.seeds,
            vec![Trope::from("HauntedHouse"), Trope::from("IronicNurseryTune")]
        );
        assert_eq!(validated.frequencies.len(), 2);
    }

    #[test]
    fn test_validate_keeps_duplicates() {
        let request = NormalizedRequest::from_input(RequestId::new(), "Loner, loner");
        let validated = request.validate(&store(), 2).unwrap();

        assert_eq!(validated.seeds.len(), 2);
        assert_eq!(validated.seed_neighbors.len(), 1);
    }

    #[test]
    fn test_validate_insufficient() {
        let request = NormalizedRequest::from_input(RequestId::new(), "Haunted House, Unknown");
        let err = request.validate(&store(), 2).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::InsufficientTropes {
                found: 1,
                required: 2
            }
        ));
    }

    #[test]
    fn test_combine_no_shared() {
        let request = NormalizedRequest::from_input(RequestId::new(), "Haunted House, Loner");
        let err = request
            .validate(&store(), 2)
            .unwrap()
            .combine(&store())
            .unwrap_err();

        match err {
            RecommendError::NoSharedAssociations { seeds } => assert_eq!(seeds.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_full_stage_chain() {
        let store = store();
        let combined = NormalizedRequest::from_input(RequestId::new(), "Haunted House, Ironic Nursery Tune")
            .validate(&store, 2)
            .unwrap()
            .combine(&store)
            .unwrap();

        assert_eq!(combined.common.len(), 1);
        assert_eq!(combined.common.get("OhCrap"), Some(&7));
        assert_eq!(combined.frequencies.get("OhCrap"), Some(&2.0));

        let ranked = combined
            .score(ScoringPolicy::penalized(), &CorpusStats::new(1, 1))
            .complete(5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].trope, Trope::from("OhCrap"));
        assert_eq!(ranked[0].display, "Oh Crap");
        assert!((ranked[0].score - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_stage_keeps_request_id() {
        let store = store();
        let id = RequestId::new();
        let combined = NormalizedRequest::from_input(id, "Haunted House, Ironic Nursery Tune")
            .validate(&store, 2)
            .unwrap()
            .combine(&store)
            .unwrap();

        let scored = combined.score(ScoringPolicy::unpenalized(), &CorpusStats::new(1, 1));
        assert_eq!(scored.id, id);
        assert_eq!(scored.scores.get("OhCrap"), Some(&7.0));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(RequestStage::Received.to_string(), "received");
        assert_eq!(RequestStage::Scored.to_string(), "scored");
        assert_eq!(RequestStage::Complete.to_string(), "complete");
    }
}
