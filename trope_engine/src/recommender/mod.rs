//! Trope recommender - turns a comma-separated seed list into ranked tropes.
//!
//! The pipeline works as follows:
//! 1. **Normalize**: Split the input and canonicalize each name
//! 2. **Validate**: Keep the names the store knows; need at least two
//! 3. **Combine**: Intersect the seeds' neighbor maps, summing weights
//! 4. **Score**: Apply the scoring policy to every shared neighbor
//! 5. **Select**: Return the top-N candidates, best first

mod request;

pub use request::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigError, EngineConfig};
use crate::error::RecommendError;
use crate::scoring::ScoringPolicy;
use trope_corpus::{AssociationStore, CorpusStats, NeighborMap, Trope};

/// Seed list offered to users who have not typed anything yet.
pub const DEFAULT_SEED_INPUT: &str = "Haunted House, Ironic Nursery Tune";

/// Fewest recognized seeds a request may have. A single seed has no
/// intersection to take, so configuration can raise this but never lower it.
pub const MIN_SEED_TROPES: usize = 2;

/// Configuration for the recommendation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Number of recommendations returned by [`TropeRecommender::recommend`].
    pub top_n: usize,

    /// Minimum number of recognized seeds, at least [`MIN_SEED_TROPES`].
    pub min_seed_tropes: usize,

    /// Longest raw input accepted, in bytes.
    pub max_input_len: usize,

    pub policy: ScoringPolicy,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            min_seed_tropes: MIN_SEED_TROPES,
            max_input_len: 4096,
            policy: ScoringPolicy::default(),
        }
    }
}

/// The recommendation engine.
///
/// Holds a read-only store and the corpus totals; every request builds its
/// own maps, so one instance can serve many threads.
pub struct TropeRecommender<S> {
    store: S,
    corpus: CorpusStats,
    config: RecommenderConfig,
}

impl<S: AssociationStore> TropeRecommender<S> {
    /// Create a recommender over `store`.
    pub fn new(store: S, corpus: CorpusStats, config: RecommenderConfig) -> Self {
        Self {
            store,
            corpus,
            config,
        }
    }

    /// Create a recommender with default configuration.
    pub fn with_defaults(store: S, corpus: CorpusStats) -> Self {
        Self::new(store, corpus, RecommenderConfig::default())
    }

    /// Create a recommender from loaded configuration.
    ///
    /// Corpus totals come from the config, or from the store when the config
    /// has none.
    pub fn from_config(store: S, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let corpus = config
            .corpus
            .or_else(|| store.corpus_stats())
            .ok_or_else(|| ConfigError::Invalid {
                field: "corpus",
                reason: "corpus totals missing from config and store".to_string(),
            })?;
        if !corpus.is_valid() {
            return Err(ConfigError::Invalid {
                field: "corpus",
                reason: "total_transactions and total_apparences must be positive".to_string(),
            });
        }
        Ok(Self::new(store, corpus, config.recommender))
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn corpus(&self) -> &CorpusStats {
        &self.corpus
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run normalization, validation and combination.
    ///
    /// On success the returned value can be ranked under any policy without
    /// touching the store again.
    pub fn prepare(&self, input: &str) -> Result<PreparedRecommendation, RecommendError> {
        let id = RequestId::new();
        let span = tracing::debug_span!("prepare", request_id = %id);
        let _guard = span.enter();

        if input.len() > self.config.max_input_len {
            return Err(RecommendError::invalid_input(format!(
                "input is {} bytes, limit is {}",
                input.len(),
                self.config.max_input_len
            )));
        }
        debug!(stage = %RequestStage::Received, input_len = input.len(), "request received");

        let min_seeds = self.config.min_seed_tropes.max(MIN_SEED_TROPES);
        let combined = NormalizedRequest::from_input(id, input)
            .validate(&self.store, min_seeds)?
            .combine(&self.store)?;

        Ok(PreparedRecommendation {
            request: combined,
            corpus: self.corpus,
        })
    }

    /// Recommend with the configured `top_n` and policy.
    #[tracing::instrument(skip(self, input), fields(input_len = input.len()))]
    pub fn recommend(&self, input: &str) -> Result<Vec<Recommendation>, RecommendError> {
        self.recommend_with(input, self.config.top_n, self.config.policy)
    }

    /// Recommend `n` tropes under `policy`.
    pub fn recommend_with(
        &self,
        input: &str,
        n: usize,
        policy: ScoringPolicy,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let prepared = self.prepare(input)?;
        let ranked = prepared.rank(n, policy);
        info!(
            request_id = %prepared.id(),
            policy = policy.name(),
            seeds = prepared.seeds().len(),
            candidates = prepared.common_counts().len(),
            returned = ranked.len(),
            "recommendation complete"
        );
        Ok(ranked)
    }

    /// Recommend from a raw request payload.
    pub fn recommend_bytes(&self, payload: &[u8]) -> Result<Vec<Recommendation>, RecommendError> {
        let input = std::str::from_utf8(payload).map_err(|e| {
            RecommendError::invalid_input(format!("input is not valid UTF-8: {e}"))
        })?;
        self.recommend(input)
    }
}

/// A validated request with its shared neighbors, ready to rank.
#[derive(Debug, Clone)]
pub struct PreparedRecommendation {
    request: CombinedRequest,
    corpus: CorpusStats,
}

impl PreparedRecommendation {
    pub fn id(&self) -> RequestId {
        self.request.id
    }

    /// Recognized seeds, in input order.
    pub fn seeds(&self) -> &[Trope] {
        &self.request.seeds
    }

    /// Summed co-occurrence weight of every neighbor all seeds share.
    pub fn common_counts(&self) -> &NeighborMap {
        &self.request.common
    }

    /// The best `n` candidates under `policy`.
    pub fn rank(&self, n: usize, policy: ScoringPolicy) -> Vec<Recommendation> {
        self.request.score(policy, &self.corpus).complete(n)
    }

    /// Display names of the best `n` candidates.
    pub fn display_names(&self, n: usize, policy: ScoringPolicy) -> Vec<String> {
        self.rank(n, policy).into_iter().map(|r| r.display).collect()
    }
}
