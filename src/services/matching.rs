//! Face matching
//!
//! Associates uploaded media with the participants that appear in it. The
//! only implementation is a stub: a real one would index each selfie and
//! search every upload against that index.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MatchingConfig;
use crate::models::{Participant, Upload};

/// Decides which participants appear in an upload
pub trait FaceMatcher: Send + Sync {
    /// Ids of the `candidates` recognised in `upload`
    fn find_matches(&self, upload: &Upload, candidates: &[Participant]) -> Vec<String>;
}

/// How the stub matcher picks participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Never matches anyone
    None,
    /// Matches every candidate
    All,
    /// Matches a random subset of candidates
    Random,
}

/// Matcher that ignores image content entirely
#[derive(Debug, Clone)]
pub struct StubMatcher {
    strategy: MatchStrategy,
    max_matches: usize,
}

impl StubMatcher {
    pub fn new(strategy: MatchStrategy, max_matches: usize) -> Self {
        Self { strategy, max_matches }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.strategy, config.max_matches_per_upload)
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }
}

impl FaceMatcher for StubMatcher {
    fn find_matches(&self, upload: &Upload, candidates: &[Participant]) -> Vec<String> {
        let matched: Vec<String> = match self.strategy {
            MatchStrategy::None => Vec::new(),
            MatchStrategy::All => candidates.iter().map(|p| p.id.clone()).collect(),
            MatchStrategy::Random => {
                let mut rng = rand::thread_rng();
                candidates
                    .choose_multiple(&mut rng, self.max_matches.min(candidates.len()))
                    .map(|p| p.id.clone())
                    .collect()
            }
        };

        debug!(
            upload_id = %upload.id,
            strategy = ?self.strategy,
            candidates = candidates.len(),
            matched = matched.len(),
            "Face matching completed"
        );
        matched
    }
}
