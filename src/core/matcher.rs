use crate::models::{
    MatchResult, Neighborhood, NeighborhoodMatch, NeighborhoodSummary, Preferences, ScoringWeights,
};
use crate::core::scoring::compute_match;

/// Number of neighborhoods returned by a preview
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Number of neighborhoods returned by top-K matching when no limit is given
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Result of ranking a neighborhood set
#[derive(Debug)]
pub struct RankedMatches {
    pub matches: Vec<NeighborhoodMatch>,
    pub total_candidates: usize,
}

/// Scores neighborhoods against preferences and ranks them
///
/// # Ranking
/// 1. Score every neighborhood independently
/// 2. Sort by match percentage (descending)
/// 3. Break ties by neighborhood id (ascending) so the order doesn't depend
///    on the order rows came back from storage
/// 4. Truncate to the requested limit
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single neighborhood
    pub fn score(&self, preferences: &Preferences, neighborhood: &Neighborhood) -> MatchResult {
        compute_match(preferences, &neighborhood.characteristics, &self.weights)
    }

    /// Score and rank every neighborhood
    pub fn rank(&self, preferences: &Preferences, neighborhoods: &[Neighborhood]) -> RankedMatches {
        self.rank_top(preferences, neighborhoods, neighborhoods.len())
    }

    /// Score every neighborhood and keep the best `limit`
    ///
    /// # Arguments
    /// * `preferences` - The preferences to score against
    /// * `neighborhoods` - Every candidate neighborhood
    /// * `limit` - Maximum number of matches to return
    pub fn rank_top(
        &self,
        preferences: &Preferences,
        neighborhoods: &[Neighborhood],
        limit: usize,
    ) -> RankedMatches {
        let total_candidates = neighborhoods.len();

        let mut matches: Vec<NeighborhoodMatch> = neighborhoods
            .iter()
            .map(|neighborhood| NeighborhoodMatch {
                neighborhood: NeighborhoodSummary::from(neighborhood),
                match_score: self.score(preferences, neighborhood),
            })
            .collect();

        // Stable sort: percentage (descending), then id (ascending)
        matches.sort_by(|a, b| {
            b.match_score
                .percentage
                .cmp(&a.match_score.percentage)
                .then_with(|| a.neighborhood.id.cmp(&b.neighborhood.id))
        });

        matches.truncate(limit);

        tracing::trace!("Ranked {} neighborhoods, keeping {}", total_candidates, matches.len());

        RankedMatches {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
