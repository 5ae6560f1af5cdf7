use crate::models::{
    Amenity, Lifestyle, MatchBreakdown, MatchResult, NeighborhoodCharacteristics, Preferences,
    ScoringWeights,
};

/// Highest score any single category can reach
pub const MAX_CATEGORY_SCORE: f64 = 10.0;

/// Currency units per step of the 1-10 cost-of-living index
pub const BUDGET_SCALE: f64 = 1000.0;

/// Convert a raw monthly budget into the cost-of-living index scale
///
/// Assumes neighborhoods cost on the order of 1000-10000 per month, so a
/// budget of 5000 lines up with a cost-of-living index of 5.
#[inline]
pub fn budget_to_cost_index(budget: f64) -> f64 {
    budget / BUDGET_SCALE
}

/// Calculate how well a neighborhood fits a set of preferences
///
/// Scoring formula (default weights):
/// score = (
///     lifestyle_score * 0.30 +     # Neighborhood's rating for the chosen lifestyle
///     budget_score * 0.25 +        # Closeness of budget to cost of living
///     safety_score * 0.20 +        # Full credit once the safety bar is met
///     amenities_score * 0.25       # Mean rating of the requested amenities
/// )
///
/// Each category scores 0-10. `percentage` normalizes the weighted sum
/// against `10 * sum(weights)`; the breakdown reports each category on its
/// own 0-100 scale regardless of weight.
///
/// Never fails: unrecognized lifestyles, unknown amenities and an empty
/// amenity list all contribute zero.
pub fn compute_match(
    preferences: &Preferences,
    characteristics: &NeighborhoodCharacteristics,
    weights: &ScoringWeights,
) -> MatchResult {
    let lifestyle_score = calculate_lifestyle_score(&preferences.lifestyle, characteristics);
    let budget_score = calculate_budget_score(preferences.budget, characteristics.cost_of_living);
    let safety_score = calculate_safety_score(preferences.safety, characteristics.safety);
    let amenities_score = calculate_amenities_score(&preferences.amenities, characteristics);

    let total_score = lifestyle_score * weights.lifestyle
        + budget_score * weights.budget
        + safety_score * weights.safety
        + amenities_score * weights.amenities;

    let max_possible_score = MAX_CATEGORY_SCORE * weights.total();
    let percentage = if max_possible_score > 0.0 {
        to_percent(total_score / max_possible_score)
    } else {
        0
    };

    MatchResult {
        score: total_score,
        percentage,
        breakdown: MatchBreakdown {
            lifestyle: to_percent(lifestyle_score / MAX_CATEGORY_SCORE),
            budget: to_percent(budget_score / MAX_CATEGORY_SCORE),
            safety: to_percent(safety_score / MAX_CATEGORY_SCORE),
            amenities: to_percent(amenities_score / MAX_CATEGORY_SCORE),
        },
    }
}

/// Lifestyle score (0-10): the neighborhood's rating for the declared lifestyle
#[inline]
fn calculate_lifestyle_score(
    lifestyle: &Lifestyle,
    characteristics: &NeighborhoodCharacteristics,
) -> f64 {
    characteristics.lifestyle.score_for(lifestyle)
}

/// Budget score (0-10)
/// Loses one point per index step between budget and cost of living
#[inline]
fn calculate_budget_score(budget: f64, cost_of_living: f64) -> f64 {
    let deviation = (budget_to_cost_index(budget) - cost_of_living).abs();
    (MAX_CATEGORY_SCORE - deviation).clamp(0.0, MAX_CATEGORY_SCORE)
}

/// Safety score (0-10)
/// Meeting the desired rating gets full credit, near misses scale proportionally
#[inline]
fn calculate_safety_score(desired: f64, actual: f64) -> f64 {
    if actual >= desired || desired <= 0.0 {
        return MAX_CATEGORY_SCORE;
    }

    (actual / desired) * MAX_CATEGORY_SCORE
}

/// Amenities score (0-10): mean rating of the requested amenities
/// Requesting no amenities scores 0
#[inline]
fn calculate_amenities_score(
    amenities: &[Amenity],
    characteristics: &NeighborhoodCharacteristics,
) -> f64 {
    if amenities.is_empty() {
        return 0.0;
    }

    let sum: f64 = amenities
        .iter()
        .map(|amenity| characteristics.amenities.score_for(amenity))
        .sum();

    sum / amenities.len() as f64
}

/// Convert a 0-1 fraction to a whole percentage, rounding halves up
#[inline]
fn to_percent(fraction: f64) -> u8 {
    // NaN saturates to 0 in the cast
    (fraction * 100.0 + 0.5).floor().clamp(0.0, 100.0) as u8
}
