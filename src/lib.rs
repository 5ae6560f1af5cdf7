//! NeighborFit - neighborhood matching service
//!
//! This library provides the preference-to-neighborhood scoring engine used by
//! NeighborFit, plus the HTTP service around it: batch ranking, user and
//! neighborhood storage, and token authentication.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{budget_to_cost_index, compute_match, Matcher, RankedMatches};
pub use models::{
    Amenity, Lifestyle, MatchBreakdown, MatchResult, Neighborhood, NeighborhoodCharacteristics,
    NeighborhoodMatch, Preferences, ScoringWeights,
};
