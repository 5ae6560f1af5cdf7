use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{MatchResult, Neighborhood, NeighborhoodCharacteristics, Preferences, User};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Entries currently held in the neighborhood cache
    pub cache_entries: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Token plus the authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// User fields shown on the match detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetailUser {
    pub id: Uuid,
    pub name: String,
    pub preferences: Preferences,
}

/// Neighborhood fields shown on the match detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetailNeighborhood {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub characteristics: NeighborhoodCharacteristics,
}

/// Single user/neighborhood match with both inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetailResponse {
    pub user: MatchDetailUser,
    pub neighborhood: MatchDetailNeighborhood,
    #[serde(rename = "matchScore")]
    pub match_score: MatchResult,
}

impl MatchDetailResponse {
    pub fn new(user: &User, neighborhood: &Neighborhood, match_score: MatchResult) -> Self {
        Self {
            user: MatchDetailUser {
                id: user.id,
                name: user.name.clone(),
                preferences: user.preferences.clone(),
            },
            neighborhood: MatchDetailNeighborhood {
                id: neighborhood.id,
                name: neighborhood.name.clone(),
                city: neighborhood.city.clone(),
                state: neighborhood.state.clone(),
                characteristics: neighborhood.characteristics.clone(),
            },
            match_score,
        }
    }
}
