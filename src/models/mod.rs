// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Amenity, AmenityScores, CommuteOptions, Lifestyle, LifestyleScores, Location, MatchBreakdown,
    MatchResult, Neighborhood, NeighborhoodCharacteristics, NeighborhoodMatch, NeighborhoodSummary,
    Preferences, ScoringWeights, User,
};
pub use requests::{
    LoginRequest, NeighborhoodInput, PreferencesUpdate, RegisterRequest, SavedNeighborhoodRequest,
    TopMatchesQuery, UpdateUserRequest,
};
pub use responses::{
    AuthResponse, ErrorResponse, HealthResponse, MatchDetailResponse, MessageResponse,
};
