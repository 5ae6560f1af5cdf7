use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;
use crate::models::{HealthResponse, MatchDetailResponse, Preferences, TopMatchesQuery, User};
use crate::routes::{auth::AuthenticatedUser, ApiError, AppState};

/// Configure health and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/preview", web::post().to(preview_matches))
        .route("/matching/me", web::get().to(my_matches))
        .route("/matching/me/top", web::get().to(my_top_matches))
        .route("/matching/users/{user_id}", web::get().to(get_matches))
        .route("/matching/users/{user_id}/top", web::get().to(get_top_matches))
        .route(
            "/matching/users/{user_id}/neighborhoods/{neighborhood_id}",
            web::get().to(get_match_details),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };
    let cache_stats = state.cache.stats();

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache_entries: cache_stats.entries,
    })
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state
        .postgres
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Rank every neighborhood for a set of preferences, keeping at most `limit`
async fn ranked_response(
    state: &AppState,
    preferences: &Preferences,
    limit: Option<usize>,
) -> Result<HttpResponse, ApiError> {
    let neighborhoods = state.neighborhoods().await?;
    let limit = limit.unwrap_or(neighborhoods.len());

    let result = state.matcher.rank_top(preferences, &neighborhoods, limit);

    tracing::debug!(
        "Returning {} matches (from {} neighborhoods)",
        result.matches.len(),
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(result.matches))
}

/// All matches for a stored user
///
/// GET /api/v1/matching/users/{userId}
async fn get_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user = load_user(&state, path.into_inner()).await?;

    tracing::info!("Finding matches for user: {}", user.id);
    ranked_response(&state, &user.preferences, None).await
}

/// Top matches for a stored user
///
/// GET /api/v1/matching/users/{userId}/top?limit=5
async fn get_top_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<TopMatchesQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = load_user(&state, path.into_inner()).await?;
    let limit = query.resolve_limit(state.matching.default_limit, state.matching.max_limit);

    tracing::info!("Finding top {} matches for user: {}", limit, user.id);
    ranked_response(&state, &user.preferences, Some(limit)).await
}

/// Score one neighborhood for one user, returning both inputs
///
/// GET /api/v1/matching/users/{userId}/neighborhoods/{neighborhoodId}
async fn get_match_details(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, neighborhood_id) = path.into_inner();

    let user = load_user(&state, user_id).await?;
    let neighborhood = state
        .postgres
        .get_neighborhood(neighborhood_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Neighborhood not found".to_string()))?;

    let match_score = state.matcher.score(&user.preferences, &neighborhood);

    Ok(HttpResponse::Ok().json(MatchDetailResponse::new(&user, &neighborhood, match_score)))
}

/// Score preferences that haven't been saved
///
/// POST /api/v1/matching/preview
///
/// Request body:
/// ```json
/// {
///   "lifestyle": "urban",
///   "budget": 5000,
///   "safety": 7,
///   "amenities": ["restaurants", "nightlife"]
/// }
/// ```
async fn preview_matches(
    state: web::Data<AppState>,
    req: web::Json<Preferences>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    ranked_response(&state, &req, Some(state.matching.preview_limit)).await
}

/// All matches for the authenticated user
///
/// GET /api/v1/matching/me
async fn my_matches(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = load_user(&state, auth.id()).await?;
    ranked_response(&state, &user.preferences, None).await
}

/// Top matches for the authenticated user
///
/// GET /api/v1/matching/me/top?limit=5
async fn my_top_matches(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<TopMatchesQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = load_user(&state, auth.id()).await?;
    let limit = query.resolve_limit(state.matching.default_limit, state.matching.max_limit);

    ranked_response(&state, &user.preferences, Some(limit)).await
}
