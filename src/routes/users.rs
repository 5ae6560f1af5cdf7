use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;
use crate::models::{MessageResponse, PreferencesUpdate, SavedNeighborhoodRequest, UpdateUserRequest};
use crate::routes::{
    auth::{normalize_email, AuthenticatedUser},
    ApiError, AppState,
};

/// Configure user routes
///
/// Reads need any valid token; writes need the token of the user being changed.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/users", web::get().to(list_users))
        .route("/users/{id}", web::get().to(get_user))
        .route("/users/{id}", web::put().to(update_user))
        .route("/users/{id}", web::delete().to(delete_user))
        .route("/users/{id}/preferences", web::put().to(update_preferences))
        .route("/users/{id}/neighborhoods", web::post().to(save_neighborhood))
        .route("/users/{id}/neighborhoods", web::delete().to(remove_neighborhood));
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

async fn list_users(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let users = state.postgres.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .postgres
        .get_user(path.into_inner())
        .await?
        .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(user))
}

async fn update_user(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.require_self(id)?;
    req.validate()?;

    let name = req.name.as_deref().map(str::trim);
    let email = req.email.as_deref().map(normalize_email);

    let user = state
        .postgres
        .update_user(id, name, email.as_deref())
        .await?
        .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(user))
}

async fn delete_user(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.require_self(id)?;

    if !state.postgres.delete_user(id).await? {
        return Err(user_not_found());
    }

    tracing::info!("Deleted user {}", id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// Merge new preferences over the stored ones
///
/// PUT /api/v1/users/{id}/preferences
///
/// Request body (every field optional):
/// ```json
/// { "lifestyle": "quiet", "budget": 3000, "safety": 8, "amenities": ["parks"] }
/// ```
async fn update_preferences(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<PreferencesUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.require_self(id)?;
    req.validate()?;

    let current = state
        .postgres
        .get_user(id)
        .await?
        .ok_or_else(user_not_found)?;

    let preferences = req.into_inner().apply_to(&current.preferences);

    let user = state
        .postgres
        .update_preferences(id, &preferences)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(user))
}

async fn save_neighborhood(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<SavedNeighborhoodRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.require_self(id)?;

    if state.postgres.get_user(id).await?.is_none() {
        return Err(user_not_found());
    }

    if !state.postgres.save_neighborhood(id, req.neighborhood_id).await? {
        return Err(ApiError::BadRequest("Neighborhood already saved".to_string()));
    }

    let user = state.postgres.get_user(id).await?.ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(user))
}

async fn remove_neighborhood(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<SavedNeighborhoodRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.require_self(id)?;

    let removed = state
        .postgres
        .remove_saved_neighborhood(id, req.neighborhood_id)
        .await?;
    tracing::debug!("Removed saved neighborhood {} for {}: {}", req.neighborhood_id, id, removed);

    let user = state.postgres.get_user(id).await?.ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(user))
}
