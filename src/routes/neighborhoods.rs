use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;
use crate::models::{MessageResponse, NeighborhoodInput};
use crate::routes::{auth::AuthenticatedUser, ApiError, AppState};

/// Configure neighborhood routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/neighborhoods", web::get().to(list_neighborhoods))
        .route("/neighborhoods", web::post().to(create_neighborhood))
        .route("/neighborhoods/{id}", web::get().to(get_neighborhood))
        .route("/neighborhoods/{id}", web::put().to(update_neighborhood))
        .route("/neighborhoods/{id}", web::delete().to(delete_neighborhood));
}

async fn list_neighborhoods(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let neighborhoods = state.neighborhoods().await?;
    Ok(HttpResponse::Ok().json(neighborhoods.as_slice()))
}

async fn get_neighborhood(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let neighborhood = state
        .postgres
        .get_neighborhood(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Neighborhood not found".to_string()))?;

    Ok(HttpResponse::Ok().json(neighborhood))
}

async fn create_neighborhood(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
    req: web::Json<NeighborhoodInput>,
) -> Result<HttpResponse, ApiError> {
    let input = req.into_inner().normalized();
    input.validate()?;

    let neighborhood = state.postgres.create_neighborhood(&input).await?;
    state.cache.invalidate_neighborhoods().await;

    Ok(HttpResponse::Created().json(neighborhood))
}

async fn update_neighborhood(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<NeighborhoodInput>,
) -> Result<HttpResponse, ApiError> {
    let input = req.into_inner().normalized();
    input.validate()?;

    let neighborhood = state
        .postgres
        .update_neighborhood(path.into_inner(), &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Neighborhood not found".to_string()))?;
    state.cache.invalidate_neighborhoods().await;

    Ok(HttpResponse::Ok().json(neighborhood))
}

async fn delete_neighborhood(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if !state.postgres.delete_neighborhood(id).await? {
        return Err(ApiError::NotFound("Neighborhood not found".to_string()));
    }
    state.cache.invalidate_neighborhoods().await;

    tracing::info!("Deleted neighborhood {}", id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Neighborhood deleted successfully")))
}
