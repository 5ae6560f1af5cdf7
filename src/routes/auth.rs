use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};
use uuid::Uuid;
use validator::Validate;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::routes::{ApiError, AppState};
use crate::services::AuthService;

/// Configure authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login))
        .route("/auth/me", web::get().to(me));
}

/// User id taken from a verified `Authorization: Bearer` token
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.0
    }

    /// Only allow a user to act on their own record
    pub fn require_self(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.0 == user_id {
            Ok(())
        } else {
            tracing::info!("User {} tried to modify user {}", self.0, user_id);
            Err(ApiError::Forbidden("Not allowed to modify another user".to_string()))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state not configured".to_string()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user_id = state.auth.verify_bearer(header_value)?;
    Ok(AuthenticatedUser(user_id))
}

/// Emails are stored trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register endpoint
///
/// POST /api/v1/auth/register
///
/// Request body:
/// ```json
/// { "name": "string", "email": "string", "password": "string" }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let RegisterRequest { name, email, password } = req.into_inner();
    let email = normalize_email(&email);

    if state.postgres.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists with this email".to_string()));
    }

    let password_hash = web::block(move || AuthService::hash_password(&password)).await??;
    let user = state
        .postgres
        .create_user(name.trim(), &email, &password_hash)
        .await?;

    let token = state.auth.issue_token(user.id)?;

    tracing::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

/// Login endpoint
///
/// POST /api/v1/auth/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let LoginRequest { email, password } = req.into_inner();
    let invalid = || ApiError::BadRequest("Invalid credentials".to_string());

    let user = state
        .postgres
        .find_user_by_email(&normalize_email(&email))
        .await?
        .ok_or_else(invalid)?;

    let hash = user.password_hash.clone();
    let matches = web::block(move || AuthService::verify_password(&password, &hash)).await??;
    if !matches {
        tracing::info!("Failed login for user {}", user.id);
        return Err(invalid());
    }

    let token = state.auth.issue_token(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

/// Current user endpoint
///
/// GET /api/v1/auth/me
async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .postgres
        .get_user(auth.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_require_self() {
        let id = Uuid::new_v4();
        let auth = AuthenticatedUser(id);

        assert!(auth.require_self(id).is_ok());
        assert!(matches!(auth.require_self(Uuid::new_v4()), Err(ApiError::Forbidden(_))));
    }
}
