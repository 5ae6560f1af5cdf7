// Route exports
pub mod auth;
pub mod error;
pub mod matching;
pub mod neighborhoods;
pub mod users;

use actix_web::web;
use std::sync::Arc;
use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::Neighborhood;
use crate::services::{AuthService, CacheManager, PostgresClient};

pub use error::ApiError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub auth: Arc<AuthService>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl AppState {
    /// Full neighborhood list, from the cache when possible
    pub async fn neighborhoods(&self) -> Result<Arc<Vec<Neighborhood>>, ApiError> {
        if let Some(cached) = self.cache.get_neighborhoods().await {
            return Ok(cached);
        }

        let generation = self.cache.generation();
        let neighborhoods = self.postgres.list_neighborhoods().await?;
        Ok(self.cache.set_neighborhoods_at(neighborhoods, generation).await)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matching::configure)
            .configure(neighborhoods::configure)
            .configure(users::configure)
            .configure(auth::configure),
    );
}
