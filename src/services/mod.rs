// Service exports
pub mod auth;
pub mod cache;
pub mod postgres;

pub use auth::{AuthError, AuthService, Claims};
pub use cache::{CacheKey, CacheManager, CacheStats};
pub use postgres::{PostgresClient, PostgresError};
