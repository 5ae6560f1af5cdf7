use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::models::{Location, Neighborhood, NeighborhoodInput, Preferences, User};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

const USER_SELECT: &str = r#"
    SELECT
        u.id, u.name, u.email, u.password_hash, u.preferences, u.created_at,
        COALESCE(
            ARRAY_AGG(s.neighborhood_id ORDER BY s.saved_at)
                FILTER (WHERE s.neighborhood_id IS NOT NULL),
            '{}'
        ) AS saved_neighborhoods
    FROM users u
    LEFT JOIN saved_neighborhoods s ON s.user_id = u.id
"#;

const NEIGHBORHOOD_COLUMNS: &str = r#"
    id, name, city, state, longitude, latitude, characteristics,
    description, images, created_at, updated_at
"#;

/// PostgreSQL store for users, neighborhoods and saved favorites
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool. Migrations are not run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    // Neighborhoods

    /// All neighborhoods, oldest first
    pub async fn list_neighborhoods(&self) -> Result<Vec<Neighborhood>, PostgresError> {
        let query = format!(
            "SELECT {} FROM neighborhoods ORDER BY created_at, id",
            NEIGHBORHOOD_COLUMNS
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let neighborhoods = rows
            .iter()
            .map(neighborhood_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} neighborhoods", neighborhoods.len());

        Ok(neighborhoods)
    }

    pub async fn get_neighborhood(&self, id: Uuid) -> Result<Option<Neighborhood>, PostgresError> {
        let query = format!("SELECT {} FROM neighborhoods WHERE id = $1", NEIGHBORHOOD_COLUMNS);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        row.as_ref()
            .map(neighborhood_from_row)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn create_neighborhood(
        &self,
        input: &NeighborhoodInput,
    ) -> Result<Neighborhood, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO neighborhoods
                (id, name, city, state, longitude, latitude, characteristics, description, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            NEIGHBORHOOD_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.state)
            .bind(input.location.longitude)
            .bind(input.location.latitude)
            .bind(Json(&input.characteristics))
            .bind(&input.description)
            .bind(&input.images)
            .fetch_one(&self.pool)
            .await?;

        let neighborhood = neighborhood_from_row(&row)?;
        tracing::info!("Created neighborhood {} ({})", neighborhood.name, neighborhood.id);

        Ok(neighborhood)
    }

    /// Replace the editable fields of a neighborhood
    pub async fn update_neighborhood(
        &self,
        id: Uuid,
        input: &NeighborhoodInput,
    ) -> Result<Option<Neighborhood>, PostgresError> {
        let query = format!(
            r#"
            UPDATE neighborhoods SET
                name = $2, city = $3, state = $4, longitude = $5, latitude = $6,
                characteristics = $7, description = $8, images = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            NEIGHBORHOOD_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.state)
            .bind(input.location.longitude)
            .bind(input.location.latitude)
            .bind(Json(&input.characteristics))
            .bind(&input.description)
            .bind(&input.images)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(neighborhood_from_row)
            .transpose()
            .map_err(Into::into)
    }

    /// Delete a neighborhood. Returns false if it didn't exist.
    pub async fn delete_neighborhood(&self, id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM neighborhoods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Users

    pub async fn list_users(&self) -> Result<Vec<User>, PostgresError> {
        let query = format!("{} GROUP BY u.id ORDER BY u.created_at", USER_SELECT);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, PostgresError> {
        let query = format!("{} WHERE u.id = $1 GROUP BY u.id", USER_SELECT);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// Look up a user by (already normalized) email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PostgresError> {
        let query = format!("{} WHERE u.email = $1 GROUP BY u.id", USER_SELECT);

        let row = sqlx::query(&query).bind(email).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// Insert a user with empty preferences
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, PostgresError> {
        let query = r#"
            INSERT INTO users (id, name, email, password_hash, preferences)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, preferences, created_at,
                      '{}'::uuid[] AS saved_neighborhoods
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(Json(Preferences::default()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, email))?;

        let user = user_from_row(&row)?;
        tracing::info!("Created user {}", user.id);

        Ok(user)
    }

    /// Update name and/or email. Returns None if the user doesn't exist.
    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, PostgresError> {
        let query = r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .bind(name)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, email.unwrap_or_default()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_user(id).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store a user's full preference set. Returns None if the user doesn't exist.
    pub async fn update_preferences(
        &self,
        id: Uuid,
        preferences: &Preferences,
    ) -> Result<Option<User>, PostgresError> {
        let result = sqlx::query("UPDATE users SET preferences = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(preferences))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tracing::debug!("Updated preferences for user {}", id);
        self.get_user(id).await
    }

    /// Add a neighborhood to a user's favorites
    ///
    /// Returns false if it was already saved.
    pub async fn save_neighborhood(
        &self,
        user_id: Uuid,
        neighborhood_id: Uuid,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            INSERT INTO saved_neighborhoods (user_id, neighborhood_id, saved_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, neighborhood_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(neighborhood_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    PostgresError::NotFound(format!("Neighborhood {}", neighborhood_id))
                }
                other => other.into(),
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a neighborhood from a user's favorites. Removing one that isn't saved is a no-op.
    pub async fn remove_saved_neighborhood(
        &self,
        user_id: Uuid,
        neighborhood_id: Uuid,
    ) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            "DELETE FROM saved_neighborhoods WHERE user_id = $1 AND neighborhood_id = $2",
        )
        .bind(user_id)
        .bind(neighborhood_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_unique_violation(error: sqlx::Error, email: &str) -> PostgresError {
    match error {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            PostgresError::Conflict(format!("User already exists with email {}", email))
        }
        other => other.into(),
    }
}

fn neighborhood_from_row(row: &PgRow) -> Result<Neighborhood, sqlx::Error> {
    Ok(Neighborhood {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        location: Location {
            longitude: row.try_get("longitude")?,
            latitude: row.try_get("latitude")?,
        },
        characteristics: row.try_get::<Json<_>, _>("characteristics")?.0,
        description: row.try_get("description")?,
        images: row.try_get("images")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        preferences: row.try_get::<Json<_>, _>("preferences")?.0,
        saved_neighborhoods: row.try_get("saved_neighborhoods")?,
        created_at: row.try_get("created_at")?,
    })
}
