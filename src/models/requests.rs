use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::models::domain::{Amenity, Lifestyle, Location, NeighborhoodCharacteristics, Preferences};

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Request to log in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Profile fields a user may change
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Partial preferences update. Provided fields overwrite stored ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PreferencesUpdate {
    pub lifestyle: Option<Lifestyle>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub safety: Option<f64>,
    pub amenities: Option<Vec<Amenity>>,
}

impl PreferencesUpdate {
    /// Merge this update over `current`, returning the new preferences
    pub fn apply_to(self, current: &Preferences) -> Preferences {
        Preferences {
            lifestyle: self.lifestyle.unwrap_or_else(|| current.lifestyle.clone()),
            budget: self.budget.unwrap_or(current.budget),
            safety: self.safety.unwrap_or(current.safety),
            amenities: self.amenities.unwrap_or_else(|| current.amenities.clone()),
        }
    }
}

/// Request to add or remove a saved neighborhood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedNeighborhoodRequest {
    #[serde(alias = "neighborhood_id", rename = "neighborhoodId")]
    pub neighborhood_id: Uuid,
}

/// Create or replace a neighborhood
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NeighborhoodInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    pub location: Location,
    #[validate(nested)]
    pub characteristics: NeighborhoodCharacteristics,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NeighborhoodInput {
    /// Trim surrounding whitespace from the text fields
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.city = self.city.trim().to_string();
        self.state = self.state.trim().to_string();
        self
    }
}

/// Query string for top-K matching
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopMatchesQuery {
    /// Kept raw: only the leading integer is read (`"3abc"` and `"2.5"` mean
    /// 3 and 2), and anything without a positive one falls back to the default
    pub limit: Option<String>,
}

impl TopMatchesQuery {
    pub fn resolve_limit(&self, default_limit: usize, max_limit: usize) -> usize {
        let limit = self
            .limit
            .as_deref()
            .and_then(leading_integer)
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit);

        limit.min(max_limit)
    }
}

/// Leading unsigned integer of `raw`, after whitespace and an optional `+`.
/// Negative values yield `None`; overflow saturates.
fn leading_integer(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() {
        return None;
    }

    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_merge_keeps_unset_fields() {
        let current = Preferences {
            lifestyle: Lifestyle::Quiet,
            budget: 2500.0,
            safety: 8.0,
            amenities: vec![Amenity::Parks],
        };

        let update = PreferencesUpdate {
            budget: Some(4000.0),
            ..Default::default()
        };

        let merged = update.apply_to(&current);
        assert_eq!(merged.lifestyle, Lifestyle::Quiet);
        assert_eq!(merged.budget, 4000.0);
        assert_eq!(merged.safety, 8.0);
        assert_eq!(merged.amenities, vec![Amenity::Parks]);
    }

    #[test]
    fn test_preferences_update_validation() {
        let update = PreferencesUpdate {
            safety: Some(11.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_resolve_limit() {
        let query = |raw: Option<&str>| TopMatchesQuery {
            limit: raw.map(str::to_string),
        };

        assert_eq!(query(None).resolve_limit(5, 50), 5);
        assert_eq!(query(Some("3")).resolve_limit(5, 50), 3);
        assert_eq!(query(Some("abc")).resolve_limit(5, 50), 5);
        assert_eq!(query(Some("0")).resolve_limit(5, 50), 5);
        assert_eq!(query(Some("-2")).resolve_limit(5, 50), 5);
        assert_eq!(query(Some("500")).resolve_limit(5, 50), 50);
    }

    #[test]
    fn test_resolve_limit_reads_leading_integer() {
        let query = |raw: &str| TopMatchesQuery {
            limit: Some(raw.to_string()),
        };

        assert_eq!(query("3abc").resolve_limit(5, 50), 3);
        assert_eq!(query("2.5").resolve_limit(5, 50), 2);
        assert_eq!(query(" +4").resolve_limit(5, 50), 4);
        assert_eq!(query("0.9").resolve_limit(5, 50), 5);
        assert_eq!(query("x3").resolve_limit(5, 50), 5);
        assert_eq!(query("99999999999999999999999").resolve_limit(5, 50), 50);
    }

    #[test]
    fn test_register_request_validation() {
        let bad = RegisterRequest {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
