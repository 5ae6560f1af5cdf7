use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// Lifestyle category a user can declare
///
/// Values that arrive from unvalidated input (e.g. an HTTP body) and don't
/// name one of the five categories are kept as `Unrecognized`. They never
/// contribute to a match score. Non-string JSON (`null`, numbers) is
/// accepted too and becomes `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Lifestyle {
    Active,
    FamilyOriented,
    Quiet,
    Social,
    Urban,
    Unrecognized(String),
}

impl Lifestyle {
    pub const ALL: [Lifestyle; 5] = [
        Lifestyle::Active,
        Lifestyle::FamilyOriented,
        Lifestyle::Quiet,
        Lifestyle::Social,
        Lifestyle::Urban,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Lifestyle::Active => "active",
            Lifestyle::FamilyOriented => "family-oriented",
            Lifestyle::Quiet => "quiet",
            Lifestyle::Social => "social",
            Lifestyle::Urban => "urban",
            Lifestyle::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Lifestyle::Unrecognized(_))
    }
}

impl Default for Lifestyle {
    fn default() -> Self {
        Lifestyle::Unrecognized(String::new())
    }
}

impl From<String> for Lifestyle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => Lifestyle::Active,
            "family-oriented" => Lifestyle::FamilyOriented,
            "quiet" => Lifestyle::Quiet,
            "social" => Lifestyle::Social,
            "urban" => Lifestyle::Urban,
            _ => Lifestyle::Unrecognized(value),
        }
    }
}

impl<'de> Deserialize<'de> for Lifestyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => Lifestyle::from(raw),
            other => Lifestyle::Unrecognized(unrecognized_label(other)),
        })
    }
}

impl From<Lifestyle> for String {
    fn from(value: Lifestyle) -> Self {
        match value {
            Lifestyle::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Amenity a user can ask for
///
/// `publicTransport` is accepted as an alias of `public_transport`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Amenity {
    Parks,
    Schools,
    Restaurants,
    Shopping,
    Nightlife,
    PublicTransport,
    Healthcare,
    Unrecognized(String),
}

impl Amenity {
    pub fn as_str(&self) -> &str {
        match self {
            Amenity::Parks => "parks",
            Amenity::Schools => "schools",
            Amenity::Restaurants => "restaurants",
            Amenity::Shopping => "shopping",
            Amenity::Nightlife => "nightlife",
            Amenity::PublicTransport => "public_transport",
            Amenity::Healthcare => "healthcare",
            Amenity::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Amenity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "parks" => Amenity::Parks,
            "schools" => Amenity::Schools,
            "restaurants" => Amenity::Restaurants,
            "shopping" => Amenity::Shopping,
            "nightlife" => Amenity::Nightlife,
            "public_transport" | "publicTransport" => Amenity::PublicTransport,
            "healthcare" => Amenity::Healthcare,
            _ => Amenity::Unrecognized(value),
        }
    }
}

impl<'de> Deserialize<'de> for Amenity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => Amenity::from(raw),
            other => Amenity::Unrecognized(unrecognized_label(other)),
        })
    }
}

impl From<Amenity> for String {
    fn from(value: Amenity) -> Self {
        match value {
            Amenity::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Raw text kept for a non-string category value; `null` keeps nothing
fn unrecognized_label(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// User matching preferences
///
/// Every field has a default because stored preferences are schemaless:
/// a freshly registered user has none at all. `null` counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Preferences {
    #[serde(deserialize_with = "null_as_default")]
    pub lifestyle: Lifestyle,
    /// Target monthly cost in raw currency units
    #[serde(deserialize_with = "null_as_default")]
    #[validate(range(min = 0.0))]
    pub budget: f64,
    /// Minimum acceptable safety rating (1-10)
    #[serde(deserialize_with = "null_as_default")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub safety: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub amenities: Vec<Amenity>,
}

/// Per-lifestyle fit of a neighborhood, each in [1, 10]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifestyleScores {
    pub active: f64,
    pub family_oriented: f64,
    pub quiet: f64,
    pub social: f64,
    pub urban: f64,
}

impl LifestyleScores {
    /// Score for a declared lifestyle; unrecognized categories score 0
    #[inline]
    pub fn score_for(&self, lifestyle: &Lifestyle) -> f64 {
        match lifestyle {
            Lifestyle::Active => self.active,
            Lifestyle::FamilyOriented => self.family_oriented,
            Lifestyle::Quiet => self.quiet,
            Lifestyle::Social => self.social,
            Lifestyle::Urban => self.urban,
            Lifestyle::Unrecognized(_) => 0.0,
        }
    }
}

/// Per-amenity rating of a neighborhood, each in [0, 10]. Missing ratings are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmenityScores {
    pub parks: f64,
    pub schools: f64,
    pub restaurants: f64,
    pub shopping: f64,
    pub nightlife: f64,
    pub public_transport: f64,
    pub healthcare: f64,
}

impl AmenityScores {
    #[inline]
    pub fn score_for(&self, amenity: &Amenity) -> f64 {
        match amenity {
            Amenity::Parks => self.parks,
            Amenity::Schools => self.schools,
            Amenity::Restaurants => self.restaurants,
            Amenity::Shopping => self.shopping,
            Amenity::Nightlife => self.nightlife,
            Amenity::PublicTransport => self.public_transport,
            Amenity::Healthcare => self.healthcare,
            Amenity::Unrecognized(_) => 0.0,
        }
    }
}

/// Commute ratings. Stored and returned, not used for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommuteOptions {
    pub walkability: f64,
    pub public_transit: f64,
    pub cycling: f64,
    pub driving: f64,
}

/// Characteristic vector of a neighborhood
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodCharacteristics {
    #[serde(default)]
    pub lifestyle: LifestyleScores,
    /// Relative cost index (1-10)
    #[validate(range(min = 1.0, max = 10.0))]
    pub cost_of_living: f64,
    /// Safety rating (1-10)
    #[validate(range(min = 1.0, max = 10.0))]
    pub safety: f64,
    #[serde(default)]
    pub amenities: AmenityScores,
    #[serde(default)]
    pub commute_options: CommuteOptions,
}

/// Geographic position of a neighborhood
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

/// Stored neighborhood record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub location: Location,
    pub characteristics: NeighborhoodCharacteristics,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Neighborhood fields shown next to a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodSummary {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: String,
    pub description: String,
    pub images: Vec<String>,
}

impl From<&Neighborhood> for NeighborhoodSummary {
    fn from(neighborhood: &Neighborhood) -> Self {
        Self {
            id: neighborhood.id,
            name: neighborhood.name.clone(),
            city: neighborhood.city.clone(),
            state: neighborhood.state.clone(),
            description: neighborhood.description.clone(),
            images: neighborhood.images.clone(),
        }
    }
}

/// Stored user record. The password hash is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub preferences: Preferences,
    #[serde(rename = "savedNeighborhoods")]
    pub saved_neighborhoods: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Per-category percentages (0-100), independent of category weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub lifestyle: u8,
    pub budget: u8,
    pub safety: u8,
    pub amenities: u8,
}

/// Outcome of scoring one neighborhood against one set of preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Raw weighted sum; only meaningful relative to the max possible score
    pub score: f64,
    /// Overall match, 0-100. Used for ranking.
    pub percentage: u8,
    pub breakdown: MatchBreakdown,
}

/// A scored neighborhood in a ranked list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodMatch {
    pub neighborhood: NeighborhoodSummary,
    #[serde(rename = "matchScore")]
    pub match_score: MatchResult,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub lifestyle: f64,
    pub budget: f64,
    pub safety: f64,
    pub amenities: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.lifestyle + self.budget + self.safety + self.amenities
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            lifestyle: 0.30,
            budget: 0.25,
            safety: 0.20,
            amenities: 0.25,
        }
    }
}
