// HTTP tests for routes that read users from PostgreSQL
//
// Each test gets a fresh migrated database from `#[sqlx::test]`, so these need
// DATABASE_URL pointing at a server the test user may create databases on.

use actix_web::{http::StatusCode, test, web, App};
use neighborfit::config::MatchingSettings;
use neighborfit::core::Matcher;
use neighborfit::models::{
    Amenity, AmenityScores, ErrorResponse, Lifestyle, LifestyleScores, Location,
    NeighborhoodCharacteristics, NeighborhoodInput, NeighborhoodMatch, Preferences, User,
};
use neighborfit::routes::{self, AppState};
use neighborfit::services::{AuthService, CacheManager, PostgresClient};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

fn app_state(pool: PgPool) -> AppState {
    AppState {
        postgres: Arc::new(PostgresClient::from_pool(pool)),
        cache: Arc::new(CacheManager::new(4, 300)),
        auth: Arc::new(AuthService::new("test-secret", 1)),
        matcher: Matcher::with_default_weights(),
        matching: MatchingSettings::default(),
    }
}

fn neighborhood_input(name: &str, urban: f64) -> NeighborhoodInput {
    NeighborhoodInput {
        name: name.to_string(),
        city: "Boston".to_string(),
        state: "MA".to_string(),
        location: Location { longitude: -71.06, latitude: 42.36 },
        characteristics: NeighborhoodCharacteristics {
            lifestyle: LifestyleScores {
                urban,
                ..Default::default()
            },
            cost_of_living: 5.0,
            safety: 7.0,
            amenities: AmenityScores {
                restaurants: 8.0,
                ..Default::default()
            },
            ..Default::default()
        },
        description: format!("{} in Boston", name),
        images: vec![],
    }
}

/// One urban-minded user and four neighborhoods, "Area 3" being the most urban
async fn seed(postgres: &PostgresClient) -> User {
    let user = postgres
        .create_user("Dana", "dana@example.com", "unused-hash")
        .await
        .unwrap();

    let preferences = Preferences {
        lifestyle: Lifestyle::Urban,
        budget: 5000.0,
        safety: 7.0,
        amenities: vec![Amenity::Restaurants],
    };
    let user = postgres
        .update_preferences(user.id, &preferences)
        .await
        .unwrap()
        .unwrap();

    for i in 0..4 {
        postgres
            .create_neighborhood(&neighborhood_input(&format!("Area {}", i), 2.0 + 2.0 * i as f64))
            .await
            .unwrap();
    }

    user
}

#[sqlx::test]
#[ignore = "Requires PostgreSQL"]
async fn test_top_matches_applies_limit(pool: PgPool) {
    let state = app_state(pool);
    let user = seed(&state.postgres).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matching/users/{}/top?limit=2", user.id))
        .to_request();
    let matches: Vec<NeighborhoodMatch> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].neighborhood.name, "Area 3");
    assert_eq!(matches[1].neighborhood.name, "Area 2");

    // Leading integer is used, like "2" above
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matching/users/{}/top?limit=2.5", user.id))
        .to_request();
    let matches: Vec<NeighborhoodMatch> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.len(), 2);

    // Default limit of 5 is larger than the set
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matching/users/{}/top", user.id))
        .to_request();
    let matches: Vec<NeighborhoodMatch> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.len(), 4);
}

#[sqlx::test]
#[ignore = "Requires PostgreSQL"]
async fn test_matches_for_missing_user_is_404(pool: PgPool) {
    let state = app_state(pool);
    seed(&state.postgres).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    for uri in [
        format!("/api/v1/matching/users/{}", Uuid::new_v4()),
        format!("/api/v1/matching/users/{}/top?limit=3", Uuid::new_v4()),
        format!("/api/v1/matching/users/{}/neighborhoods/{}", Uuid::new_v4(), Uuid::new_v4()),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status_code, 404);
        assert!(body.message.contains("User not found"));
    }
}

#[sqlx::test]
#[ignore = "Requires PostgreSQL"]
async fn test_match_details(pool: PgPool) {
    let state = app_state(pool);
    let user = seed(&state.postgres).await;
    let neighborhoods = state.postgres.list_neighborhoods().await.unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matching/users/{}/neighborhoods/{}", user.id, Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.message.contains("Neighborhood not found"));

    let most_urban = neighborhoods
        .iter()
        .find(|n| n.name == "Area 3")
        .unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matching/users/{}/neighborhoods/{}", user.id, most_urban.id))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["user"]["id"], user.id.to_string());
    assert_eq!(body["neighborhood"]["name"], "Area 3");
    assert_eq!(body["matchScore"]["breakdown"]["lifestyle"], 80);
    assert_eq!(body["matchScore"]["breakdown"]["amenities"], 80);
}
