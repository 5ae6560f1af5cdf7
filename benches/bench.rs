// Criterion benchmarks for NeighborFit

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use neighborfit::core::{compute_match, Matcher};
use neighborfit::models::{
    Amenity, AmenityScores, Lifestyle, LifestyleScores, Location, Neighborhood,
    NeighborhoodCharacteristics, Preferences, ScoringWeights,
};
use uuid::Uuid;

fn create_neighborhood(id: usize) -> Neighborhood {
    let rating = |offset: usize| 1.0 + ((id + offset) % 10) as f64;

    Neighborhood {
        id: Uuid::from_u128(id as u128),
        name: format!("Neighborhood {}", id),
        city: "Seattle".to_string(),
        state: "WA".to_string(),
        location: Location { longitude: -122.33, latitude: 47.61 },
        characteristics: NeighborhoodCharacteristics {
            lifestyle: LifestyleScores {
                active: rating(0),
                family_oriented: rating(1),
                quiet: rating(2),
                social: rating(3),
                urban: rating(4),
            },
            cost_of_living: rating(5),
            safety: rating(6),
            amenities: AmenityScores {
                parks: rating(7),
                schools: rating(8),
                restaurants: rating(9),
                shopping: rating(1),
                nightlife: rating(2),
                public_transport: rating(3),
                healthcare: rating(4),
            },
            ..Default::default()
        },
        description: String::new(),
        images: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_preferences() -> Preferences {
    Preferences {
        lifestyle: Lifestyle::Active,
        budget: 4500.0,
        safety: 7.0,
        amenities: vec![Amenity::Parks, Amenity::PublicTransport, Amenity::Healthcare],
    }
}

fn bench_compute_match(c: &mut Criterion) {
    let preferences = create_preferences();
    let neighborhood = create_neighborhood(3);
    let weights = ScoringWeights::default();

    c.bench_function("compute_match", |b| {
        b.iter(|| {
            compute_match(
                black_box(&preferences),
                black_box(&neighborhood.characteristics),
                black_box(&weights),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let preferences = create_preferences();

    let mut group = c.benchmark_group("ranking");

    for neighborhood_count in [10, 50, 100, 500, 1000].iter() {
        let neighborhoods: Vec<Neighborhood> = (0..*neighborhood_count).map(create_neighborhood).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_top", neighborhood_count),
            neighborhood_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank_top(
                        black_box(&preferences),
                        black_box(&neighborhoods),
                        black_box(10),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compute_match, bench_ranking);

criterion_main!(benches);
