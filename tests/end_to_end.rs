//! End-to-end tests for the band performance analysis
//!
//! These run the public API the way the CLI does:
//! - Aggregation of games into bands and opponents
//! - Identity resolution against a reference store
//! - The analysis service over a static game source

use chess_band_performance::config::{AppConfig, MatchingSettings};
use chess_band_performance::database;
use chess_band_performance::domain::{Band, GameOutcome, GameRecord, RatingSource, ReferenceRecord};
use chess_band_performance::identity::{IdentityResolver, MatchMethod};
use chess_band_performance::pipeline::{AggregationPipeline, OpponentLookups, PipelineOptions};
use chess_band_performance::rating::{BandClassifier, PerformanceEstimator};
use chess_band_performance::reference::ReferenceStore;
use chess_band_performance::services::{AnalysisRequest, AnalysisService};
use chess_band_performance::sources::StaticSource;
use chrono::{NaiveDate, TimeZone, Utc};

fn game(opponent: &str, rating: i32, result: GameOutcome) -> GameRecord {
    GameRecord {
        opponent_identifier: opponent.to_string(),
        opponent_platform_rating: rating,
        result,
        timestamp: Utc.with_ymd_and_hms(2024, 5, 14, 19, 0, 0).unwrap(),
        time_control: "180".to_string(),
        time_class: "blitz".to_string(),
        is_tournament: true,
        player_rating: Some(3000),
        tournament: None,
        url: None,
    }
}

fn pipeline() -> AggregationPipeline {
    AggregationPipeline::new(
        PipelineOptions::default(),
        BandClassifier::standard(),
        PerformanceEstimator::default(),
    )
}

fn reference_store() -> ReferenceStore {
    ReferenceStore::from_records(vec![
        ReferenceRecord {
            canonical_name: "Duda, Jan-Krzysztof".to_string(),
            rating: 2780,
        },
        ReferenceRecord {
            canonical_name: "Carlsen, Magnus".to_string(),
            rating: 2886,
        },
    ])
}

#[test]
fn test_four_games_split_into_two_bands() {
    let games = vec![
        game("opponent_a", 2550, GameOutcome::Win),
        game("opponent_b", 2550, GameOutcome::Draw),
        game("opponent_c", 2650, GameOutcome::Loss),
        game("opponent_d", 2650, GameOutcome::Win),
    ];

    let report = pipeline().run(&games, &OpponentLookups::default()).unwrap();

    assert_eq!(report.bands.len(), 2);

    let low = &report.bands[0].aggregate;
    assert_eq!(low.band, Band::B500);
    assert_eq!(low.games, 2);
    assert_eq!(low.score, 1.5);
    assert_eq!(low.avg_rating, 2550.0);

    let high = &report.bands[1].aggregate;
    assert_eq!(high.band, Band::B600);
    assert_eq!(high.games, 2);
    assert_eq!(high.score, 1.0);
    assert_eq!(high.avg_rating, 2650.0);

    let overall = report.overall.unwrap();
    assert_eq!(overall.games, 4);
    assert_eq!(overall.score, 2.5);
    assert_eq!(report.opponents.len(), 4);
    assert_eq!(report.diagnostics.skipped_rows, 0);
}

#[test]
fn test_no_games_is_an_empty_report() {
    let report = pipeline().run(&[], &OpponentLookups::default()).unwrap();

    assert!(report.is_empty());
    assert!(report.bands.is_empty());
    assert!(report.opponents.is_empty());
    assert!(report.overall.is_none());
    assert_eq!(report.diagnostics.skipped_rows, 0);
}

#[test]
fn test_resolver_matches_reordered_name_and_rejects_stranger() {
    let store = reference_store();
    let mut resolver = IdentityResolver::new(&store, &MatchingSettings::default()).unwrap();

    let duda = resolver.resolve("polish_blitz_fan", Some("duda jankrzysztof")).unwrap();
    assert_eq!(duda.record.canonical_name, "Duda, Jan-Krzysztof");
    assert_eq!(duda.method, MatchMethod::Normalized);

    assert!(resolver.resolve("johnsmith", Some("John Smith")).is_none());
}

#[test]
fn test_single_win_against_2900_is_bounded() {
    let estimator = PerformanceEstimator::default();
    let result = estimator
        .estimate("single", &[(2900.0, GameOutcome::Win)])
        .unwrap();

    assert!(result.performance_rating.is_finite());
    assert!(result.performance_rating > 2900.0 + 400.0);
    assert_eq!(result.performance_rating, 2900.0 + AppConfig::new().estimator.max_displacement);
}

#[test]
fn test_reference_bands_override_platform_rating() {
    let games = vec![
        game("MagnusCarlsen", 2650, GameOutcome::Draw),
        game("MagnusCarlsen", 2650, GameOutcome::Loss),
        game("unknown_gm", 2650, GameOutcome::Win),
    ];
    let store = reference_store();
    let resolver = IdentityResolver::new(&store, &MatchingSettings::default()).unwrap();
    let options = PipelineOptions {
        use_reference_bands: true,
        ..PipelineOptions::default()
    };
    let mut pipeline = AggregationPipeline::new(
        options,
        BandClassifier::standard(),
        PerformanceEstimator::default(),
    )
    .with_resolver(resolver);

    let report = pipeline.run(&games, &OpponentLookups::default()).unwrap();

    let carlsen = &report.opponents[0];
    assert_eq!(carlsen.aggregate.identifier, "MagnusCarlsen");
    assert_eq!(carlsen.aggregate.rating_source, RatingSource::Reference);
    assert_eq!(carlsen.aggregate.band, Some(Band::B800Plus));

    let unknown = &report.opponents[1];
    assert_eq!(unknown.aggregate.rating_source, RatingSource::Platform);
    assert_eq!(unknown.aggregate.band, Some(Band::B600));

    assert_eq!(report.diagnostics.resolved_opponents, 1);
    assert_eq!(report.diagnostics.fallback_opponents, 1);
}

#[tokio::test]
async fn test_service_runs_and_saves_report() {
    let source = StaticSource::new(vec![
        game("opponent_a", 2550, GameOutcome::Win),
        game("opponent_b", 2550, GameOutcome::Draw),
        game("opponent_c", 2650, GameOutcome::Loss),
        game("opponent_d", 2650, GameOutcome::Win),
        game("club_player", 1900, GameOutcome::Win),
    ]);
    let pool = database::create_memory_pool().unwrap();
    let request = AnalysisRequest {
        player: "Hikaru".to_string(),
        since: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        until: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
    };

    let mut service = AnalysisService::new(AppConfig::new(), source)
        .unwrap()
        .with_database(pool.clone());
    let report = service.run(&request).await.unwrap();

    assert_eq!(report.bands.len(), 2);
    assert_eq!(report.diagnostics.games_received, 5);
    assert_eq!(report.diagnostics.games_below_minimum, 1);

    let conn = database::get_connection(&pool).unwrap();
    let run = database::latest_for_player(&conn, "HIKARU").unwrap().unwrap();
    // Two bands plus the overall row
    assert_eq!(database::list_band_results(&conn, run.id).unwrap().len(), 3);
}
