use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub id: i64,
    pub player: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub min_opp_rating: f64,
    pub use_reference_bands: bool,
    pub use_two_year_average: bool,
    pub tournament_policy: String,
    pub games_received: i64,
    pub games_used: i64,
    pub unique_opponents: i64,
    pub resolved_opponents: i64,
    pub fallback_opponents: i64,
    pub averaged_opponents: i64,
    pub skipped_rows: i64,
    pub ingestion_skipped: i64,
    pub created_at: DateTime<Utc>,
}

/// Parameters of a run, recorded next to its results
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub player: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub min_opp_rating: f64,
    pub use_reference_bands: bool,
    pub use_two_year_average: bool,
    pub tournament_policy: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandResultRow {
    pub run_id: i64,
    pub label: String,
    pub opponents: i64,
    pub games: i64,
    pub score: f64,
    pub avg_opponent_rating: f64,
    pub performance_rating: f64,
    pub expected_score: f64,
    pub z_score: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpponentResultRow {
    pub run_id: i64,
    pub identifier: String,
    pub display_name: Option<String>,
    pub reference_rating: Option<i32>,
    pub rating_source: String,
    pub match_method: Option<String>,
    pub band: String,
    pub games: i64,
    pub score: f64,
    pub avg_opponent_rating: f64,
    pub performance_rating: f64,
    pub z_score: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}
