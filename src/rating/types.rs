use serde::{Deserialize, Serialize};

/// Elo-scale interval around a performance rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, rating: f64) -> bool {
        self.low <= rating && rating <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// One output row, keyed by band label or opponent identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub label: String,
    pub games: usize,
    pub score: f64,
    pub score_fraction: f64,
    pub avg_opponent_rating: f64,
    pub performance_rating: f64,
    pub expected_score: f64,
    pub z_score: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl PerformanceResult {
    pub fn score_pct(&self) -> f64 {
        self.score_fraction * 100.0
    }

    /// Performance minus average opponent rating
    pub fn displacement(&self) -> f64 {
        self.performance_rating - self.avg_opponent_rating
    }
}
