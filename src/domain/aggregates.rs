use serde::Serialize;

use crate::domain::models::{Band, GameOutcome, RatingSource};

/// Opponent rating used for a game, paired with its outcome
pub type RatedOutcome = (f64, GameOutcome);

/// Games against one opponent, folded in one at a time
#[derive(Debug, Clone, Serialize)]
pub struct OpponentAggregate {
    pub identifier: String,
    pub display_name: Option<String>,
    pub resolved_reference_rating: Option<i32>,
    pub rating_source: RatingSource,
    pub band: Option<Band>,
    pub games: usize,
    pub score: f64,
    pub avg_rating: f64,
    #[serde(skip)]
    pairs: Vec<RatedOutcome>,
}

impl OpponentAggregate {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            display_name: None,
            resolved_reference_rating: None,
            rating_source: RatingSource::Platform,
            band: None,
            games: 0,
            score: 0.0,
            avg_rating: 0.0,
            pairs: Vec::new(),
        }
    }

    pub fn add_game(&mut self, rating: f64, outcome: GameOutcome) {
        self.pairs.push((rating, outcome));
        self.games += 1;
        self.score += outcome.points();
        self.avg_rating = mean_rating(&self.pairs);
    }

    pub fn pairs(&self) -> &[RatedOutcome] {
        &self.pairs
    }

    pub fn score_pct(&self) -> f64 {
        score_pct(self.score, self.games)
    }
}

/// Opponent aggregates of one band, summed
#[derive(Debug, Clone, Serialize)]
pub struct BandAggregate {
    pub band: Band,
    pub opponents: usize,
    pub games: usize,
    pub score: f64,
    pub avg_rating: f64,
    #[serde(skip)]
    pairs: Vec<RatedOutcome>,
}

impl BandAggregate {
    pub fn new(band: Band) -> Self {
        Self {
            band,
            opponents: 0,
            games: 0,
            score: 0.0,
            avg_rating: 0.0,
            pairs: Vec::new(),
        }
    }

    /// Sum an opponent into the band; the average stays games-weighted
    pub fn absorb(&mut self, opponent: &OpponentAggregate) {
        let total_games = self.games + opponent.games;
        if total_games == 0 {
            return;
        }

        self.avg_rating = (self.avg_rating * self.games as f64
            + opponent.avg_rating * opponent.games as f64)
            / total_games as f64;
        self.games = total_games;
        self.score += opponent.score;
        self.opponents += 1;
        self.pairs.extend_from_slice(opponent.pairs());
    }

    pub fn pairs(&self) -> &[RatedOutcome] {
        &self.pairs
    }

    pub fn score_pct(&self) -> f64 {
        score_pct(self.score, self.games)
    }
}

pub fn mean_rating(pairs: &[RatedOutcome]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    pairs.iter().map(|(rating, _)| rating).sum::<f64>() / pairs.len() as f64
}

fn score_pct(score: f64, games: usize) -> f64 {
    if games == 0 {
        return 0.0;
    }
    score / games as f64 * 100.0
}
