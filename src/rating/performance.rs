//! Elo performance ratings from (opponent rating, outcome) pairs.
//!
//! The confidence interval and z-score treat every game as an independent
//! Bernoulli trial with the success probability implied by the rating gap
//! between the baseline and the average opponent. Individual games are not
//! identically distributed trials (opponents differ, form varies), so the
//! interval is an approximation to read alongside the raw counts.

use crate::config::EstimatorSettings;
use crate::domain::RatedOutcome;
use crate::domain::aggregates::mean_rating;
use crate::errors::AnalysisError;

use super::types::{ConfidenceInterval, PerformanceResult};

pub struct PerformanceEstimator {
    settings: EstimatorSettings,
    baseline_rating: Option<f64>,
}

impl Default for PerformanceEstimator {
    fn default() -> Self {
        Self::new(EstimatorSettings::default())
    }
}

impl PerformanceEstimator {
    pub fn new(settings: EstimatorSettings) -> Self {
        Self {
            settings,
            baseline_rating: None,
        }
    }

    /// Rating the expected score is computed from
    pub fn with_baseline(mut self, baseline_rating: Option<f64>) -> Self {
        self.baseline_rating = baseline_rating;
        self
    }

    pub fn baseline_rating(&self) -> Option<f64> {
        self.baseline_rating
    }

    pub fn estimate(
        &self,
        label: &str,
        pairs: &[RatedOutcome],
    ) -> Result<PerformanceResult, AnalysisError> {
        if pairs.is_empty() {
            return Err(AnalysisError::insufficient_data(label));
        }

        let games = pairs.len();
        let score: f64 = pairs.iter().map(|(_, outcome)| outcome.points()).sum();
        let score_fraction = score / games as f64;
        let avg_opponent_rating = mean_rating(pairs);

        let baseline = self.baseline_rating.unwrap_or(avg_opponent_rating);
        let expected_score = self.expected_score(baseline, avg_opponent_rating);
        let standard_error = standard_error(expected_score, games);

        Ok(PerformanceResult {
            label: label.to_string(),
            games,
            score,
            score_fraction,
            avg_opponent_rating,
            performance_rating: self.performance_rating(score_fraction, avg_opponent_rating),
            expected_score,
            z_score: z_score(score_fraction, expected_score, standard_error),
            confidence_interval: self.confidence_interval(
                score_fraction,
                standard_error,
                avg_opponent_rating,
            ),
        })
    }

    pub fn performance_rating(&self, score_fraction: f64, avg_opponent_rating: f64) -> f64 {
        avg_opponent_rating + self.displacement(score_fraction)
    }

    /// Logistic expected score of `rating` against `opponent_rating`
    pub fn expected_score(&self, rating: f64, opponent_rating: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((opponent_rating - rating) / self.settings.elo_scale))
    }

    /// Inverse of the expected-score curve, capped at the maximum displacement.
    /// Perfect and zero scores take the cap instead of an infinite value.
    fn displacement(&self, score_fraction: f64) -> f64 {
        let cap = self.settings.max_displacement;
        if score_fraction >= 1.0 {
            return cap;
        }
        if score_fraction <= 0.0 {
            return -cap;
        }

        let odds = score_fraction / (1.0 - score_fraction);
        (self.settings.elo_scale * odds.log10()).clamp(-cap, cap)
    }

    fn confidence_interval(
        &self,
        score_fraction: f64,
        standard_error: f64,
        avg_opponent_rating: f64,
    ) -> ConfidenceInterval {
        let half_width = self.settings.confidence_z * standard_error;
        ConfidenceInterval {
            low: self.performance_rating(score_fraction - half_width, avg_opponent_rating),
            high: self.performance_rating(score_fraction + half_width, avg_opponent_rating),
        }
    }
}

fn standard_error(expected_score: f64, games: usize) -> f64 {
    (expected_score * (1.0 - expected_score) / games as f64).sqrt()
}

fn z_score(score_fraction: f64, expected_score: f64, standard_error: f64) -> f64 {
    if standard_error > 0.0 {
        (score_fraction - expected_score) / standard_error
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GameOutcome::{Draw, Loss, Win};
    use proptest::prelude::*;

    fn estimator() -> PerformanceEstimator {
        PerformanceEstimator::default()
    }

    #[test]
    fn test_even_score_equals_average() {
        let pairs = vec![(2600.0, Win), (2700.0, Loss)];
        let result = estimator().estimate("600", &pairs).unwrap();

        assert_eq!(result.games, 2);
        assert_eq!(result.score, 1.0);
        assert!((result.avg_opponent_rating - 2650.0).abs() < 1e-9);
        assert!((result.performance_rating - 2650.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_quarters_gains_191_points() {
        let pairs = vec![(2550.0, Win), (2550.0, Draw)];
        let result = estimator().estimate("500", &pairs).unwrap();

        // 400 * log10(3)
        assert!((result.performance_rating - 2740.848).abs() < 0.01);
    }

    #[test]
    fn test_empty_pairs_is_insufficient_data() {
        let err = estimator().estimate("700", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { ref label } if label == "700"));
    }

    #[test]
    fn test_perfect_and_zero_scores_are_finite() {
        let wins = vec![(2650.0, Win); 5];
        let losses = vec![(2650.0, Loss); 5];

        let best = estimator().estimate("600", &wins).unwrap();
        let worst = estimator().estimate("600", &losses).unwrap();

        assert!(best.performance_rating.is_finite());
        assert!(worst.performance_rating.is_finite());
        assert!((best.performance_rating - 3450.0).abs() < 1e-9);
        assert!((worst.performance_rating - 1850.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_win_against_2900_takes_full_cap() {
        let result = estimator().estimate("800+", &[(2900.0, Win)]).unwrap();

        assert!(result.performance_rating.is_finite());
        assert!(result.performance_rating > 2900.0);
        assert!((result.displacement() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_expected_score_uses_baseline() {
        let pairs = vec![(2600.0, Draw); 4];

        assert_eq!(estimator().baseline_rating(), None);
        let unanchored = estimator().estimate("600", &pairs).unwrap();
        assert!((unanchored.expected_score - 0.5).abs() < 1e-12);
        assert!(unanchored.z_score.abs() < 1e-12);

        let anchored_estimator = estimator().with_baseline(Some(3000.0));
        assert_eq!(anchored_estimator.baseline_rating(), Some(3000.0));
        let anchored = anchored_estimator.estimate("600", &pairs).unwrap();
        // 400 points above: 10:1 odds
        assert!((anchored.expected_score - 10.0 / 11.0).abs() < 1e-9);
        assert!(anchored.z_score < -2.0);
    }

    #[test]
    fn test_interval_brackets_performance_and_shrinks_with_games() {
        let few = vec![(2700.0, Win), (2700.0, Loss), (2700.0, Draw), (2700.0, Win)];
        let many: Vec<_> = few.iter().cycle().take(64).copied().collect();

        let few_result = estimator().estimate("700", &few).unwrap();
        let many_result = estimator().estimate("700", &many).unwrap();

        assert!(few_result.confidence_interval.contains(few_result.performance_rating));
        assert!(many_result.confidence_interval.contains(many_result.performance_rating));
        assert!(many_result.confidence_interval.width() < few_result.confidence_interval.width());
    }

    proptest! {
        // Strict inside the uncapped range, 1/101 < p < 100/101
        #[test]
        fn prop_monotonic_in_score_fraction(
            avg in 2000.0f64..3200.0,
            a in 0.01f64..0.99,
            b in 0.01f64..0.99,
        ) {
            prop_assume!((a - b).abs() > 1e-6);
            let (low, high) = if a < b { (a, b) } else { (b, a) };
            let est = estimator();
            prop_assert!(est.performance_rating(low, avg) < est.performance_rating(high, avg));
        }

        #[test]
        fn prop_always_finite(wins in 0usize..40, draws in 0usize..40, losses in 0usize..40, avg in 1500.0f64..3300.0) {
            prop_assume!(wins + draws + losses > 0);
            let mut pairs = vec![(avg, Win); wins];
            pairs.extend(vec![(avg, Draw); draws]);
            pairs.extend(vec![(avg, Loss); losses]);

            let result = estimator().estimate("band", &pairs).unwrap();
            prop_assert!(result.performance_rating.is_finite());
            prop_assert!(result.confidence_interval.low.is_finite());
            prop_assert!(result.confidence_interval.high.is_finite());
            prop_assert!(result.confidence_interval.low <= result.confidence_interval.high);
        }

        // Same opponents, one result improved by half a point
        #[test]
        fn prop_estimate_monotonic_in_results(
            games in prop::collection::vec((2000.0f64..3200.0, 0u8..3), 1..40),
            pick in 0usize..40,
        ) {
            let pairs: Vec<RatedOutcome> = games
                .iter()
                .map(|&(rating, code)| {
                    let outcome = match code {
                        0 => Loss,
                        1 => Draw,
                        _ => Win,
                    };
                    (rating, outcome)
                })
                .collect();
            let idx = pick % pairs.len();
            prop_assume!(pairs[idx].1 != Win);

            let mut better = pairs.clone();
            better[idx].1 = if pairs[idx].1 == Loss { Draw } else { Win };

            let est = estimator();
            let before = est.estimate("band", &pairs).unwrap();
            let after = est.estimate("band", &better).unwrap();
            prop_assert!(after.score > before.score);
            prop_assert_eq!(after.avg_opponent_rating, before.avg_opponent_rating);
            prop_assert!(after.performance_rating >= before.performance_rating);
        }
    }
}
