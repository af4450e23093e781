use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use crate::config::AnalysisSettings;
use crate::domain::{
    Band, BandAggregate, GameRecord, OpponentAggregate, RatedOutcome, RatingSource,
    TournamentPolicy,
};
use crate::errors::AnalysisError;
use crate::identity::{IdentityResolver, MatchMethod, Resolution};
use crate::rating::{BandClassifier, PerformanceEstimator, PerformanceResult};

use super::diagnostics::Diagnostics;

pub const OVERALL_LABEL: &str = "Overall";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub min_opp_rating: f64,
    pub use_reference_bands: bool,
    pub use_two_year_average: bool,
    pub tournament_policy: TournamentPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_settings(&AnalysisSettings::default())
    }
}

impl PipelineOptions {
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self {
            min_opp_rating: settings.min_opp_rating,
            use_reference_bands: settings.use_reference_bands,
            use_two_year_average: settings.use_two_year_average,
            tournament_policy: settings.tournament_policy,
        }
    }

    /// Opponents are banded by each game's platform rating, so the minimum
    /// can be applied game by game before grouping
    pub fn bands_by_platform_rating(&self) -> bool {
        !self.use_reference_bands && !self.use_two_year_average
    }
}

/// Per-opponent data gathered outside the pipeline, keyed by lowercase identifier
#[derive(Debug, Clone, Default)]
pub struct OpponentLookups {
    pub display_names: HashMap<String, String>,
    /// Opponents' own average ratings over the history window
    pub average_ratings: HashMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct BandResult {
    pub aggregate: BandAggregate,
    pub performance: PerformanceResult,
}

#[derive(Debug, Clone)]
pub struct OpponentResult {
    pub aggregate: OpponentAggregate,
    pub performance: PerformanceResult,
    pub match_method: Option<MatchMethod>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub bands: Vec<BandResult>,
    pub opponents: Vec<OpponentResult>,
    pub overall: Option<PerformanceResult>,
    pub diagnostics: Diagnostics,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty() && self.opponents.is_empty()
    }
}

/// Groups games by opponent, then by band, and estimates performance per row
pub struct AggregationPipeline {
    options: PipelineOptions,
    classifier: BandClassifier,
    estimator: PerformanceEstimator,
    resolver: Option<IdentityResolver>,
}

struct OpponentEntry {
    aggregate: OpponentAggregate,
    match_method: Option<MatchMethod>,
}

impl AggregationPipeline {
    pub fn new(
        options: PipelineOptions,
        classifier: BandClassifier,
        estimator: PerformanceEstimator,
    ) -> Self {
        Self {
            options,
            classifier,
            estimator,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: IdentityResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Reference banding needs a resolver with at least one reference entry
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.options.use_reference_bands {
            return Ok(());
        }
        match &self.resolver {
            Some(resolver) if !resolver.is_empty() => Ok(()),
            Some(_) => Err(AnalysisError::configuration(
                "reference bands requested but the reference store is empty",
            )),
            None => Err(AnalysisError::configuration(
                "reference bands requested but no reference store was loaded",
            )),
        }
    }

    pub fn run(
        &mut self,
        games: &[GameRecord],
        lookups: &OpponentLookups,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.validate()?;

        let mut diagnostics = Diagnostics {
            games_received: games.len(),
            ..Diagnostics::default()
        };

        let by_opponent = self.group_admitted_games(games, &mut diagnostics);
        diagnostics.unique_opponents = by_opponent.len();

        let mut opponents = Vec::with_capacity(by_opponent.len());
        for (key, opponent_games) in by_opponent {
            let entry = self.build_opponent(&key, opponent_games, lookups, &mut diagnostics);
            if entry.aggregate.band.is_some() {
                opponents.push(entry);
            } else {
                diagnostics.opponents_below_minimum += 1;
            }
        }

        let band_aggregates = sum_into_bands(&opponents);
        let bands = self.estimate_bands(band_aggregates, &mut diagnostics);
        let overall = self.estimate_overall(&opponents, &mut diagnostics);
        let mut opponent_results = self.estimate_opponents(opponents, &mut diagnostics);
        sort_opponents(&mut opponent_results);

        info!(
            "Aggregated {} games against {} opponents into {} bands",
            diagnostics.games_used(),
            opponent_results.len(),
            bands.len()
        );

        Ok(AnalysisReport {
            bands,
            opponents: opponent_results,
            overall,
            diagnostics,
        })
    }

    /// Games surviving the policy filter, keyed by lowercase opponent
    /// identifier. The platform-rating minimum only applies here when
    /// opponents are banded by platform rating.
    fn group_admitted_games<'g>(
        &self,
        games: &'g [GameRecord],
        diagnostics: &mut Diagnostics,
    ) -> BTreeMap<String, Vec<&'g GameRecord>> {
        let mut by_opponent: BTreeMap<String, Vec<&GameRecord>> = BTreeMap::new();

        for game in games {
            if !self.options.tournament_policy.admits(game) {
                diagnostics.games_dropped_by_policy += 1;
                continue;
            }
            if self.options.bands_by_platform_rating()
                && (game.opponent_platform_rating as f64) < self.options.min_opp_rating
            {
                diagnostics.games_below_minimum += 1;
                continue;
            }
            by_opponent
                .entry(game.opponent_identifier.to_lowercase())
                .or_default()
                .push(game);
        }

        by_opponent
    }

    fn build_opponent(
        &mut self,
        key: &str,
        games: Vec<&GameRecord>,
        lookups: &OpponentLookups,
        diagnostics: &mut Diagnostics,
    ) -> OpponentEntry {
        let identifier = games
            .first()
            .map(|g| g.opponent_identifier.clone())
            .unwrap_or_default();
        let display_name = lookups.display_names.get(key).cloned();
        let mut aggregate = OpponentAggregate::new(&identifier);

        let resolution = self
            .resolver
            .as_mut()
            .and_then(|resolver| resolver.resolve(&identifier, display_name.as_deref()));
        aggregate.resolved_reference_rating = resolution.as_ref().map(|r| r.record.rating);
        aggregate.display_name = display_name;

        let banding = self.banding_rating(key, resolution.as_ref(), lookups, diagnostics);
        if let Some((source, _)) = banding {
            aggregate.rating_source = source;
        }

        for game in games {
            let rating = banding
                .map(|(_, rating)| rating)
                .unwrap_or(game.opponent_platform_rating as f64);
            aggregate.add_game(rating, game.result);
        }

        aggregate.band = self
            .classifier
            .classify(aggregate.avg_rating, self.options.min_opp_rating);

        OpponentEntry {
            aggregate,
            match_method: resolution.map(|r| r.method),
        }
    }

    /// Rating an opponent is banded by when it is not the per-game platform
    /// rating: reference first, then the two-year average
    fn banding_rating(
        &self,
        key: &str,
        resolution: Option<&Resolution>,
        lookups: &OpponentLookups,
        diagnostics: &mut Diagnostics,
    ) -> Option<(RatingSource, f64)> {
        if self.options.use_reference_bands {
            if let Some(res) = resolution {
                diagnostics.resolved_opponents += 1;
                return Some((RatingSource::Reference, res.record.rating as f64));
            }
        }
        if self.options.use_two_year_average {
            if let Some(&average) = lookups.average_ratings.get(key) {
                diagnostics.averaged_opponents += 1;
                return Some((RatingSource::TwoYearAverage, average));
            }
        }
        if !self.options.bands_by_platform_rating() {
            diagnostics.fallback_opponents += 1;
            debug!("No reference or average rating for {}, using platform rating", key);
        }
        None
    }

    fn estimate_bands(
        &self,
        aggregates: BTreeMap<Band, BandAggregate>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<BandResult> {
        aggregates
            .into_values()
            .filter_map(|aggregate| {
                self.estimate_row(aggregate.band.label(), aggregate.pairs(), diagnostics)
                    .map(|performance| BandResult {
                        aggregate,
                        performance,
                    })
            })
            .collect()
    }

    fn estimate_overall(
        &self,
        opponents: &[OpponentEntry],
        diagnostics: &mut Diagnostics,
    ) -> Option<PerformanceResult> {
        let pairs: Vec<RatedOutcome> = opponents
            .iter()
            .flat_map(|entry| entry.aggregate.pairs().iter().copied())
            .collect();
        if pairs.is_empty() {
            return None;
        }
        self.estimate_row(OVERALL_LABEL, &pairs, diagnostics)
    }

    fn estimate_opponents(
        &self,
        opponents: Vec<OpponentEntry>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<OpponentResult> {
        opponents
            .into_iter()
            .filter_map(|entry| {
                let performance = self.estimate_row(
                    &entry.aggregate.identifier,
                    entry.aggregate.pairs(),
                    diagnostics,
                )?;
                Some(OpponentResult {
                    aggregate: entry.aggregate,
                    performance,
                    match_method: entry.match_method,
                })
            })
            .collect()
    }

    /// A row without data is skipped and counted rather than failing the run
    fn estimate_row(
        &self,
        label: &str,
        pairs: &[RatedOutcome],
        diagnostics: &mut Diagnostics,
    ) -> Option<PerformanceResult> {
        match self.estimator.estimate(label, pairs) {
            Ok(result) => Some(result),
            Err(err) => {
                debug!("Skipping row: {}", err);
                diagnostics.skipped_rows += 1;
                None
            }
        }
    }
}

fn sum_into_bands(opponents: &[OpponentEntry]) -> BTreeMap<Band, BandAggregate> {
    let mut bands: BTreeMap<Band, BandAggregate> = BTreeMap::new();
    for entry in opponents {
        if let Some(band) = entry.aggregate.band {
            bands
                .entry(band)
                .or_insert_with(|| BandAggregate::new(band))
                .absorb(&entry.aggregate);
        }
    }
    bands
}

/// Most games first, then best score, then identifier
fn sort_opponents(opponents: &mut [OpponentResult]) {
    opponents.sort_by(|a, b| {
        b.aggregate
            .games
            .cmp(&a.aggregate.games)
            .then(b.aggregate.score.total_cmp(&a.aggregate.score))
            .then_with(|| a.aggregate.identifier.cmp(&b.aggregate.identifier))
    });
}
