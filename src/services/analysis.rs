use anyhow::Result;
use chrono::{Months, NaiveDate};
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};

use crate::config::settings::AppConfig;
use crate::database::{self, DbPool, RunMetadata};
use crate::domain::{GameRecord, LookupProgress};
use crate::errors::AnalysisError;
use crate::identity::IdentityResolver;
use crate::pipeline::{AggregationPipeline, AnalysisReport, OpponentLookups, PipelineOptions};
use crate::rating::{BandClassifier, PerformanceEstimator};
use crate::reference::ReferenceStore;
use crate::sources::{GameSource, ProfileSource, RatingHistorySource};

/// Player and inclusive date window to analyse
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub player: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
}

/// Fetch → resolve → aggregate → persist, for one player
pub struct AnalysisService<S> {
    config: AppConfig,
    source: S,
    reference: Option<ReferenceStore>,
    pool: Option<DbPool>,
}

impl<S> AnalysisService<S>
where
    S: GameSource + ProfileSource + RatingHistorySource,
{
    /// Loads the reference store up front when reference bands are requested,
    /// so a missing store fails before any network traffic
    pub fn new(config: AppConfig, source: S) -> Result<Self> {
        let reference = if config.analysis.use_reference_bands {
            Some(ReferenceStore::load(&config.analysis.reference_path)?)
        } else {
            None
        };

        Ok(Self {
            config,
            source,
            reference,
            pool: None,
        })
    }

    pub fn with_reference_store(mut self, store: ReferenceStore) -> Self {
        self.reference = Some(store);
        self
    }

    pub fn with_database(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn run(&mut self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        info!("=== Starting Band Analysis for {} ===\n", request.player);

        // Step 1: Fetch games
        let ingested = self
            .source
            .fetch(&request.player, request.since, request.until)
            .await?;
        info!(
            "  → {} games between {} and {}\n",
            ingested.len(),
            request.since,
            request.until
        );

        let opponents = self.lookup_candidates(&ingested.games);
        let mut lookups = OpponentLookups::default();

        // Step 2: Look up display names for identity resolution
        if self.reference.is_some() {
            lookups.display_names = self.lookup_display_names(&opponents).await;
        }

        // Step 3: Average the opponents' own ratings over the history window
        if self.config.analysis.use_two_year_average {
            lookups.average_ratings = self.lookup_average_ratings(&opponents, request).await?;
        }

        // Step 4: Aggregate
        let mut pipeline = self.build_pipeline(&ingested.games)?;
        let mut report = pipeline.run(&ingested.games, &lookups)?;
        report.diagnostics.ingestion_skipped = ingested.skipped;
        report.diagnostics.log_summary();

        // Step 5: Persist
        if let Some(pool) = &self.pool {
            let mut conn = database::get_connection(pool)?;
            database::save_report(&mut conn, &self.run_metadata(request), &report)?;
        }

        info!("=== Analysis Complete ===");
        Ok(report)
    }

    fn build_pipeline(&self, games: &[GameRecord]) -> Result<AggregationPipeline> {
        let baseline = self
            .config
            .analysis
            .baseline_rating
            .or_else(|| own_average_rating(games));
        let estimator =
            PerformanceEstimator::new(self.config.estimator.clone()).with_baseline(baseline);
        match estimator.baseline_rating() {
            Some(rating) => info!("Expected scores against a baseline of {:.0}", rating),
            None => info!("No baseline rating, expected scores use each row's average"),
        }

        let mut pipeline = AggregationPipeline::new(
            PipelineOptions::from_settings(&self.config.analysis),
            BandClassifier::standard(),
            estimator,
        );

        if let Some(store) = &self.reference {
            let resolver = IdentityResolver::new(store, &self.config.matching)?;
            pipeline = pipeline.with_resolver(resolver);
        }

        pipeline.validate()?;
        Ok(pipeline)
    }

    // --- Helper Methods ---

    /// Lowercased opponents the pipeline can still admit. The platform
    /// minimum only prunes here when it is also what bands the opponents.
    fn lookup_candidates(&self, games: &[GameRecord]) -> BTreeSet<String> {
        let options = PipelineOptions::from_settings(&self.config.analysis);
        games
            .iter()
            .filter(|g| options.tournament_policy.admits(g))
            .filter(|g| {
                !options.bands_by_platform_rating()
                    || g.opponent_platform_rating as f64 >= options.min_opp_rating
            })
            .map(|g| g.opponent_identifier.to_lowercase())
            .collect()
    }

    /// Failures only lose the name, never the run
    async fn lookup_display_names(
        &mut self,
        opponents: &BTreeSet<String>,
    ) -> HashMap<String, String> {
        info!("Looking up {} opponent profiles...", opponents.len());
        let mut progress = LookupProgress::new("Profiles", opponents.len());
        let mut names = HashMap::new();

        for opponent in opponents {
            match self.source.display_name(opponent).await {
                Ok(lookup) => {
                    if lookup.from_cache {
                        progress.increment_cached();
                    } else {
                        progress.increment_fetched();
                    }
                    if let Some(name) = lookup.display_name {
                        names.insert(opponent.clone(), name);
                    }
                }
                Err(e) => {
                    warn!("Profile lookup failed for {}: {:#}", opponent, e);
                    progress.increment_failed();
                }
            }
        }

        names
    }

    /// Average own rating per opponent over [since - history_months, until].
    /// Opponents without rated games in the window are left out.
    async fn lookup_average_ratings(
        &mut self,
        opponents: &BTreeSet<String>,
        request: &AnalysisRequest,
    ) -> Result<HashMap<String, f64>> {
        let months = self.config.analysis.history_months;
        let since = request
            .since
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| {
                AnalysisError::configuration(format!(
                    "cannot go back {} months from {}",
                    months, request.since
                ))
            })?;

        info!(
            "Averaging {} opponent ratings from {} to {}...",
            opponents.len(),
            since,
            request.until
        );
        let mut progress = LookupProgress::new("Rating histories", opponents.len());
        let mut averages = HashMap::new();

        for opponent in opponents {
            match self.source.average_rating(opponent, since, request.until).await {
                Ok(average) => {
                    progress.increment_fetched();
                    if let Some(average) = average {
                        averages.insert(opponent.clone(), average);
                    }
                }
                Err(e) => {
                    warn!("Rating history failed for {}: {:#}", opponent, e);
                    progress.increment_failed();
                }
            }
        }

        Ok(averages)
    }

    fn run_metadata(&self, request: &AnalysisRequest) -> RunMetadata {
        RunMetadata {
            player: request.player.to_lowercase(),
            since: request.since,
            until: request.until,
            min_opp_rating: self.config.analysis.min_opp_rating,
            use_reference_bands: self.config.analysis.use_reference_bands,
            use_two_year_average: self.config.analysis.use_two_year_average,
            tournament_policy: self.config.analysis.tournament_policy.as_str().to_string(),
        }
    }
}

/// Mean of the analysed player's own ratings, when the games carry them
fn own_average_rating(games: &[GameRecord]) -> Option<f64> {
    let ratings: Vec<f64> = games
        .iter()
        .filter_map(|g| g.player_rating)
        .map(f64::from)
        .collect();

    if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}
