use crate::api::parsers;
use crate::cache::{Cache, is_cacheable_month};
use crate::config::{AnalysisSettings, ScraperSettings};
use crate::domain::responses::{ArchivesResponse, MonthlyGamesResponse, ProfileResponse};
use crate::domain::{IngestFilter, IngestedGames, Ingestor, average_rating, own_ratings};
use crate::errors::{AnalysisError, with_parse_context};
use crate::http::RateLimitedClient;
use crate::pagination::{
    MonthIterator, MonthWindow, build_archives_url, build_monthly_url, build_profile_url,
};
use crate::sources::{GameSource, ProfileLookup, ProfileSource, RatingHistorySource};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use serde_json::Value;

/// Chess.com public API client
pub struct ChessComClient {
    client: RateLimitedClient,
    cache: Option<Cache>,
    base_url: String,
    include_unrated: bool,
    time_classes: Vec<String>,
}

impl ChessComClient {
    pub fn new(scraper: &ScraperSettings, analysis: &AnalysisSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            scraper.user_agent,
            scraper.timeout_secs,
            scraper.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            cache: None,
            base_url: scraper.api_base_url.to_string(),
            include_unrated: analysis.include_unrated,
            time_classes: analysis.time_classes.clone(),
        })
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn requests_made(&self) -> usize {
        self.client.requests_made()
    }

    /// Archive months of the player inside the window. An empty listing
    /// falls back to every month of the window.
    pub async fn fetch_archive_months(
        &mut self,
        player: &str,
        window: &MonthWindow,
    ) -> Result<Vec<(i32, u32)>> {
        let archives = self.fetch_archive_listing(player).await?;

        if archives.is_empty() {
            warn!("No archive listing for {}, trying every month of the window", player);
            return Ok(MonthIterator::new(window).collect());
        }

        Ok(parsers::months_in_window(&archives, window))
    }

    /// Raw monthly games, from the cache when the month is finished
    pub async fn fetch_month(
        &mut self,
        player: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyGamesResponse> {
        let cacheable = is_cacheable_month(year, month, Utc::now().date_naive());

        let cached = match (&self.cache, cacheable) {
            (Some(cache), true) => cache.load_month(player, year, month)?,
            _ => None,
        };

        let value = match cached {
            Some(value) => value,
            None => {
                let value = self.download_month(player, year, month).await?;
                if cacheable {
                    self.save_month(player, year, month, &value);
                }
                value
            }
        };

        with_parse_context(serde_json::from_value(value), "monthly games")
    }

    // --- Helper Methods ---

    async fn fetch_archive_listing(&mut self, player: &str) -> Result<Vec<String>> {
        let url = build_archives_url(&self.base_url, player);
        match self.client.get_json(&url).await? {
            Some(value) => Ok(with_parse_context(
                serde_json::from_value::<ArchivesResponse>(value),
                "archive list",
            )?
            .archives),
            None => Ok(Vec::new()),
        }
    }

    fn window(since: NaiveDate, until: NaiveDate) -> Result<MonthWindow> {
        MonthWindow::new(since, until).ok_or_else(|| {
            AnalysisError::configuration(format!("date window is reversed: {} > {}", since, until))
                .into()
        })
    }

    async fn download_month(&mut self, player: &str, year: i32, month: u32) -> Result<Value> {
        let url = build_monthly_url(&self.base_url, player, year, month);
        info!("Fetching {}/{:02} for {}", year, month, player);

        Ok(self
            .client
            .get_json(&url)
            .await?
            .unwrap_or_else(|| serde_json::json!({ "games": [] })))
    }

    fn save_month(&self, player: &str, year: i32, month: u32, value: &Value) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save_month(player, year, month, value) {
                warn!("Failed to save {}/{:02} to cache: {:?}", year, month, e);
            }
        }
    }

    fn build_filter(&self, player: &str, since: NaiveDate, until: NaiveDate) -> IngestFilter {
        IngestFilter {
            player: player.to_string(),
            since,
            until,
            include_unrated: self.include_unrated,
            time_classes: self.time_classes.clone(),
        }
    }
}

#[async_trait]
impl GameSource for ChessComClient {
    async fn fetch(
        &mut self,
        player: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<IngestedGames> {
        let window = Self::window(since, until)?;

        let months = self.fetch_archive_months(player, &window).await?;
        info!("Fetching {} monthly archives for {}", months.len(), player);

        let mut ingestor = Ingestor::new(self.build_filter(player, since, until));
        for (year, month) in months {
            match self.fetch_month(player, year, month).await {
                Ok(response) => ingestor.ingest_month(&response.games),
                Err(e) => warn!("Skipping {}/{:02} for {}: {:#}", year, month, player, e),
            }
        }

        let ingested = ingestor.finish();
        info!(
            "Ingested {} games for {} ({} malformed records skipped, {} API requests so far)",
            ingested.len(),
            player,
            ingested.skipped,
            self.requests_made()
        );
        Ok(ingested)
    }
}

#[async_trait]
impl ProfileSource for ChessComClient {
    async fn display_name(&mut self, username: &str) -> Result<ProfileLookup> {
        let cached = match &self.cache {
            Some(cache) => cache.load_profile(username)?,
            None => None,
        };
        let from_cache = cached.is_some();

        let value = match cached {
            Some(value) => Some(value),
            None => {
                let url = build_profile_url(&self.base_url, username);
                let value = self.client.get_json(&url).await?;
                if let (Some(cache), Some(value)) = (&self.cache, &value) {
                    if let Err(e) = cache.save_profile(username, value) {
                        warn!("Failed to save profile {} to cache: {:?}", username, e);
                    }
                }
                value
            }
        };

        let display_name = match value {
            Some(value) => {
                with_parse_context(serde_json::from_value::<ProfileResponse>(value), "profile")?
                    .display_name()
            }
            None => None,
        };

        Ok(ProfileLookup {
            display_name,
            from_cache,
        })
    }
}

#[async_trait]
impl RatingHistorySource for ChessComClient {
    /// Mean of the player's own ratings in the listed archive months of the
    /// window. No listing means no average.
    async fn average_rating(
        &mut self,
        username: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Option<f64>> {
        let window = Self::window(since, until)?;
        let archives = self.fetch_archive_listing(username).await?;
        let months = parsers::months_in_window(&archives, &window);

        let mut ratings = Vec::new();
        for (year, month) in months {
            match self.fetch_month(username, year, month).await {
                Ok(response) => {
                    ratings.extend(own_ratings(&response.games, username, &self.time_classes))
                }
                Err(e) => warn!("Skipping {}/{:02} for {}: {:#}", year, month, username, e),
            }
        }

        Ok(average_rating(&ratings))
    }
}
