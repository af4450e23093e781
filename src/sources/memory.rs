use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::{GameRecord, IngestedGames};

use super::{GameSource, ProfileLookup, ProfileSource, RatingHistorySource};

/// Fixed games, display names and rating averages served from memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    games: Vec<GameRecord>,
    names: HashMap<String, String>,
    averages: HashMap<String, f64>,
    skipped: usize,
    profile_lookups: usize,
    history_lookups: Vec<(String, NaiveDate, NaiveDate)>,
}

impl StaticSource {
    pub fn new(games: Vec<GameRecord>) -> Self {
        Self {
            games,
            ..Self::default()
        }
    }

    /// Display names keyed by username, matched case-insensitively
    pub fn with_profiles<I, K, V>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.names = names
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v.into()))
            .collect();
        self
    }

    /// Average ratings keyed by username, matched case-insensitively
    pub fn with_rating_history<I, K>(mut self, averages: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.averages = averages
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v))
            .collect();
        self
    }

    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn profile_lookups(&self) -> usize {
        self.profile_lookups
    }

    /// Every history request made so far: username and window
    pub fn history_lookups(&self) -> &[(String, NaiveDate, NaiveDate)] {
        &self.history_lookups
    }
}

#[async_trait]
impl GameSource for StaticSource {
    async fn fetch(
        &mut self,
        _player: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<IngestedGames> {
        let games = self
            .games
            .iter()
            .filter(|game| {
                let day = game.timestamp.date_naive();
                since <= day && day <= until
            })
            .cloned()
            .collect();

        Ok(IngestedGames {
            games,
            skipped: self.skipped,
        })
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    async fn display_name(&mut self, username: &str) -> Result<ProfileLookup> {
        self.profile_lookups += 1;
        Ok(ProfileLookup {
            display_name: self.names.get(&username.to_lowercase()).cloned(),
            from_cache: false,
        })
    }
}

#[async_trait]
impl RatingHistorySource for StaticSource {
    async fn average_rating(
        &mut self,
        username: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Option<f64>> {
        let username = username.to_lowercase();
        self.history_lookups.push((username.clone(), since, until));
        Ok(self.averages.get(&username).copied())
    }
}
