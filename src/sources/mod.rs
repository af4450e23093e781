//! Seams between the analysis and where games, profile names and rating
//! histories come from.

mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::IngestedGames;

pub use memory::StaticSource;

/// Finite, duplicate-free games of one player within an inclusive date window
#[async_trait]
pub trait GameSource: Send {
    async fn fetch(
        &mut self,
        player: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<IngestedGames>;
}

/// Profile display-name lookup
#[async_trait]
pub trait ProfileSource: Send {
    async fn display_name(&mut self, username: &str) -> Result<ProfileLookup>;
}

/// A player's own average rating over an inclusive date window
#[async_trait]
pub trait RatingHistorySource: Send {
    async fn average_rating(
        &mut self,
        username: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Option<f64>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileLookup {
    pub display_name: Option<String>,
    pub from_cache: bool,
}
