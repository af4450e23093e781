use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

use crate::domain::models::{GameOutcome, GameRecord};
use crate::domain::responses::{GameResponse, PlayerSide};

/// Criteria a raw game has to meet to become a `GameRecord`
#[derive(Debug, Clone)]
pub struct IngestFilter {
    pub player: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub include_unrated: bool,
    pub time_classes: Vec<String>,
}

/// What happened to one raw game
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    Accepted(GameRecord),
    /// Valid, but not wanted (other player, unrated, time class, outside the window)
    Ignored,
    /// Missing or unusable fields
    Malformed,
}

/// Games that survived ingestion plus the count of malformed records
#[derive(Debug, Clone, Default)]
pub struct IngestedGames {
    pub games: Vec<GameRecord>,
    pub skipped: usize,
}

impl IngestedGames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Folds raw monthly games into `IngestedGames`, dropping duplicate URLs
pub struct Ingestor {
    filter: IngestFilter,
    seen_urls: HashSet<String>,
    result: IngestedGames,
}

impl Ingestor {
    pub fn new(filter: IngestFilter) -> Self {
        Self {
            filter,
            seen_urls: HashSet::new(),
            result: IngestedGames::new(),
        }
    }

    pub fn ingest_month(&mut self, games: &[GameResponse]) {
        for game in games {
            self.ingest_game(game);
        }
    }

    pub fn finish(self) -> IngestedGames {
        self.result
    }

    fn ingest_game(&mut self, game: &GameResponse) {
        match parse_game_for_player(game, &self.filter) {
            IngestOutcome::Accepted(record) => {
                if self.is_duplicate(&record) {
                    return;
                }
                self.result.games.push(record);
            }
            IngestOutcome::Ignored => {}
            IngestOutcome::Malformed => self.result.skipped += 1,
        }
    }

    fn is_duplicate(&mut self, record: &GameRecord) -> bool {
        match &record.url {
            Some(url) => !self.seen_urls.insert(url.clone()),
            None => false,
        }
    }
}

pub fn parse_game_for_player(game: &GameResponse, filter: &IngestFilter) -> IngestOutcome {
    let (Some(white), Some(black)) = (&game.white, &game.black) else {
        return IngestOutcome::Malformed;
    };

    let player = filter.player.to_lowercase();
    let Some((me, opponent)) = pick_sides(white, black, &player) else {
        return IngestOutcome::Ignored;
    };

    if !is_wanted(game, filter) {
        return IngestOutcome::Ignored;
    }

    match build_record(game, me, opponent) {
        Some(record) if is_within_window(&record, filter) => IngestOutcome::Accepted(record),
        Some(_) => IngestOutcome::Ignored,
        None => IngestOutcome::Malformed,
    }
}

/// The player's own ratings in rated games of the wanted time classes.
/// Feeds the two-year average an opponent is banded by.
pub fn own_ratings(games: &[GameResponse], player: &str, time_classes: &[String]) -> Vec<i32> {
    let player = player.to_lowercase();
    games
        .iter()
        .filter(|game| game.rated == Some(true))
        .filter(|game| {
            let time_class = game.time_class.as_deref().unwrap_or("");
            time_classes.iter().any(|tc| tc == time_class)
        })
        .filter_map(|game| {
            let (white, black) = (game.white.as_ref()?, game.black.as_ref()?);
            let (me, _) = pick_sides(white, black, &player)?;
            me.rating.filter(|&r| r > 0)
        })
        .collect()
}

/// Mean of a set of ratings, none when empty
pub fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64)
}

fn pick_sides<'a>(
    white: &'a PlayerSide,
    black: &'a PlayerSide,
    player: &str,
) -> Option<(&'a PlayerSide, &'a PlayerSide)> {
    if white.username.to_lowercase() == player {
        Some((white, black))
    } else if black.username.to_lowercase() == player {
        Some((black, white))
    } else {
        None
    }
}

fn is_wanted(game: &GameResponse, filter: &IngestFilter) -> bool {
    let rated = game.rated == Some(true);
    if !rated && !filter.include_unrated {
        return false;
    }

    let time_class = game.time_class.as_deref().unwrap_or("");
    filter.time_classes.iter().any(|tc| tc == time_class)
}

fn build_record(game: &GameResponse, me: &PlayerSide, opponent: &PlayerSide) -> Option<GameRecord> {
    let result = GameOutcome::from_result_code(me.result.as_deref()?)?;
    let opponent_rating = opponent.rating.filter(|&r| r > 0)?;
    let timestamp = parse_timestamp(game.played_at()?)?;

    if opponent.username.trim().is_empty() {
        return None;
    }

    Some(GameRecord {
        opponent_identifier: opponent.username.to_lowercase(),
        opponent_platform_rating: opponent_rating,
        result,
        timestamp,
        time_control: game.time_control.clone().unwrap_or_default(),
        time_class: game.time_class.clone().unwrap_or_default(),
        is_tournament: game.tournament.is_some(),
        player_rating: me.rating.filter(|&r| r > 0),
        tournament: game.tournament.clone(),
        url: game.url.clone(),
    })
}

fn parse_timestamp(epoch_secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(epoch_secs, 0)
}

fn is_within_window(record: &GameRecord, filter: &IngestFilter) -> bool {
    let day = record.timestamp.date_naive();
    filter.since <= day && day <= filter.until
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter() -> IngestFilter {
        IngestFilter {
            player: "Hikaru".to_string(),
            since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            until: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            include_unrated: false,
            time_classes: vec!["blitz".to_string()],
        }
    }

    fn raw_game(url: &str, white_result: &str, black_rating: serde_json::Value) -> GameResponse {
        serde_json::from_value(json!({
            "url": url,
            "time_control": "180",
            "time_class": "blitz",
            "rated": true,
            "end_time": 1705000000,
            "tournament": "https://api.chess.com/pub/tournament/titled-tuesday-blitz-january-09-2024",
            "white": {"username": "hikaru", "rating": 3250, "result": white_result},
            "black": {"username": "DuHless", "rating": black_rating, "result": "resigned"}
        }))
        .unwrap()
    }

    #[test]
    fn test_accepts_player_game() {
        let game = raw_game("https://www.chess.com/game/live/1", "win", json!(3100));
        let IngestOutcome::Accepted(record) = parse_game_for_player(&game, &filter()) else {
            panic!("game should be accepted");
        };

        assert_eq!(record.opponent_identifier, "duhless");
        assert_eq!(record.opponent_platform_rating, 3100);
        assert_eq!(record.result, GameOutcome::Win);
        assert_eq!(record.player_rating, Some(3250));
        assert!(record.is_tournament);
    }

    #[test]
    fn test_own_ratings_for_history_average() {
        let mut unrated = raw_game("https://www.chess.com/game/live/10", "win", json!(3100));
        unrated.rated = Some(false);
        let mut bullet = raw_game("https://www.chess.com/game/live/11", "win", json!(3000));
        bullet.time_class = Some("bullet".to_string());
        let games = vec![
            raw_game("https://www.chess.com/game/live/12", "win", json!(3100)),
            raw_game("https://www.chess.com/game/live/13", "win", json!(3060)),
            unrated,
            bullet,
        ];
        let blitz = vec!["blitz".to_string()];

        // Seen from the black side
        let ratings = own_ratings(&games, "duhless", &blitz);
        assert_eq!(ratings, vec![3100, 3060]);
        assert_eq!(average_rating(&ratings), Some(3080.0));

        assert!(own_ratings(&games, "nobody", &blitz).is_empty());
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn test_missing_rating_is_malformed() {
        let game = raw_game("https://www.chess.com/game/live/2", "win", json!(null));
        assert!(matches!(parse_game_for_player(&game, &filter()), IngestOutcome::Malformed));
    }

    #[test]
    fn test_unknown_result_code_is_malformed() {
        let game = raw_game("https://www.chess.com/game/live/3", "kingofthehill", json!(3100));
        assert!(matches!(parse_game_for_player(&game, &filter()), IngestOutcome::Malformed));
    }

    #[test]
    fn test_other_time_class_is_ignored() {
        let mut game = raw_game("https://www.chess.com/game/live/4", "win", json!(3100));
        game.time_class = Some("bullet".to_string());
        assert!(matches!(parse_game_for_player(&game, &filter()), IngestOutcome::Ignored));
    }

    #[test]
    fn test_unrated_needs_opt_in() {
        let mut game = raw_game("https://www.chess.com/game/live/5", "agreed", json!(3100));
        game.rated = Some(false);
        assert!(matches!(parse_game_for_player(&game, &filter()), IngestOutcome::Ignored));

        let mut with_unrated = filter();
        with_unrated.include_unrated = true;
        assert!(matches!(
            parse_game_for_player(&game, &with_unrated),
            IngestOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_outside_window_is_ignored() {
        let mut game = raw_game("https://www.chess.com/game/live/6", "win", json!(3100));
        game.end_time = Some(1710000000); // March 2024
        assert!(matches!(parse_game_for_player(&game, &filter()), IngestOutcome::Ignored));
    }

    #[test]
    fn test_ingestor_counts_skipped_and_drops_duplicates() {
        let games = vec![
            raw_game("https://www.chess.com/game/live/1", "win", json!(3100)),
            raw_game("https://www.chess.com/game/live/1", "win", json!(3100)),
            raw_game("https://www.chess.com/game/live/2", "timeout", json!(3050)),
            raw_game("https://www.chess.com/game/live/3", "win", json!(null)),
        ];

        let mut ingestor = Ingestor::new(filter());
        ingestor.ingest_month(&games);
        let ingested = ingestor.finish();

        assert_eq!(ingested.len(), 2);
        assert_eq!(ingested.skipped, 1);
        assert_eq!(ingested.games[1].result, GameOutcome::Loss);
    }
}
