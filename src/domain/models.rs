use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single game from the analysed player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win,
    Draw,
    Loss,
}

impl GameOutcome {
    pub fn points(&self) -> f64 {
        match self {
            GameOutcome::Win => 1.0,
            GameOutcome::Draw => 0.5,
            GameOutcome::Loss => 0.0,
        }
    }

    /// Map a Chess.com result code to an outcome
    pub fn from_result_code(code: &str) -> Option<Self> {
        match code {
            "win" => Some(GameOutcome::Win),
            "agreed" | "repetition" | "stalemate" | "insufficient" | "timevsinsufficient"
            | "50move" => Some(GameOutcome::Draw),
            "checkmated" | "lose" | "timeout" | "resigned" | "abandoned" => Some(GameOutcome::Loss),
            _ => None,
        }
    }
}

/// A game against one opponent, as fetched for the analysed player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub opponent_identifier: String,
    pub opponent_platform_rating: i32,
    pub result: GameOutcome,
    pub timestamp: DateTime<Utc>,
    pub time_control: String,
    pub time_class: String,
    pub is_tournament: bool,
    pub player_rating: Option<i32>,
    pub tournament: Option<String>,
    pub url: Option<String>,
}

/// Rating band an opponent is grouped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    B500,
    B600,
    B700,
    B800Plus,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::B500, Band::B600, Band::B700, Band::B800Plus];

    pub fn label(&self) -> &'static str {
        match self {
            Band::B500 => "500",
            Band::B600 => "600",
            Band::B700 => "700",
            Band::B800Plus => "800+",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which games survive the tournament filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TournamentPolicy {
    #[default]
    All,
    TournamentOnly,
    TitledTuesdayOnly,
}

impl TournamentPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            TournamentPolicy::All => "all",
            TournamentPolicy::TournamentOnly => "tournament-only",
            TournamentPolicy::TitledTuesdayOnly => "titled-tuesday-only",
        }
    }

    pub fn admits(&self, game: &GameRecord) -> bool {
        match self {
            TournamentPolicy::All => true,
            TournamentPolicy::TournamentOnly => game.is_tournament,
            TournamentPolicy::TitledTuesdayOnly => is_titled_tuesday(game.tournament.as_deref()),
        }
    }
}

fn is_titled_tuesday(tournament: Option<&str>) -> bool {
    let lower = tournament.unwrap_or("").to_lowercase();
    lower.contains("titled") && lower.contains("tuesday")
}

/// Canonical entry of the reference rating list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub canonical_name: String,
    pub rating: i32,
}

/// Where the rating used for banding an opponent came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingSource {
    Reference,
    TwoYearAverage,
    Platform,
}

impl RatingSource {
    pub fn as_str(&self) -> &str {
        match self {
            RatingSource::Reference => "reference",
            RatingSource::TwoYearAverage => "two-year",
            RatingSource::Platform => "platform",
        }
    }
}
