use serde::{Deserialize, Serialize};

// --- Chess.com public API response structures ---

/// `/player/{username}/games/archives`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ArchivesResponse {
    #[serde(default)]
    pub archives: Vec<String>,
}

/// `/player/{username}/games/{yyyy}/{mm}`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MonthlyGamesResponse {
    #[serde(default)]
    pub games: Vec<GameResponse>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub time_control: Option<String>,
    #[serde(default)]
    pub time_class: Option<String>,
    #[serde(default)]
    pub rated: Option<bool>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub tournament: Option<String>,
    #[serde(default)]
    pub white: Option<PlayerSide>,
    #[serde(default)]
    pub black: Option<PlayerSide>,
}

impl GameResponse {
    /// End time, falling back to start time; zero means missing
    pub fn played_at(&self) -> Option<i64> {
        self.end_time
            .or(self.start_time)
            .filter(|&ts| ts > 0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSide {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub result: Option<String>,
}

/// `/player/{username}`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ProfileResponse {
    pub fn display_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Country code from the trailing segment of the country URL
    pub fn country_code(&self) -> Option<&str> {
        self.country.as_deref()?.rsplit('/').next()
    }
}
