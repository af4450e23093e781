use crate::domain::TournamentPolicy;

pub struct AnalysisSettings {
    pub min_opp_rating: f64,
    pub use_reference_bands: bool,
    /// Band opponents by their own average rating over the history window
    pub use_two_year_average: bool,
    /// How far before `since` the history window reaches
    pub history_months: u32,
    pub tournament_policy: TournamentPolicy,
    pub include_unrated: bool,
    pub time_classes: Vec<String>,
    /// Explicit baseline for expected scores; derived from the games when absent
    pub baseline_rating: Option<f64>,
    pub reference_path: String,
    pub top_opponents: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_opp_rating: 2500.0,
            use_reference_bands: false,
            use_two_year_average: false,
            history_months: 24,
            tournament_policy: TournamentPolicy::All,
            include_unrated: false,
            time_classes: vec!["blitz".to_string()],
            baseline_rating: None,
            reference_path: "reference_ratings.json".to_string(),
            top_opponents: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EstimatorSettings {
    /// Rating points per tenfold change in odds
    pub elo_scale: f64,
    /// Largest displacement from the average opponent rating
    pub max_displacement: f64,
    /// Normal quantile used for the confidence interval
    pub confidence_z: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            elo_scale: 400.0,
            max_displacement: 800.0,
            confidence_z: 1.96,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchingSettings {
    pub honorifics: Vec<&'static str>,
    pub strip_patterns: Vec<&'static str>,
    pub joining_punctuation: Vec<char>,
    /// Given-name spellings treated as one name: (canonical, alternatives)
    pub name_variants: Vec<(&'static str, Vec<&'static str>)>,
    /// Minimum candidate score accepted by token-overlap scoring
    pub acceptance_threshold: f64,
    /// Jaro-Winkler similarity below this counts as no match for a token
    pub token_similarity_floor: f64,
    /// Credit for a token contained in the other (both long enough)
    pub containment_credit: f64,
    pub partial_min_len: usize,
    pub min_shared_tokens: usize,
    pub min_fragment_len: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            honorifics: vec![
                "gm", "im", "fm", "cm", "nm", "wgm", "wim", "wfm", "wcm", "wnm", "dr", "mr", "mrs",
                "ms",
            ],
            strip_patterns: vec![
                r"\([a-z]{2,3}\)",
                r"\bgrandmaster\b",
                r"\binternational master\b",
                r"\bfide master\b",
                r"\bcandidate master\b",
            ],
            joining_punctuation: vec!['-', '\'', '.', '`', '\u{2019}'],
            name_variants: vec![
                ("oleksandr", vec!["olexandr", "alexander", "aleksandr", "alexandr"]),
                ("alexey", vec!["aleksei", "alexei", "aleksey", "alexej"]),
                ("sergey", vec!["sergei", "serhiy", "sergii"]),
                ("dmitry", vec!["dmitri", "dmitrij", "dmytro"]),
                ("mikhail", vec!["mykhailo", "michail"]),
                ("yuri", vec!["yury", "yuriy", "iurii"]),
            ],
            acceptance_threshold: 0.75,
            token_similarity_floor: 0.88,
            containment_credit: 0.85,
            partial_min_len: 5,
            min_shared_tokens: 2,
            min_fragment_len: 3,
        }
    }
}

pub struct ScraperSettings {
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub api_base_url: &'static str,
    pub cache_dir: &'static str,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 800,
            user_agent: "ChessBandPerformance/1.0 (+https://www.chess.com/news/view/published-data-api)",
            timeout_secs: 30,
            api_base_url: "https://api.chess.com/pub",
            cache_dir: "cache",
        }
    }
}

pub struct AppConfig {
    pub analysis: AnalysisSettings,
    pub estimator: EstimatorSettings,
    pub matching: MatchingSettings,
    pub scraper: ScraperSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            estimator: EstimatorSettings::default(),
            matching: MatchingSettings::default(),
            scraper: ScraperSettings::default(),
        }
    }

    pub fn database_path() -> String {
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "band_performance.db".to_string())
    }
}
