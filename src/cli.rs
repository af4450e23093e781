use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::settings::AppConfig;
use crate::domain::TournamentPolicy;
use crate::reference::RatingColumn;

#[derive(Parser, Debug)]
#[command(author, version, about = "Performance by opponent rating band for Chess.com players")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Fetch a player's games and report performance per opponent band
    Analyze(AnalyzeArgs),
    /// Build the reference rating store from a FIDE players list
    BuildReference {
        /// FIDE players list (fixed-width text)
        #[arg(short, long)]
        input: String,
        /// Output JSON path
        #[arg(short, long, default_value = "reference_ratings.json")]
        output: String,
        /// Keep players rated at least this much
        #[arg(long, default_value_t = 2500)]
        min_rating: i32,
        /// Rating column to use
        #[arg(long, value_enum, default_value_t = RatingColumn::Blitz)]
        column: RatingColumn,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    /// Chess.com username (case-insensitive)
    #[arg(short, long)]
    pub player: String,
    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub since: NaiveDate,
    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub until: NaiveDate,
    /// Minimum opponent rating
    #[arg(long, default_value_t = 2500.0)]
    pub min_opp: f64,
    /// Band opponents by reference (FIDE) rating where they can be identified
    #[arg(long)]
    pub use_reference: bool,
    /// Band opponents by their own average rating over the two years before --since
    #[arg(long)]
    pub two_year_avg: bool,
    /// Reference store path
    #[arg(long, default_value = "reference_ratings.json")]
    pub reference: String,
    /// Which games count
    #[arg(long, value_enum, default_value_t = TournamentPolicy::All)]
    pub tournament_policy: TournamentPolicy,
    /// Include unrated games
    #[arg(long)]
    pub include_unrated: bool,
    /// Comma-separated time classes
    #[arg(long, value_delimiter = ',', default_value = "blitz")]
    pub time_classes: Vec<String>,
    /// Rating to compute expected scores from (default: the player's own average)
    #[arg(long)]
    pub baseline: Option<f64>,
    /// Opponents shown in the console table
    #[arg(long, default_value_t = 20)]
    pub top: usize,
    /// Always refetch from the API
    #[arg(long)]
    pub no_cache: bool,
    /// Do not write the run to the report database
    #[arg(long)]
    pub no_save: bool,
}

impl AnalyzeArgs {
    /// Defaults overridden by this run's flags
    pub fn to_config(&self) -> AppConfig {
        let mut config = AppConfig::new();
        let analysis = &mut config.analysis;

        analysis.min_opp_rating = self.min_opp;
        analysis.use_reference_bands = self.use_reference;
        analysis.use_two_year_average = self.two_year_avg;
        analysis.reference_path = self.reference.clone();
        analysis.tournament_policy = self.tournament_policy;
        analysis.include_unrated = self.include_unrated;
        analysis.time_classes = self
            .time_classes
            .iter()
            .map(|tc| tc.trim().to_lowercase())
            .filter(|tc| !tc.is_empty())
            .collect();
        analysis.baseline_rating = self.baseline;
        analysis.top_opponents = self.top;

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "chess_band_performance",
            "analyze",
            "--player",
            "Hikaru",
            "--since",
            "2024-01-01",
            "--until",
            "2024-06-30",
            "--tournament-policy",
            "titled-tuesday-only",
            "--time-classes",
            "blitz,Bullet",
            "--use-reference",
        ])
        .unwrap();

        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.since, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(args.min_opp, 2500.0);

        let config = args.to_config();
        assert_eq!(config.analysis.tournament_policy, TournamentPolicy::TitledTuesdayOnly);
        assert_eq!(config.analysis.time_classes, vec!["blitz", "bullet"]);
        assert!(config.analysis.use_reference_bands);
        assert!(!config.analysis.use_two_year_average);
    }

    #[test]
    fn test_parse_two_year_average() {
        let cli = Cli::try_parse_from([
            "chess_band_performance",
            "analyze",
            "--player",
            "Hikaru",
            "--since",
            "2024-01-01",
            "--until",
            "2024-06-30",
            "--two-year-avg",
        ])
        .unwrap();

        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let config = args.to_config();
        assert!(config.analysis.use_two_year_average);
        assert_eq!(config.analysis.history_months, 24);
        assert!(!config.analysis.use_reference_bands);
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "chess_band_performance",
            "analyze",
            "--player",
            "x",
            "--since",
            "2024-13-01",
            "--until",
            "2024-06-30",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_build_reference() {
        let cli = Cli::try_parse_from([
            "chess_band_performance",
            "build-reference",
            "--input",
            "players_list_foa.txt",
            "--column",
            "standard",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::BuildReference {
                input: "players_list_foa.txt".to_string(),
                output: "reference_ratings.json".to_string(),
                min_rating: 2500,
                column: RatingColumn::Standard,
            }
        );
    }
}
