pub mod settings;

pub use settings::{AnalysisSettings, AppConfig, EstimatorSettings, MatchingSettings, ScraperSettings};
