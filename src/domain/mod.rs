pub mod aggregates;
pub mod ingestion;
pub mod models;
mod progress;
pub mod responses;

pub use aggregates::{BandAggregate, OpponentAggregate, RatedOutcome};
pub use ingestion::{IngestFilter, IngestedGames, Ingestor, average_rating, own_ratings};
pub use models::*;
pub use progress::LookupProgress;
