pub mod bands;
pub mod performance;
pub mod types;

pub use bands::{BandClassifier, classify};
pub use performance::PerformanceEstimator;
pub use types::{ConfidenceInterval, PerformanceResult};
