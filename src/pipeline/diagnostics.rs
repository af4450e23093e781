use log::info;
use serde::Serialize;

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub games_received: usize,
    pub games_below_minimum: usize,
    pub games_dropped_by_policy: usize,
    pub unique_opponents: usize,
    pub resolved_opponents: usize,
    pub fallback_opponents: usize,
    /// Opponents banded by their own average rating over the history window
    pub averaged_opponents: usize,
    pub opponents_below_minimum: usize,
    pub skipped_rows: usize,
    /// Raw records the game source could not use
    pub ingestion_skipped: usize,
}

impl Diagnostics {
    pub fn games_used(&self) -> usize {
        self.games_received - self.games_below_minimum - self.games_dropped_by_policy
    }

    pub fn log_summary(&self) {
        info!("Run diagnostics:");
        info!(
            "  Games: {} received, {} used, {} below minimum, {} dropped by tournament policy",
            self.games_received,
            self.games_used(),
            self.games_below_minimum,
            self.games_dropped_by_policy
        );
        info!(
            "  Opponents: {} unique, {} resolved, {} platform fallback, {} below minimum",
            self.unique_opponents,
            self.resolved_opponents,
            self.fallback_opponents,
            self.opponents_below_minimum
        );
        if self.averaged_opponents > 0 {
            info!("  Banded by two-year average: {}", self.averaged_opponents);
        }
        if self.skipped_rows > 0 || self.ingestion_skipped > 0 {
            info!(
                "  Skipped: {} result rows, {} malformed records",
                self.skipped_rows, self.ingestion_skipped
            );
        }
    }
}
