use log::info;

/// Track progress of per-opponent profile lookups
pub struct LookupProgress {
    label: &'static str,
    total: usize,
    fetched: usize,
    cached: usize,
    failed: usize,
}

impl LookupProgress {
    pub fn new(label: &'static str, total: usize) -> Self {
        Self {
            label,
            total,
            fetched: 0,
            cached: 0,
            failed: 0,
        }
    }

    pub fn increment_fetched(&mut self) {
        self.fetched += 1;
        self.log_progress();
    }

    pub fn increment_cached(&mut self) {
        self.cached += 1;
        self.log_progress();
    }

    pub fn increment_failed(&mut self) {
        self.failed += 1;
        self.log_progress();
    }

    pub fn current_count(&self) -> usize {
        self.fetched + self.cached + self.failed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    fn log_progress(&self) {
        let current = self.current_count();
        if should_log(current, self.total) {
            info!(
                "  → {}: {}/{} ({} new, {} cached, {} failed)",
                self.label, current, self.total, self.fetched, self.cached, self.failed
            );
        }
    }
}

fn should_log(current: usize, total: usize) -> bool {
    is_milestone(current) || is_complete(current, total)
}

fn is_milestone(count: usize) -> bool {
    count % 10 == 0
}

fn is_complete(current: usize, total: usize) -> bool {
    current == total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_every_kind_of_lookup() {
        let mut progress = LookupProgress::new("Profiles", 3);
        progress.increment_fetched();
        progress.increment_cached();
        progress.increment_failed();

        assert_eq!(progress.current_count(), 3);
        assert_eq!(progress.failed(), 1);
    }

    #[test]
    fn test_logs_on_milestones_and_completion() {
        assert!(should_log(10, 25));
        assert!(should_log(25, 25));
        assert!(!should_log(7, 25));
    }
}
