use crate::config::MatchingSettings;

/// Fuzzy token comparison used by the overlap and username steps
#[derive(Debug, Clone)]
pub struct TokenScorer {
    similarity_floor: f64,
    containment_credit: f64,
    partial_min_len: usize,
}

impl TokenScorer {
    pub fn from_settings(settings: &MatchingSettings) -> Self {
        Self {
            similarity_floor: settings.token_similarity_floor,
            containment_credit: settings.containment_credit,
            partial_min_len: settings.partial_min_len,
        }
    }

    pub fn token_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        if self.is_partial_match(a, b) {
            return self.containment_credit;
        }

        let similarity = strsim::jaro_winkler(a, b);
        if similarity >= self.similarity_floor {
            similarity
        } else {
            0.0
        }
    }

    /// Sum of best per-token similarities over the larger token count, in [0, 1]
    pub fn candidate_score(&self, query: &[String], candidate: &[String]) -> f64 {
        let denominator = query.len().max(candidate.len());
        if denominator == 0 {
            return 0.0;
        }

        let total: f64 = query
            .iter()
            .map(|q| {
                candidate
                    .iter()
                    .map(|c| self.token_similarity(q, c))
                    .fold(0.0, f64::max)
            })
            .sum();

        (total / denominator as f64).min(1.0)
    }

    fn is_partial_match(&self, a: &str, b: &str) -> bool {
        let long_enough = |s: &str| s.chars().count() >= self.partial_min_len;
        long_enough(a) && long_enough(b) && (a.contains(b) || b.contains(a))
    }
}
