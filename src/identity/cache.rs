use std::collections::HashMap;

use super::normalization::{NormalizationRules, NormalizedName};

/// Memoizes query-side normalization for the lifetime of one resolver
#[derive(Debug, Default)]
pub struct NormalizationCache {
    entries: HashMap<String, NormalizedName>,
    hits: usize,
}

impl NormalizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, rules: &NormalizationRules, text: &str) -> NormalizedName {
        if let Some(name) = self.entries.get(text) {
            self.hits += 1;
            return name.clone();
        }

        let name = rules.normalize(text);
        self.entries.insert(text.to_string(), name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingSettings;

    #[test]
    fn test_repeated_lookups_hit_cache() {
        let rules = NormalizationRules::from_settings(&MatchingSettings::default()).unwrap();
        let mut cache = NormalizationCache::new();

        let first = cache.normalize(&rules, "Carlsen, Magnus");
        let second = cache.normalize(&rules, "Carlsen, Magnus");

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }
}
