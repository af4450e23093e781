use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::ReferenceRecord;
use crate::errors::AnalysisError;

/// Read-only mapping canonical name → reference rating, loaded once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceStore {
    ratings: BTreeMap<String, i32>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates keep the higher rating
    pub fn from_records<I: IntoIterator<Item = ReferenceRecord>>(records: I) -> Self {
        let mut ratings = BTreeMap::new();
        for record in records {
            let entry = ratings.entry(record.canonical_name).or_insert(record.rating);
            *entry = (*entry).max(record.rating);
        }
        Self { ratings }
    }

    /// Load the JSON object written by `save`. A missing or empty file is a
    /// configuration error: reference banding cannot run without entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalysisError::configuration(format!(
                "reference store not found: {}",
                path.display()
            ))
            .into());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference store {}", path.display()))?;
        let ratings: BTreeMap<String, i32> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse reference store {}", path.display()))?;

        if ratings.is_empty() {
            return Err(AnalysisError::configuration(format!(
                "reference store is empty: {}",
                path.display()
            ))
            .into());
        }

        info!("Loaded {} reference ratings from {}", ratings.len(), path.display());
        Ok(Self { ratings })
    }

    /// Pretty JSON, highest rating first
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_sorted_json()?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write reference store {}", path.display()))?;

        info!("Saved {} reference ratings to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, canonical_name: &str) -> Option<i32> {
        self.ratings.get(canonical_name).copied()
    }

    pub fn records(&self) -> impl Iterator<Item = ReferenceRecord> + '_ {
        self.ratings.iter().map(|(name, &rating)| ReferenceRecord {
            canonical_name: name.clone(),
            rating,
        })
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    fn to_sorted_json(&self) -> Result<String> {
        let mut entries: Vec<(&String, &i32)> = self.ratings.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let object: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(name, &rating)| (name.clone(), serde_json::Value::from(rating)))
            .collect();

        serde_json::to_string_pretty(&object).context("Failed to serialize reference store")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, rating: i32) -> ReferenceRecord {
        ReferenceRecord {
            canonical_name: name.to_string(),
            rating,
        }
    }

    #[test]
    fn test_duplicates_keep_highest_rating() {
        let store = ReferenceStore::from_records(vec![
            record("Duda, Jan-Krzysztof", 2730),
            record("Duda, Jan-Krzysztof", 2755),
            record("Carlsen, Magnus", 2886),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Duda, Jan-Krzysztof"), Some(2755));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("band_performance_reference_test.json");
        let store = ReferenceStore::from_records(vec![
            record("Nakamura, Hikaru", 2838),
            record("Kramnik, Vladimir", 2635),
        ]);

        store.save(&path).unwrap();
        let loaded = ReferenceStore::load(&path).unwrap();
        assert_eq!(loaded, store);

        // Cleanup
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_store_is_configuration_error() {
        let path = std::env::temp_dir().join("band_performance_reference_missing.json");
        let err = ReferenceStore::load(&path).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_store_is_configuration_error() {
        let path = std::env::temp_dir().join("band_performance_reference_empty.json");
        fs::write(&path, "{}").unwrap();

        let err = ReferenceStore::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::Configuration { .. })
        ));

        fs::remove_file(&path).unwrap();
    }
}
