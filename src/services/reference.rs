use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::reference::fide_list::{self, RatingColumn};
use crate::reference::ReferenceStore;

/// Builds the reference store from a FIDE players list download
pub struct ReferenceBuildService {
    input: PathBuf,
    output: PathBuf,
    min_rating: i32,
    column: RatingColumn,
}

impl ReferenceBuildService {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        input: P,
        output: Q,
        min_rating: i32,
        column: RatingColumn,
    ) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            min_rating,
            column,
        }
    }

    pub fn run(&self) -> Result<ReferenceStore> {
        info!("=== Building Reference Ratings ===\n");

        // Step 1: Read the players list (not always valid UTF-8)
        let bytes = fs::read(&self.input)
            .with_context(|| format!("Failed to read FIDE list {}", self.input.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        info!("  → Read {} bytes from {}\n", bytes.len(), self.input.display());

        // Step 2: Parse and filter
        let summary = fide_list::parse(&text, self.min_rating, self.column)?;
        info!(
            "  → {} of {} players rated >= {}\n",
            summary.records.len(),
            summary.player_lines,
            self.min_rating
        );

        // Step 3: Save
        let store = ReferenceStore::from_records(summary.records);
        store.save(&self.output)?;

        info!("=== Reference Build Complete ===");
        Ok(store)
    }
}
