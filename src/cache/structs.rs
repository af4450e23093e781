use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;

/// File cache of raw Chess.com responses: monthly archives and profiles
pub struct Cache {
    cache_dir: PathBuf,
    archives_dir: PathBuf,
    profiles_dir: PathBuf,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        let archives_dir = cache_dir.join("archives");
        let profiles_dir = cache_dir.join("profiles");

        fs::create_dir_all(&archives_dir).context("Failed to create archive cache directory")?;
        fs::create_dir_all(&profiles_dir).context("Failed to create profile cache directory")?;

        Ok(Self {
            cache_dir,
            archives_dir,
            profiles_dir,
        })
    }

    pub fn load_month(&self, player: &str, year: i32, month: u32) -> Result<Option<Value>> {
        let key = month_key(player, year, month);
        let data = self.read_json_opt(&self.archives_dir.join(format!("{}.json", key)))
            .with_context(|| cache_context("load", &key))?;
        if data.is_some() {
            debug!("Loaded archive from cache: {}", key);
        }
        Ok(data)
    }

    pub fn save_month(&self, player: &str, year: i32, month: u32, data: &Value) -> Result<()> {
        let key = month_key(player, year, month);
        self.write_json(&self.archives_dir.join(format!("{}.json", key)), data)
            .with_context(|| cache_context("save", &key))
    }

    pub fn load_profile(&self, username: &str) -> Result<Option<Value>> {
        let key = sanitize(username);
        self.read_json_opt(&self.profiles_dir.join(format!("{}.json", key)))
            .with_context(|| cache_context("load", &key))
    }

    pub fn save_profile(&self, username: &str, data: &Value) -> Result<()> {
        let key = sanitize(username);
        self.write_json(&self.profiles_dir.join(format!("{}.json", key)), data)
            .with_context(|| cache_context("save", &key))
    }

    /// Clear all cached data
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;

        fs::create_dir_all(&self.archives_dir).context("Failed to recreate cache directory")?;
        fs::create_dir_all(&self.profiles_dir).context("Failed to recreate cache directory")?;

        info!("Cleared cache directory");
        Ok(())
    }

    // --- Helper Methods ---

    fn write_json(&self, path: &Path, data: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt(&self, path: &Path) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}

/// Only finished months are stable; the current month keeps growing
pub fn is_cacheable_month(year: i32, month: u32, today: NaiveDate) -> bool {
    (year, month) < (today.year(), today.month())
}

fn month_key(player: &str, year: i32, month: u32) -> String {
    format!("{}_{:04}_{:02}", sanitize(player), year, month)
}

fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
