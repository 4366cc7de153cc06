//! Named component-list presets, one JSON file per preset.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, StoreError};

const PRESET_DIR: &str = "presets";

/// A reusable, named list of component names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub created_at: DateTime<Local>,
    pub components: Vec<String>,
}

/// Preset files under `<db_dir>/presets/`.
#[derive(Debug)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn open(db_dir: &Path) -> Self {
        Self {
            dir: db_dir.join(PRESET_DIR),
        }
    }

    /// File-safe form of a preset name: alphanumerics, space, `-`, `_`.
    pub fn sanitize(name: &str) -> Result<String> {
        let safe: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
            .collect();
        let safe = safe.trim().to_string();
        if safe.is_empty() {
            return Err(StoreError::InvalidPresetName(name.to_string()).into());
        }
        Ok(safe)
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name)?.exists())
    }

    /// Save a preset, overwriting any existing file of the same name.
    pub fn save(&self, name: &str, components: Vec<String>) -> Result<Preset> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.dir)?;
        let preset = Preset {
            name: name.to_string(),
            created_at: Local::now(),
            components,
        };
        let content = serde_json::to_string_pretty(&preset)?;
        std::fs::write(path, content)?;
        Ok(preset)
    }

    pub fn load(&self, name: &str) -> Result<Preset> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(StoreError::PresetNotFound(name.to_string()).into());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let preset = serde_json::from_str(&content)
            .map_err(|source| StoreError::Corrupt { path, source })?;
        Ok(preset)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(StoreError::PresetNotFound(name.to_string()).into());
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    /// All presets, newest first. Unreadable files are skipped with a warning.
    pub fn list(&self) -> Result<Vec<Preset>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut presets = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<Preset>(&content).map_err(|e| e.to_string())
                }) {
                Ok(preset) => presets.push(preset),
                Err(reason) => warn!(path = %path.display(), %reason, "skipping unreadable preset"),
            }
        }
        presets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(presets)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", Self::sanitize(name)?)))
    }
}
