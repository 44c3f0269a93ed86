//! TTS settings, persisted as one JSON document.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::fs::atomic_write;
use crate::paths;

/// User-facing synthesis settings.
///
/// Read before every synthesis request; written whole on every change
/// (last write wins, no partial updates at the storage layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    pub voice: String,
    pub language: String,
    pub format: String,
    pub speed: f32,
    pub volume: f32,
    pub enabled: bool,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            voice: "longwan".to_string(),
            language: "chinese".to_string(),
            format: "mp3".to_string(),
            speed: 1.0,
            volume: 1.0,
            enabled: true,
        }
    }
}

/// Per-call overrides merged over the persisted settings.
#[derive(Debug, Clone, Default)]
pub struct TtsOverrides {
    pub voice: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
    pub speed: Option<f32>,
    pub volume: Option<f32>,
}

impl TtsConfig {
    /// Returns a copy with the given overrides applied.
    pub fn merged(&self, overrides: &TtsOverrides) -> Self {
        Self {
            voice: overrides.voice.clone().unwrap_or_else(|| self.voice.clone()),
            language: overrides
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
            format: overrides
                .format
                .clone()
                .unwrap_or_else(|| self.format.clone()),
            speed: overrides.speed.unwrap_or(self.speed),
            volume: overrides.volume.unwrap_or(self.volume),
            enabled: self.enabled,
        }
    }
}

/// Whole-document JSON store for [`TtsConfig`].
pub struct TtsConfigStore {
    file_path: PathBuf,
}

impl TtsConfigStore {
    /// Opens the store at its default location under the data directory.
    pub fn new() -> Result<Self> {
        let data_dir = paths::data_dir();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            file_path: data_dir.join("tts-config.json"),
        })
    }

    /// Opens the store at an explicit path.
    pub fn open(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Loads the settings; a missing or unparseable document falls back
    /// to the defaults.
    pub fn load(&self) -> TtsConfig {
        fs::read_to_string(&self.file_path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, config: &TtsConfig) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(config).context("Failed to serialize TTS settings")?;
        atomic_write(&self.file_path, &contents).with_context(|| {
            format!("Failed to write TTS settings: {}", self.file_path.display())
        })
    }

    /// Applies overrides to the persisted settings and writes them back.
    pub fn update(&self, overrides: &TtsOverrides) -> Result<TtsConfig> {
        let merged = self.load().merged(overrides);
        self.save(&merged)?;
        Ok(merged)
    }

    /// Restores the defaults.
    pub fn reset(&self) -> Result<TtsConfig> {
        let config = TtsConfig::default();
        self.save(&config)?;
        Ok(config)
    }

    /// Flips the enabled switch and writes the document back.
    pub fn toggle_enabled(&self) -> Result<TtsConfig> {
        let mut config = self.load();
        config.enabled = !config.enabled;
        self.save(&config)?;
        Ok(config)
    }
}
