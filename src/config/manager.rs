use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// Settings in the `[da]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaConfig {
    /// Base URL of the dispatch assistant backend.
    pub endpoint: Option<String>,
    /// Base URL of the TTS service.
    pub tts_endpoint: Option<String>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/da/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub da: DaConfig,
}

/// Resolves the assistant endpoint, preferring the CLI option over the
/// config file.
pub fn resolve_endpoint(cli_endpoint: Option<&str>, config: &ConfigFile) -> Result<String> {
    cli_endpoint
        .map(ToString::to_string)
        .or_else(|| config.da.endpoint.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'endpoint'\n\n\
                 Please provide it via:\n  \
                 - CLI option: da --endpoint <url>\n  \
                 - Config file: ~/.config/da/config.toml ([da] endpoint)"
            )
        })
}

/// Resolves the TTS endpoint, preferring the CLI option over the config
/// file. Callers fall back to mock synthesis when this fails.
pub fn resolve_tts_endpoint(cli_endpoint: Option<&str>, config: &ConfigFile) -> Result<String> {
    cli_endpoint
        .map(ToString::to_string)
        .or_else(|| config.da.tts_endpoint.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'tts_endpoint'\n\n\
                 Please provide it via:\n  \
                 - CLI option: da tts <command> --endpoint <url>\n  \
                 - Config file: ~/.config/da/config.toml ([da] tts_endpoint)"
            )
        })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/da/config.toml`
    /// or `~/.config/da/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir().join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}
