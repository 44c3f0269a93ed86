//! Configuration file management.

mod manager;

pub use manager::{ConfigFile, ConfigManager, DaConfig, resolve_endpoint, resolve_tts_endpoint};
