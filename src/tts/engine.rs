//! Speech synthesis orchestration.
//!
//! `TtsEngine` is a state machine over `{Idle, Generating, Ready, Error}`.
//! It validates input before any network traffic, runs either the mock or
//! the real synthesis path, and owns the generated audio file: at most one
//! is live at a time, the previous one is removed when a new one is
//! recorded, and `cleanup` removes the last one.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use super::client::TtsClient;
use super::config::{TtsConfig, TtsConfigStore, TtsOverrides};
use crate::paths;

/// Longest text the service accepts, in characters.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Placeholder MPEG audio written by mock synthesis: an ID3v2 tag
/// followed by one silent frame header.
const MOCK_AUDIO: &[u8] = &[
    0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x23, // ID3v2.4 header
    0x54, 0x53, 0x53, 0x45, 0x00, 0x00, 0x00, 0x0F, 0x00, 0x00, // TSSE frame
    0x03, 0x4C, 0x61, 0x76, 0x66, 0x35, 0x38, 0x2E, 0x37, 0x36, // "Lavf58.76"
    0x2E, 0x31, 0x30, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // ".100"
    0xFF, 0xFB, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // MPEG frame
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Synthesis failures, reported as values so the caller can present them
/// inline rather than crash the session.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Text must not be empty")]
    EmptyText,

    #[error("Text exceeds the 5000 character limit")]
    TextTooLong,

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Audio file error: {0}")]
    Audio(String),
}

/// Where synthesis runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsMode {
    /// Local placeholder synthesis; no network traffic.
    Mock,
    /// The real TTS service.
    Remote,
}

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsState {
    Idle,
    Generating,
    Ready,
    Error,
}

/// A successful synthesis: a playable local file plus a download URL.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub audio_path: PathBuf,
    pub download_url: String,
}

/// Synthesis orchestrator. One engine per user-facing TTS surface.
pub struct TtsEngine {
    client: TtsClient,
    config_store: TtsConfigStore,
    mode: TtsMode,
    audio_dir: PathBuf,
    state: TtsState,
    current_audio: Option<PathBuf>,
    last_error: Option<String>,
    seq: u64,
}

impl TtsEngine {
    pub fn new(client: TtsClient, config_store: TtsConfigStore, mode: TtsMode) -> Self {
        Self {
            client,
            config_store,
            mode,
            audio_dir: paths::cache_dir().join("tts"),
            state: TtsState::Idle,
            current_audio: None,
            last_error: None,
            seq: 0,
        }
    }

    /// Overrides where generated audio files are written.
    pub fn with_audio_dir(mut self, audio_dir: PathBuf) -> Self {
        self.audio_dir = audio_dir;
        self
    }

    pub const fn state(&self) -> TtsState {
        self.state
    }

    pub const fn mode(&self) -> TtsMode {
        self.mode
    }

    pub fn current_audio(&self) -> Option<&Path> {
        self.current_audio.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Synthesizes speech for `text` via `POST /convert/file` (or the
    /// mock path) and records the resulting audio file.
    ///
    /// Empty and over-length text fail fast, before any network call.
    pub async fn generate_speech(
        &mut self,
        text: &str,
        overrides: &TtsOverrides,
    ) -> Result<Synthesis, TtsError> {
        self.validate(text)?;
        self.state = TtsState::Generating;

        // Settings are re-read before every synthesis request.
        let config = self.config_store.load().merged(overrides);

        let result = match self.mode {
            TtsMode::Mock => self.synthesize_mock(&config),
            TtsMode::Remote => self.synthesize_remote(text, &config).await,
        };
        self.conclude(result)
    }

    /// Synthesizes via `POST /convert/stream`, writing the returned audio
    /// bytes straight to a local file.
    pub async fn generate_speech_stream(
        &mut self,
        text: &str,
        overrides: &TtsOverrides,
    ) -> Result<Synthesis, TtsError> {
        self.validate(text)?;
        self.state = TtsState::Generating;

        let config = self.config_store.load().merged(overrides);

        let result = match self.mode {
            TtsMode::Mock => self.synthesize_mock(&config),
            TtsMode::Remote => self.synthesize_remote_stream(text, &config).await,
        };
        self.conclude(result)
    }

    /// Removes the live audio file and returns the engine to `Idle`.
    pub fn cleanup(&mut self) {
        if let Some(path) = self.current_audio.take() {
            let _ = fs::remove_file(path);
        }
        self.state = TtsState::Idle;
        self.last_error = None;
    }

    fn validate(&mut self, text: &str) -> Result<(), TtsError> {
        if text.trim().is_empty() {
            return Err(self.fail(TtsError::EmptyText));
        }
        if text.chars().count() > MAX_TEXT_LENGTH {
            return Err(self.fail(TtsError::TextTooLong));
        }
        Ok(())
    }

    fn conclude(&mut self, result: Result<Synthesis, TtsError>) -> Result<Synthesis, TtsError> {
        match result {
            Ok(synthesis) => {
                self.install_audio(&synthesis.audio_path);
                self.state = TtsState::Ready;
                self.last_error = None;
                Ok(synthesis)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: TtsError) -> TtsError {
        self.state = TtsState::Error;
        self.last_error = Some(error.to_string());
        error
    }

    /// Records the new audio file, releasing the previous one first. At
    /// most one generated file is live at any time.
    fn install_audio(&mut self, new_path: &Path) {
        if let Some(previous) = self.current_audio.take() {
            if previous != new_path {
                let _ = fs::remove_file(&previous);
            }
        }
        self.current_audio = Some(new_path.to_path_buf());
    }

    fn allocate_audio_path(&mut self, config: &TtsConfig) -> Result<PathBuf, TtsError> {
        fs::create_dir_all(&self.audio_dir).map_err(|e| TtsError::Audio(e.to_string()))?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        self.seq += 1;

        Ok(self.audio_dir.join(format!(
            "tts_{}_{millis}_{}.{}",
            config.voice, self.seq, config.format
        )))
    }

    fn synthesize_mock(&mut self, config: &TtsConfig) -> Result<Synthesis, TtsError> {
        let path = self.allocate_audio_path(config)?;
        fs::write(&path, MOCK_AUDIO).map_err(|e| TtsError::Audio(e.to_string()))?;

        let download_url = path.display().to_string();
        Ok(Synthesis {
            audio_path: path,
            download_url,
        })
    }

    async fn synthesize_remote(
        &mut self,
        text: &str,
        config: &TtsConfig,
    ) -> Result<Synthesis, TtsError> {
        let outcome = self
            .client
            .convert_file(text, config)
            .await
            .map_err(|e| TtsError::Synthesis(e.to_string()))?;

        let file_path = match outcome.file_path {
            Some(path) if outcome.success => path,
            _ => {
                let message = if outcome.message.is_empty() {
                    "no file path in response".to_string()
                } else {
                    outcome.message
                };
                return Err(TtsError::Synthesis(message));
            }
        };

        let bytes = self
            .client
            .download(&file_path)
            .await
            .map_err(|e| TtsError::Audio(e.to_string()))?;

        let path = self.allocate_audio_path(config)?;
        fs::write(&path, &bytes).map_err(|e| TtsError::Audio(e.to_string()))?;

        Ok(Synthesis {
            audio_path: path,
            download_url: self.client.download_url(&file_path),
        })
    }

    async fn synthesize_remote_stream(
        &mut self,
        text: &str,
        config: &TtsConfig,
    ) -> Result<Synthesis, TtsError> {
        let bytes = self
            .client
            .convert_stream(text, config)
            .await
            .map_err(|e| TtsError::Synthesis(e.to_string()))?;

        let path = self.allocate_audio_path(config)?;
        fs::write(&path, &bytes).map_err(|e| TtsError::Audio(e.to_string()))?;

        let download_url = path.display().to_string();
        Ok(Synthesis {
            audio_path: path,
            download_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_engine(temp_dir: &TempDir, mode: TtsMode) -> TtsEngine {
        let client = TtsClient::new("http://127.0.0.1:9".to_string());
        let store = TtsConfigStore::open(temp_dir.path().join("tts-config.json"));
        TtsEngine::new(client, store, mode).with_audio_dir(temp_dir.path().join("audio"))
    }

    fn audio_files(temp_dir: &TempDir) -> Vec<PathBuf> {
        let dir = temp_dir.path().join("audio");
        if !dir.exists() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn test_empty_text_fails_before_any_network_call() {
        let temp_dir = TempDir::new().unwrap();
        // Remote mode against an unreachable endpoint: a validation
        // failure must return before the transport is touched.
        let mut engine = create_test_engine(&temp_dir, TtsMode::Remote);

        let result = engine.generate_speech("", &TtsOverrides::default()).await;
        assert!(matches!(result, Err(TtsError::EmptyText)));
        assert_eq!(engine.state(), TtsState::Error);
        assert!(audio_files(&temp_dir).is_empty());
    }

    #[tokio::test]
    async fn test_over_length_text_fails_before_any_network_call() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Remote);

        let text = "字".repeat(MAX_TEXT_LENGTH + 1);
        let result = engine.generate_speech(&text, &TtsOverrides::default()).await;
        assert!(matches!(result, Err(TtsError::TextTooLong)));
        assert_eq!(engine.state(), TtsState::Error);
    }

    #[tokio::test]
    async fn test_text_at_limit_passes_validation() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Mock);

        let text = "字".repeat(MAX_TEXT_LENGTH);
        let result = engine.generate_speech(&text, &TtsOverrides::default()).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_errors_have_distinct_literal_messages() {
        assert_eq!(TtsError::EmptyText.to_string(), "Text must not be empty");
        assert_eq!(
            TtsError::TextTooLong.to_string(),
            "Text exceeds the 5000 character limit"
        );
    }

    #[tokio::test]
    async fn test_mock_generation_reaches_ready() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Mock);

        let synthesis = engine
            .generate_speech("测试语音", &TtsOverrides::default())
            .await
            .unwrap();

        assert_eq!(engine.state(), TtsState::Ready);
        assert!(synthesis.audio_path.exists());
        assert_eq!(engine.current_audio(), Some(synthesis.audio_path.as_path()));
        assert!(engine.last_error().is_none());
    }

    #[tokio::test]
    async fn test_previous_audio_released_on_regeneration() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Mock);

        let first = engine
            .generate_speech("第一段", &TtsOverrides::default())
            .await
            .unwrap();
        let second = engine
            .generate_speech("第二段", &TtsOverrides::default())
            .await
            .unwrap();

        assert_ne!(first.audio_path, second.audio_path);
        assert!(!first.audio_path.exists());
        assert!(second.audio_path.exists());
        assert_eq!(audio_files(&temp_dir), vec![second.audio_path.clone()]);
    }

    #[tokio::test]
    async fn test_cleanup_removes_audio_and_resets_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Mock);

        let synthesis = engine
            .generate_speech("清理", &TtsOverrides::default())
            .await
            .unwrap();
        engine.cleanup();

        assert!(!synthesis.audio_path.exists());
        assert_eq!(engine.state(), TtsState::Idle);
        assert!(engine.current_audio().is_none());
    }

    #[tokio::test]
    async fn test_overrides_reach_the_audio_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Mock);

        let overrides = TtsOverrides {
            voice: Some("anna".to_string()),
            format: Some("wav".to_string()),
            ..TtsOverrides::default()
        };
        let synthesis = engine.generate_speech("hello", &overrides).await.unwrap();

        let name = synthesis.audio_path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("tts_anna_"));
        assert!(name.ends_with(".wav"));
    }

    #[tokio::test]
    async fn test_remote_failure_sets_error_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = create_test_engine(&temp_dir, TtsMode::Remote);

        // Nothing listens on the endpoint, so the transport fails.
        let result = engine
            .generate_speech("远程合成", &TtsOverrides::default())
            .await;

        assert!(matches!(result, Err(TtsError::Synthesis(_))));
        assert_eq!(engine.state(), TtsState::Error);
        assert!(engine.last_error().is_some());
    }
}
