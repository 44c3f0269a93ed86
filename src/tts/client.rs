//! HTTP client for the TTS service.
//!
//! Every response body is deserialized into an explicit struct at the
//! boundary; nothing downstream touches loosely-shaped JSON.

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::config::TtsConfig;

/// Generic `{success, data, message}` envelope the service wraps most
/// responses in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
}

/// Payload of `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsStatus {
    pub status: String,
    pub version: String,
    #[serde(rename = "supportedFormats", default)]
    pub supported_formats: Vec<String>,
    #[serde(rename = "maxTextLength", default)]
    pub max_text_length: u32,
}

impl TtsStatus {
    /// The canned status reported in mock mode.
    pub fn mock() -> Self {
        Self {
            status: "running".to_string(),
            version: "1.0.0".to_string(),
            supported_formats: vec!["mp3".to_string(), "wav".to_string(), "ogg".to_string()],
            max_text_length: 5000,
        }
    }
}

/// Payload of `GET /voices`: voice names grouped by language.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceCatalog {
    #[serde(default)]
    pub chinese: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
    #[serde(default)]
    pub japanese: Vec<String>,
    #[serde(default)]
    pub korean: Vec<String>,
    #[serde(default)]
    pub cantonese: Vec<String>,
}

impl VoiceCatalog {
    /// The built-in catalog used in mock mode.
    pub fn builtin() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(ToString::to_string).collect()
        }
        Self {
            chinese: names(&["longwan", "xiaoqing", "xiaomeng", "xiaoxue", "xiaoyun"]),
            english: names(&["anna", "brian", "cathy", "david", "emily"]),
            japanese: names(&["haruka", "hikari", "kaori", "mai", "nana"]),
            korean: names(&["jihoon", "sujin", "yuna", "minjun", "hyejin"]),
            cantonese: names(&["xiaomin", "xiaofen", "xiaoya", "xiaoying", "xiaomei"]),
        }
    }

    /// Languages and their voices, in display order.
    pub fn groups(&self) -> Vec<(&'static str, &[String])> {
        vec![
            ("chinese", self.chinese.as_slice()),
            ("english", self.english.as_slice()),
            ("japanese", self.japanese.as_slice()),
            ("korean", self.korean.as_slice()),
            ("cantonese", self.cantonese.as_slice()),
        ]
    }
}

/// Response of `POST /convert/file` (not enveloped).
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertOutcome {
    pub success: bool,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Payload of `POST /cleanup`.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupSummary {
    #[serde(rename = "deletedCount", default)]
    pub deleted_count: u32,
    #[serde(rename = "totalSize", default)]
    pub total_size: u64,
}

#[derive(Debug, Serialize)]
struct ConvertRequest<'a> {
    text: &'a str,
    voice: &'a str,
    language: &'a str,
    format: &'a str,
}

/// Thin typed wrapper over the TTS HTTP surface.
pub struct TtsClient {
    client: Client,
    endpoint: String,
}

impl TtsClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.trim_end_matches('/'))
    }

    /// `GET /status`
    pub async fn status(&self) -> Result<ApiEnvelope<TtsStatus>> {
        let url = self.url("status");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS service: {url}"))?
            .error_for_status()
            .context("TTS status request failed")?;

        response.json().await.context("Failed to parse TTS status")
    }

    /// `GET /voices`
    pub async fn voices(&self) -> Result<ApiEnvelope<VoiceCatalog>> {
        let url = self.url("voices");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS service: {url}"))?
            .error_for_status()
            .context("TTS voices request failed")?;

        response.json().await.context("Failed to parse voice catalog")
    }

    /// `POST /convert/file`: synthesizes server-side and returns the
    /// server file path.
    pub async fn convert_file(&self, text: &str, config: &TtsConfig) -> Result<ConvertOutcome> {
        let url = self.url("convert/file");
        let request = ConvertRequest {
            text: text.trim(),
            voice: &config.voice,
            language: &config.language,
            format: &config.format,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS service: {url}"))?
            .error_for_status()
            .context("TTS conversion request failed")?;

        response
            .json()
            .await
            .context("Failed to parse TTS conversion response")
    }

    /// `POST /convert/stream`: synthesizes and returns the audio bytes
    /// directly.
    pub async fn convert_stream(&self, text: &str, config: &TtsConfig) -> Result<Bytes> {
        let url = self.url("convert/stream");
        let request = ConvertRequest {
            text: text.trim(),
            voice: &config.voice,
            language: &config.language,
            format: &config.format,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS service: {url}"))?
            .error_for_status()
            .context("TTS stream conversion failed")?;

        response.bytes().await.context("Failed to read audio stream")
    }

    /// `GET /download?filePath=`: fetches a previously synthesized file.
    pub async fn download(&self, file_path: &str) -> Result<Bytes> {
        let url = self.url("download");
        let response = self
            .client
            .get(&url)
            .query(&[("filePath", file_path)])
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS service: {url}"))?
            .error_for_status()
            .context("TTS download failed")?;

        response.bytes().await.context("Failed to read audio file")
    }

    /// Public URL for fetching a synthesized file (shown to the user).
    pub fn download_url(&self, file_path: &str) -> String {
        let mut url = self.url("download");
        url.push_str("?filePath=");
        // Percent-encode just enough for a file path in a query value.
        for c in file_path.chars() {
            match c {
                'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' | '/' => url.push(c),
                _ => {
                    let mut buf = [0u8; 4];
                    for byte in c.encode_utf8(&mut buf).as_bytes() {
                        url.push_str(&format!("%{byte:02X}"));
                    }
                }
            }
        }
        url
    }

    /// `POST /cleanup?hoursOld=`: asks the service to delete old files.
    pub async fn cleanup(&self, hours_old: u32) -> Result<ApiEnvelope<CleanupSummary>> {
        let url = self.url("cleanup");
        let response = self
            .client
            .post(&url)
            .query(&[("hoursOld", hours_old)])
            .send()
            .await
            .with_context(|| format!("Failed to connect to TTS service: {url}"))?
            .error_for_status()
            .context("TTS cleanup request failed")?;

        response
            .json()
            .await
            .context("Failed to parse cleanup response")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_encodes_query_value() {
        let client = TtsClient::new("http://localhost:8123/api/tts".to_string());
        let url = client.download_url("/tmp/tts/tts_龙婉 1.mp3");
        assert_eq!(
            url,
            "http://localhost:8123/api/tts/download?filePath=/tmp/tts/tts_%E9%BE%99%E5%A9%89%201.mp3"
        );
    }

    #[test]
    fn test_envelope_parses_status_payload() {
        let json = r#"{
            "success": true,
            "data": {
                "status": "running",
                "version": "1.0.0",
                "supportedFormats": ["mp3", "wav", "ogg"],
                "maxTextLength": 5000
            },
            "message": "TTS服务运行正常"
        }"#;

        let envelope: ApiEnvelope<TtsStatus> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        let status = envelope.data.unwrap();
        assert_eq!(status.status, "running");
        assert_eq!(status.max_text_length, 5000);
        assert_eq!(status.supported_formats.len(), 3);
    }

    #[test]
    fn test_convert_outcome_parses_wire_names() {
        let json = r#"{"success": true, "filePath": "/tmp/tts/a.mp3", "message": "ok"}"#;
        let outcome: ConvertOutcome = serde_json::from_str(json).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.file_path.as_deref(), Some("/tmp/tts/a.mp3"));
    }

    #[test]
    fn test_convert_outcome_tolerates_missing_file_path() {
        let json = r#"{"success": false, "message": "文本内容不能为空"}"#;
        let outcome: ConvertOutcome = serde_json::from_str(json).unwrap();
        assert!(!outcome.success);
        assert!(outcome.file_path.is_none());
    }

    #[test]
    fn test_builtin_catalog_has_all_groups() {
        let catalog = VoiceCatalog::builtin();
        for (language, voices) in catalog.groups() {
            assert_eq!(voices.len(), 5, "{language}");
        }
        assert!(catalog.chinese.contains(&"longwan".to_string()));
    }
}
