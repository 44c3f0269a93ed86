//! Chat session metadata store.
//!
//! The assistant backend keeps full conversations; the CLI caches only an
//! ordered list of session metadata records, persisted as one JSON
//! document and synchronized opportunistically with the backend list
//! endpoint. Writers assume last-write-wins; there is no concurrent-writer
//! arbitration.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::fs::atomic_write;
use crate::paths;

/// Maximum characters of the first question kept as a session title.
const TITLE_LEN: usize = 20;

/// Metadata for one chat session, matching the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub title: String,
    pub time: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(rename = "messageCount", default)]
    pub message_count: u32,
}

fn default_kind() -> String {
    "dispatch".to_string()
}

/// Generates a unique session id of the form `chat-<millis>-<hash9>`.
pub fn generate_chat_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let millis = now.as_millis();

    let mut hasher = Sha256::new();
    hasher.update(millis.to_le_bytes());
    hasher.update(now.subsec_nanos().to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("chat-{millis}-{}", &digest[..9])
}

/// Current local time in the backend's history format.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Derives a session title from the first question.
pub fn derive_title(question: &str) -> String {
    let question = question.trim();
    let mut title: String = question.chars().take(TITLE_LEN).collect();
    if question.chars().count() > TITLE_LEN {
        title.push('…');
    }
    title
}

/// Whole-document JSON store for [`ChatRecord`]s.
pub struct HistoryStore {
    file_path: PathBuf,
}

impl HistoryStore {
    /// Opens the store at its default location under the data directory.
    pub fn new() -> Result<Self> {
        let data_dir = paths::data_dir();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            file_path: data_dir.join("chat-history.json"),
        })
    }

    /// Loads all records. A missing or unreadable document yields an
    /// empty list rather than an error.
    pub fn load(&self) -> Vec<ChatRecord> {
        fs::read_to_string(&self.file_path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    /// Replaces the whole document.
    pub fn save(&self, records: &[ChatRecord]) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(records).context("Failed to serialize chat history")?;
        atomic_write(&self.file_path, &contents).with_context(|| {
            format!("Failed to write chat history: {}", self.file_path.display())
        })
    }

    /// Updates a record in place, or prepends it as the newest session.
    pub fn upsert(&self, record: ChatRecord) -> Result<()> {
        let mut records = self.load();
        if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            records.insert(0, record);
        }
        self.save(&records)
    }

    /// Records one completed question/answer exchange for a session:
    /// bumps the message count and timestamp, creating the record with a
    /// derived title on the first exchange.
    pub fn note_exchange(&self, chat_id: &str, question: &str) -> Result<()> {
        let mut records = self.load();
        if let Some(existing) = records.iter_mut().find(|r| r.id == chat_id) {
            existing.message_count += 2;
            existing.time = now_timestamp();
        } else {
            records.insert(
                0,
                ChatRecord {
                    id: chat_id.to_string(),
                    title: derive_title(question),
                    time: now_timestamp(),
                    kind: default_kind(),
                    message_count: 2,
                },
            );
        }
        self.save(&records)
    }

    /// Removes one session's metadata (local only).
    pub fn remove(&self, chat_id: &str) -> Result<()> {
        let mut records = self.load();
        records.retain(|r| r.id != chat_id);
        self.save(&records)
    }

    /// Drops the whole local document.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove chat history: {}", self.file_path.display())
            }),
        }
    }

    /// Overwrites the local cache with the backend list. A backend list
    /// that came back empty is ignored so a cold backend does not wipe
    /// the local cache.
    pub fn replace_from_backend(&self, records: &[ChatRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.save(records)
    }
}
