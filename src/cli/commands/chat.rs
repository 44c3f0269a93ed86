use anyhow::Result;

use crate::chat::{ChatSession, SessionConfig};
use crate::config::{ConfigManager, resolve_endpoint};

pub struct ChatOptions {
    pub endpoint: Option<String>,
    pub raw: bool,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();
    let endpoint = resolve_endpoint(options.endpoint.as_deref(), &config_file)?;

    let mut session = ChatSession::new(SessionConfig {
        endpoint,
        raw_output: options.raw,
    })?;
    session.run().await
}
