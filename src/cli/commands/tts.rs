use anyhow::{Result, bail};
use std::fs;

use crate::cli::args::TtsCommand;
use crate::config::{ConfigFile, ConfigManager, resolve_tts_endpoint};
use crate::input::InputReader;
use crate::status;
use crate::tts::{
    TtsClient, TtsConfig, TtsConfigStore, TtsEngine, TtsMode, TtsOverrides, TtsStatus,
    VoiceCatalog,
};
use crate::ui::{Spinner, Style};

/// Placeholder endpoint for engines that will never touch the network.
const MOCK_ENDPOINT: &str = "http://localhost:8123/api/tts";

pub async fn run_tts(command: TtsCommand) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();

    match command {
        TtsCommand::Say {
            text,
            file,
            voice,
            language,
            format,
            stream,
            mock,
            endpoint,
            output,
        } => {
            let text = match text {
                Some(text) => text,
                None => InputReader::read(file.as_deref())?,
            };
            let overrides = TtsOverrides {
                voice,
                language,
                format,
                ..TtsOverrides::default()
            };
            say(
                &config_file,
                &text,
                &overrides,
                stream,
                mock,
                endpoint.as_deref(),
                output.as_deref(),
            )
            .await
        }
        TtsCommand::Voices { mock, endpoint } => {
            voices(&config_file, mock, endpoint.as_deref()).await
        }
        TtsCommand::Status { mock, endpoint } => {
            service_status(&config_file, mock, endpoint.as_deref()).await
        }
        TtsCommand::Cleanup {
            hours_old,
            endpoint,
        } => cleanup(&config_file, hours_old, endpoint.as_deref()).await,
        TtsCommand::Config {
            voice,
            language,
            format,
            speed,
            volume,
            enabled,
            reset,
        } => {
            let overrides = TtsOverrides {
                voice,
                language,
                format,
                speed,
                volume,
            };
            update_settings(&overrides, enabled, reset)
        }
    }
}

/// Picks mock or remote synthesis. An unconfigured TTS endpoint falls
/// back to mock so the command stays usable offline.
fn select_mode(
    config_file: &ConfigFile,
    mock: bool,
    endpoint: Option<&str>,
) -> (TtsMode, String) {
    if mock {
        return (TtsMode::Mock, MOCK_ENDPOINT.to_string());
    }
    match resolve_tts_endpoint(endpoint, config_file) {
        Ok(url) => (TtsMode::Remote, url),
        Err(_) => {
            status!("TTS endpoint not configured; using mock synthesis.");
            (TtsMode::Mock, MOCK_ENDPOINT.to_string())
        }
    }
}

async fn say(
    config_file: &ConfigFile,
    text: &str,
    overrides: &TtsOverrides,
    stream: bool,
    mock: bool,
    endpoint: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let store = TtsConfigStore::new()?;
    if !store.load().enabled {
        bail!("TTS is disabled. Enable it with: da tts config --enabled true");
    }

    let (mode, endpoint) = select_mode(config_file, mock, endpoint);
    let mut engine = TtsEngine::new(TtsClient::new(endpoint), store, mode);

    let spinner = Spinner::new("Synthesizing...");
    let result = if stream {
        engine.generate_speech_stream(text, overrides).await
    } else {
        engine.generate_speech(text, overrides).await
    };
    spinner.stop();

    let synthesis = result?;

    println!(
        "{} Audio written to {}",
        Style::success("✓"),
        Style::value(synthesis.audio_path.display())
    );
    if synthesis.download_url != synthesis.audio_path.display().to_string() {
        status!("{}", Style::hint(format!("download: {}", synthesis.download_url)));
    }

    if let Some(output) = output {
        fs::copy(&synthesis.audio_path, output)?;
        println!("{} Copied to {}", Style::success("✓"), Style::value(output));
    }

    Ok(())
}

async fn voices(config_file: &ConfigFile, mock: bool, endpoint: Option<&str>) -> Result<()> {
    let catalog = if mock {
        VoiceCatalog::builtin()
    } else {
        let (mode, endpoint) = select_mode(config_file, false, endpoint);
        if mode == TtsMode::Mock {
            VoiceCatalog::builtin()
        } else {
            let envelope = TtsClient::new(endpoint).voices().await?;
            match envelope.data {
                Some(catalog) if envelope.success => catalog,
                _ => bail!("Voice listing failed: {}", envelope.message),
            }
        }
    };

    println!("{}", Style::header("Voices"));
    for (language, voices) in catalog.groups() {
        println!(
            "  {}  {}",
            Style::label(format!("{language:<10}")),
            Style::value(voices.join(", "))
        );
    }
    Ok(())
}

async fn service_status(
    config_file: &ConfigFile,
    mock: bool,
    endpoint: Option<&str>,
) -> Result<()> {
    let (mode, endpoint) = if mock {
        (TtsMode::Mock, MOCK_ENDPOINT.to_string())
    } else {
        select_mode(config_file, false, endpoint)
    };

    let status = if mode == TtsMode::Mock {
        TtsStatus::mock()
    } else {
        let envelope = TtsClient::new(endpoint).status().await?;
        match envelope.data {
            Some(status) if envelope.success => status,
            _ => bail!("Status check failed: {}", envelope.message),
        }
    };

    println!("{}", Style::header("TTS service"));
    println!("  {}    {}", Style::label("status"), Style::value(&status.status));
    println!("  {}   {}", Style::label("version"), Style::value(&status.version));
    println!(
        "  {}   {}",
        Style::label("formats"),
        Style::value(status.supported_formats.join(", "))
    );
    println!(
        "  {}  {}",
        Style::label("max text"),
        Style::value(status.max_text_length)
    );
    Ok(())
}

async fn cleanup(config_file: &ConfigFile, hours_old: u32, endpoint: Option<&str>) -> Result<()> {
    // Cleanup only makes sense against the real service.
    let endpoint = resolve_tts_endpoint(endpoint, config_file)?;
    let envelope = TtsClient::new(endpoint).cleanup(hours_old).await?;

    if !envelope.success {
        bail!("Cleanup failed: {}", envelope.message);
    }

    let deleted = envelope.data.map_or(0, |summary| summary.deleted_count);
    println!(
        "{} Deleted {} file(s) older than {} hours",
        Style::success("✓"),
        Style::value(deleted),
        Style::value(hours_old)
    );
    Ok(())
}

fn update_settings(overrides: &TtsOverrides, enabled: Option<bool>, reset: bool) -> Result<()> {
    let store = TtsConfigStore::new()?;

    if reset {
        store.reset()?;
        println!("{} TTS settings reset to defaults", Style::success("✓"));
    }

    let has_overrides = overrides.voice.is_some()
        || overrides.language.is_some()
        || overrides.format.is_some()
        || overrides.speed.is_some()
        || overrides.volume.is_some();
    if has_overrides {
        store.update(overrides)?;
    }

    if let Some(enabled) = enabled {
        let mut config = store.load();
        config.enabled = enabled;
        store.save(&config)?;
    }

    print_settings(&store.load());
    Ok(())
}

fn print_settings(config: &TtsConfig) {
    println!("{}", Style::header("TTS settings"));
    println!("  {}      {}", Style::label("voice"), Style::value(&config.voice));
    println!(
        "  {}   {}",
        Style::label("language"),
        Style::value(&config.language)
    );
    println!("  {}     {}", Style::label("format"), Style::value(&config.format));
    println!("  {}      {}", Style::label("speed"), Style::value(config.speed));
    println!("  {}     {}", Style::label("volume"), Style::value(config.volume));
    println!(
        "  {}    {}",
        Style::label("enabled"),
        Style::value(config.enabled)
    );
}
