use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "da")]
#[command(about = "Streaming CLI client for the dispatch QA assistant")]
#[command(version)]
pub struct Args {
    /// Question to ask (reads from stdin if not provided)
    pub question: Option<String>,

    /// Assistant endpoint URL
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Continue an existing chat session
    #[arg(short = 'c', long = "chat-id")]
    pub chat_id: Option<String>,

    /// Use the synchronous endpoint instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Print the answer without report formatting
    #[arg(long)]
    pub raw: bool,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat mode
    Chat {
        /// Assistant endpoint URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,

        /// Print answers without report formatting
        #[arg(long)]
        raw: bool,
    },
    /// Manage cached chat history
    History {
        #[command(subcommand)]
        command: Option<HistoryCommand>,
    },
    /// Text-to-speech utilities
    Tts {
        #[command(subcommand)]
        command: TtsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List cached sessions
    List,
    /// Pull the session list from the backend
    Sync {
        /// Assistant endpoint URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,
    },
    /// Remove one cached session
    Remove {
        /// Session id (chat-...)
        chat_id: String,
    },
    /// Clear the local cache
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum TtsCommand {
    /// Synthesize speech for text
    Say {
        /// Text to synthesize (reads from --file or stdin if not provided)
        text: Option<String>,

        /// Read the text from a file
        #[arg(short = 'f', long)]
        file: Option<String>,

        /// Voice name (e.g. longwan, anna)
        #[arg(long)]
        voice: Option<String>,

        /// Voice language (chinese, english, japanese, korean, cantonese)
        #[arg(long)]
        language: Option<String>,

        /// Audio format (mp3, wav, ogg)
        #[arg(long)]
        format: Option<String>,

        /// Use the streaming conversion endpoint
        #[arg(long)]
        stream: bool,

        /// Force mock synthesis (no TTS service required)
        #[arg(long)]
        mock: bool,

        /// TTS service URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,

        /// Copy the generated audio to this path
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// List available voices
    Voices {
        /// Use the built-in catalog instead of the service
        #[arg(long)]
        mock: bool,

        /// TTS service URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,
    },
    /// Check TTS service status
    Status {
        /// Report mock status instead of querying the service
        #[arg(long)]
        mock: bool,

        /// TTS service URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,
    },
    /// Ask the service to delete old temporary files
    Cleanup {
        /// Delete files older than this many hours
        #[arg(long, default_value_t = 24)]
        hours_old: u32,

        /// TTS service URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,
    },
    /// Show or change persisted TTS settings
    Config {
        /// Voice name
        #[arg(long)]
        voice: Option<String>,

        /// Voice language
        #[arg(long)]
        language: Option<String>,

        /// Audio format
        #[arg(long)]
        format: Option<String>,

        /// Speech speed multiplier
        #[arg(long)]
        speed: Option<f32>,

        /// Playback volume multiplier
        #[arg(long)]
        volume: Option<f32>,

        /// Enable or disable TTS
        #[arg(long)]
        enabled: Option<bool>,

        /// Restore default settings
        #[arg(long)]
        reset: bool,
    },
}
