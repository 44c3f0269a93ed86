use clap::Parser;

use da_cli::cli::commands::{ask, chat, history, tts};
use da_cli::cli::{Args, Command};
use da_cli::output::{self, OutputConfig};
use da_cli::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        ..OutputConfig::default()
    });

    if let Err(e) = run(args).await {
        eprintln!("{} {e:#}", Style::error("Error:"));
        std::process::exit(exitcode::SOFTWARE);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Some(Command::Chat { endpoint, raw }) => {
            chat::run_chat(chat::ChatOptions { endpoint, raw }).await
        }
        Some(Command::History { command }) => history::run_history(command).await,
        Some(Command::Tts { command }) => tts::run_tts(command).await,
        None => {
            ask::run_ask(ask::AskOptions {
                question: args.question,
                endpoint: args.endpoint,
                chat_id: args.chat_id,
                no_stream: args.no_stream,
                raw: args.raw,
            })
            .await
        }
    }
}
