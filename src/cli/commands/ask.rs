use anyhow::{Result, bail};
use futures_util::StreamExt;
use std::io::{self, Write};

use crate::assistant::{AssistantClient, ChatEvent, ChatRequest};
use crate::config::{ConfigManager, resolve_endpoint};
use crate::formatter::StreamFormatter;
use crate::history::{HistoryStore, generate_chat_id};
use crate::input::InputReader;
use crate::status;
use crate::ui::{Spinner, Style};

pub struct AskOptions {
    pub question: Option<String>,
    pub endpoint: Option<String>,
    pub chat_id: Option<String>,
    pub no_stream: bool,
    pub raw: bool,
}

pub async fn run_ask(options: AskOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();
    let endpoint = resolve_endpoint(options.endpoint.as_deref(), &config)?;

    let question = match options.question {
        Some(question) => question,
        None => InputReader::read(None)?,
    };
    let question = question.trim().to_string();
    if question.is_empty() {
        bail!("Error: Input is empty");
    }

    let chat_id = options.chat_id.clone().unwrap_or_else(generate_chat_id);
    let client = AssistantClient::new(endpoint);
    let request = ChatRequest {
        message: question.clone(),
        chat_id: chat_id.clone(),
    };

    let answered = if options.no_stream {
        ask_sync(&client, &request).await?
    } else {
        ask_stream(&client, &request, options.raw).await?
    };

    if answered {
        let store = HistoryStore::new()?;
        store.note_exchange(&chat_id, &question)?;
        status!("{}", Style::hint(format!("chat id: {chat_id}")));
    }

    Ok(())
}

/// Fallback exchange against the synchronous endpoint: one request, one
/// complete answer, no partial output.
async fn ask_sync(client: &AssistantClient, request: &ChatRequest) -> Result<bool> {
    let spinner = Spinner::new("Waiting for answer...");
    let reply = client.chat_sync(request).await?;
    spinner.stop();

    print!("{}", reply.content);
    if !reply.content.ends_with('\n') {
        println!();
    }
    io::stdout().flush()?;

    status!(
        "{}",
        Style::hint(format!("answered in {:.1}s", reply.elapsed.as_secs_f64()))
    );
    Ok(!reply.content.is_empty())
}

/// Streams the answer, formatting report text as it arrives.
///
/// The answer goes to stdout (pipeable); "thinking" fragments go to
/// stderr so they never pollute piped output.
async fn ask_stream(client: &AssistantClient, request: &ChatRequest, raw: bool) -> Result<bool> {
    let spinner = Spinner::new("Thinking...");
    let mut stream = client.chat_stream(request).await?;

    let mut formatter = StreamFormatter::new();
    let mut first_chunk = true;
    let mut in_thinking = false;
    let mut answered = false;

    while let Some(event_result) = stream.next().await {
        if first_chunk {
            spinner.stop();
            first_chunk = false;
        }

        match event_result? {
            ChatEvent::Thinking(fragment) => {
                in_thinking = true;
                eprint!("{}", Style::thinking(fragment));
                crate::output::flush_stderr();
            }
            ChatEvent::Message(fragment) => {
                if in_thinking {
                    eprintln!();
                    eprintln!();
                    in_thinking = false;
                }
                answered = true;
                let shown = if raw {
                    fragment
                } else {
                    formatter.push(&fragment)
                };
                print!("{shown}");
                io::stdout().flush()?;
            }
            ChatEvent::Complete => break,
        }
    }

    if first_chunk {
        spinner.stop();
    }

    if !raw {
        print!("{}", formatter.finish());
    }
    if answered {
        println!();
    }
    io::stdout().flush()?;

    Ok(answered)
}
