use anyhow::Result;
use futures_util::StreamExt;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::io::{self, Write};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::assistant::{AssistantClient, ChatEvent, ChatRequest};
use crate::formatter::StreamFormatter;
use crate::history::{HistoryStore, generate_chat_id};
use crate::ui::{Spinner, Style};

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The assistant endpoint URL.
    pub endpoint: String,
    /// Print answers without report formatting.
    pub raw_output: bool,
}

/// An interactive chat session with the dispatch assistant.
///
/// Provides a REPL-style interface; each session keeps one chat id so the
/// backend retains conversation memory across turns.
pub struct ChatSession {
    config: SessionConfig,
    client: AssistantClient,
    history: HistoryStore,
    formatter: StreamFormatter,
    chat_id: String,
}

impl ChatSession {
    /// Creates a new chat session with the given configuration.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let client = AssistantClient::new(config.endpoint.clone());
        Ok(Self {
            config,
            client,
            history: HistoryStore::new()?,
            formatter: StreamFormatter::new(),
            chat_id: generate_chat_id(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header();

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Ask a question, /help for commands, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(&cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => {
                        self.ask_and_print(&text).await;
                    }
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    fn handle_command(&mut self, cmd: &SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => {
                ui::print_config(&self.config, &self.chat_id);
                true
            }
            SlashCommand::Help => {
                ui::print_help();
                true
            }
            SlashCommand::History => {
                ui::print_history(&self.history.load());
                true
            }
            SlashCommand::New => {
                self.start_new_session();
                true
            }
            SlashCommand::Raw => {
                self.config.raw_output = !self.config.raw_output;
                println!(
                    "{} Report formatting {}\n",
                    Style::success("✓"),
                    Style::value(if self.config.raw_output { "off" } else { "on" })
                );
                true
            }
            SlashCommand::Quit => false,
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
                true
            }
        }
    }

    fn start_new_session(&mut self) {
        self.chat_id = generate_chat_id();
        self.formatter.reset();
        println!(
            "{} Started new session {}\n",
            Style::success("✓"),
            Style::value(&self.chat_id)
        );
    }

    /// Streams one answer. Transport errors end the turn, not the REPL.
    async fn ask_and_print(&mut self, text: &str) {
        let request = ChatRequest {
            message: text.to_string(),
            chat_id: self.chat_id.clone(),
        };

        let spinner = Spinner::new("Thinking...");

        let mut stream = match self.client.chat_stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                spinner.stop();
                ui::print_error(&e.to_string());
                return;
            }
        };

        self.formatter.reset();
        let mut first_chunk = true;
        let mut in_thinking = false;
        let mut answered = false;

        while let Some(event_result) = stream.next().await {
            if first_chunk {
                spinner.stop();
                first_chunk = false;
            }

            match event_result {
                Ok(ChatEvent::Thinking(fragment)) => {
                    in_thinking = true;
                    print!("{}", Style::thinking(fragment));
                    let _ = io::stdout().flush();
                }
                Ok(ChatEvent::Message(fragment)) => {
                    if in_thinking {
                        // Separate the dimmed reasoning from the answer.
                        println!();
                        println!();
                        in_thinking = false;
                    }
                    answered = true;
                    let shown = if self.config.raw_output {
                        fragment
                    } else {
                        self.formatter.push(&fragment)
                    };
                    print!("{shown}");
                    let _ = io::stdout().flush();
                }
                Ok(ChatEvent::Complete) => break,
                Err(e) => {
                    println!();
                    ui::print_error(&e.to_string());
                    return;
                }
            }
        }

        if first_chunk {
            spinner.stop();
        }

        if !self.config.raw_output {
            print!("{}", self.formatter.finish());
        }

        println!();
        println!();

        if answered {
            if let Err(e) = self.history.note_exchange(&self.chat_id, text) {
                crate::warn!("{} {e:#}", Style::warning("Warning:"));
            }
        }
    }
}
