//! Chat mode UI components.

use crate::history::ChatRecord;
use crate::ui::Style;

use super::session::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Dispatch Assistant Chat",
        Style::header("da"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(config: &SessionConfig, chat_id: &str) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}     {}",
        Style::label("endpoint"),
        Style::secondary(&config.endpoint)
    );
    println!(
        "  {}      {}",
        Style::label("chat id"),
        Style::value(chat_id)
    );
    println!(
        "  {}   {}",
        Style::label("formatting"),
        Style::value(if config.raw_output { "off" } else { "on" })
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    println!(
        "  {}   {}",
        Style::command("/config"),
        Style::secondary("Show current configuration")
    );
    println!(
        "  {}     {}",
        Style::command("/help"),
        Style::secondary("Show this help")
    );
    println!(
        "  {}  {}",
        Style::command("/history"),
        Style::secondary("List cached chat sessions")
    );
    println!(
        "  {}      {}",
        Style::command("/new"),
        Style::secondary("Start a new chat session")
    );
    println!(
        "  {}      {}",
        Style::command("/raw"),
        Style::secondary("Toggle report formatting on/off")
    );
    println!(
        "  {}     {}",
        Style::command("/quit"),
        Style::secondary("Exit chat mode")
    );
    println!();
}

pub fn print_history(records: &[ChatRecord]) {
    if records.is_empty() {
        println!("{}", Style::secondary("No cached chat sessions."));
        println!();
        return;
    }

    println!("{}", Style::header("Chat history"));
    for record in records {
        println!(
            "  {}  {}",
            Style::value(&record.title),
            Style::secondary(format!(
                "({}, {}, {} messages)",
                record.id, record.time, record.message_count
            ))
        );
    }
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
