//! A terminal front-end for the Clippy assistant.

#[macro_use]
extern crate tracing;

mod config;

use std::io::Write as _;
use std::pin::pin;
use std::process::ExitCode;
use std::time::Duration;

use clippy_chat_core::{
    Assistant, AssistantBuilder, ConversationEvent, FixedSettings, Message,
    Role, TurnOutcome,
};
use clippy_chat_openai_model::OpenAIProvider;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::config::Config;

const BAR_CHAR: &str = "▎";

const HELP: &str =
    "Commands: /reset starts over, /history shows the log, /quit exits.";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    debug!("loaded config: {config:?}");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let model_provider = OpenAIProvider::new(config.openai);
    let assistant = AssistantBuilder::with_model_provider(model_provider)
        .with_settings(FixedSettings {
            max_tokens: config.max_tokens,
        })
        .with_timeout(config.timeout)
        .on_event(move |event| {
            event_tx.send(event.clone()).ok();
        })
        .build();

    println!("{}", HELP.dimmed());
    for msg in assistant.messages() {
        print_message(&msg);
    }

    // One reader for the whole session, so buffered input isn't lost
    // between lines.
    let mut stdin = io::BufReader::new(io::stdin());
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        match line.trim() {
            "/quit" => break,
            "/reset" => {
                assistant.reset();
                drain_events(&mut event_rx);
            }
            "/history" => {
                for msg in assistant.messages() {
                    print_message(&msg);
                }
            }
            text => {
                run_turn(&assistant, text).await;
                drain_events(&mut event_rx);
            }
        }
    }

    ExitCode::SUCCESS
}

async fn run_turn(assistant: &Assistant, text: &str) {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message("📎 Thinking...");

    let mut turn = pin!(assistant.send_turn(text));
    let result = loop {
        select! {
            result = &mut turn => break result,
            _ = sleep(Duration::from_millis(100)) => progress_bar.inc(1),
        }
    };
    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();

    match result {
        Ok(TurnOutcome::Replied(_)) => {}
        Ok(TurnOutcome::Failed(err)) => {
            debug!(kind = ?err.kind(), "turn failed");
        }
        Err(err) => eprintln!("{err}"),
    }
}

/// Prints the replies that arrived since the last call.
///
/// User messages and empty placeholders are skipped; the user has already
/// seen what they typed.
fn drain_events(event_rx: &mut mpsc::UnboundedReceiver<ConversationEvent>) {
    while let Ok(event) = event_rx.try_recv() {
        match event {
            // A placeholder that lost its latest flag holds an error.
            ConversationEvent::Updated(msg) if msg.role() == Role::Assistant => {
                print_message_styled(&msg, !msg.is_latest());
            }
            ConversationEvent::Appended(msg)
                if msg.role() == Role::Assistant && !msg.text().is_empty() =>
            {
                print_message(&msg);
            }
            ConversationEvent::Reset => {
                println!("{}", "(conversation reset)".dimmed());
            }
            _ => {}
        }
    }
}

#[inline]
fn print_message(msg: &Message) {
    print_message_styled(msg, false);
}

fn print_message_styled(msg: &Message, failed: bool) {
    match msg.role() {
        Role::User => {
            println!("{}🧑 {}", BAR_CHAR.bright_green(), msg.text());
        }
        Role::Assistant if failed => {
            println!("{}📎 {}", BAR_CHAR.bright_red(), msg.text().red());
        }
        Role::Assistant => {
            println!(
                "{}📎 {}",
                BAR_CHAR.bright_cyan(),
                msg.text().bright_white()
            );
        }
    }
}

async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut line = String::new();

    match reader.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_keeps_buffered_input() {
        let input = b"hello\n/history\n/quit\n";
        let mut reader = io::BufReader::new(&input[..]);

        assert_eq!(read_line(&mut reader).await.as_deref(), Some("hello\n"));
        assert_eq!(read_line(&mut reader).await.as_deref(), Some("/history\n"));
        assert_eq!(read_line(&mut reader).await.as_deref(), Some("/quit\n"));
        assert_eq!(read_line(&mut reader).await, None);
    }
}
