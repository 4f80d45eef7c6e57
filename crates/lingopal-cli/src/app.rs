use anyhow::Result;
use chrono::Local;
use crossterm::style::Stylize;
use lingopal_core::config::{Settings, UiSettings};
use lingopal_core::context::{default_export_path, export_transcript};
use lingopal_core::{
    ConversationHistory, HistoryStats, LlmClient, OpenAIClient, Session, TurnOutcome, TurnReply,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::{handle_command, is_affirmative, CommandResult};
use crate::theme::Theme;

const RULE_WIDTH: usize = 70;

/// Build the session for this process and load the saved history.
pub fn open_session(settings: &Settings, theme: &Theme) -> Session {
    let client = OpenAIClient::from_settings(&settings.openai);
    tracing::debug!("Using model {}", client.model());
    let llm: Arc<dyn LlmClient> = Arc::new(client);

    let mut history = ConversationHistory::from_settings(&settings.conversation);
    match history.load() {
        Ok(0) => println!("{}", "Starting a new conversation".with(theme.muted)),
        Ok(n) => println!("{}", format!("Loaded {n} turns of conversation history").with(theme.success)),
        Err(e) => {
            tracing::warn!("Could not load conversation history: {}", e);
            println!(
                "{}",
                format!("Could not load conversation history ({e}); starting fresh").with(theme.warning)
            );
        }
    }

    Session::new(settings, llm, history)
}

// ── Single prompt ───────────────────────────────────────────────────────

pub async fn run_single_prompt(settings: &Settings, theme: &Theme, prompt: &str) -> Result<()> {
    let mut session = open_session(settings, theme);
    let reply = session.turn(prompt).await;
    print_reply(&settings.ui, theme, &reply);
    Ok(())
}

// ── Interactive loop ────────────────────────────────────────────────────

pub async fn run_repl(settings: &Settings, theme: &Theme) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut session = open_session(settings, theme);

    print_welcome(theme);

    loop {
        let prompt = format!("\n{} ", "You >".with(theme.user_color).bold());
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{}", "Conversation interrupted. Goodbye!".with(theme.accent));
                final_save(&session, theme);
                break;
            }
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();

        match handle_command(line) {
            CommandResult::Empty => println!("{}", "Please type a message...".with(theme.muted)),
            CommandResult::Message(text) => println!("{text}"),
            CommandResult::ShowStats => print_stats(theme, &session.stats()),
            CommandResult::Export(path) => {
                let path = path
                    .map(PathBuf::from)
                    .unwrap_or_else(|| default_export_path(Local::now()));
                match export_transcript(session.history().turns(), &path, settings.ui.show_timestamps) {
                    Ok(()) => println!(
                        "{}",
                        format!("Conversation exported to {}", path.display()).with(theme.success)
                    ),
                    Err(e) => println!("{}", format!("Export failed: {e}").with(theme.error)),
                }
            }
            CommandResult::Clear => {
                let answer = rl
                    .readline("Clear all conversation history? (y/N): ")
                    .unwrap_or_default();
                if !is_affirmative(&answer) {
                    println!("{}", "Cancelled".with(theme.muted));
                    continue;
                }
                match session.clear_history() {
                    Ok(()) => println!("{}", "Conversation history cleared".with(theme.success)),
                    Err(e) => println!("{}", format!("Failed to clear history: {e}").with(theme.error)),
                }
            }
            CommandResult::Quit => {
                println!("\n{}", "Thank you for practicing with Lingopal! Goodbye!".with(theme.accent));
                final_save(&session, theme);
                break;
            }
            CommandResult::NotACommand => {
                let _ = rl.add_history_entry(line);
                println!("\n{}", "Thinking...".with(theme.muted));
                let reply = session.turn(line).await;
                print_reply(&settings.ui, theme, &reply);
            }
        }
    }

    Ok(())
}

fn final_save(session: &Session, theme: &Theme) {
    if !session.history().auto_save() {
        return;
    }
    match session.save_history() {
        Ok(()) => println!("{}", "Conversation history saved".with(theme.muted)),
        Err(e) => tracing::warn!("Final save of conversation history failed: {}", e),
    }
}

fn print_welcome(theme: &Theme) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{}", rule.as_str().with(theme.accent));
    println!("{}", "Welcome to Lingopal, your English conversation partner!".bold());
    println!("Replies are in English, followed by a translation.");
    println!("{}", rule.as_str().with(theme.accent));
    println!(
        "{}",
        "Inappropriate or illegal topics are redirected.".with(theme.warning)
    );
    println!("Commands: help, stats, export, clear, quit");
    println!("{}", rule.as_str().with(theme.accent));
}

fn translation_label(language: &str) -> String {
    if language.to_ascii_lowercase().starts_with("zh") {
        "中文".to_string()
    } else {
        language.to_string()
    }
}

fn print_reply(ui: &UiSettings, theme: &Theme, reply: &TurnReply) {
    let color = match reply.outcome {
        TurnOutcome::Answered => theme.assistant_color,
        TurnOutcome::Redirected => theme.warning,
        TurnOutcome::Fallback => theme.error,
    };

    if ui.show_english {
        println!("\n{}", "AI (English):".with(color).bold());
        println!("   {}", reply.primary);
    }
    if ui.show_chinese {
        let label = format!("AI ({}):", translation_label(&ui.language));
        println!("\n{}", label.with(theme.translation_color).bold());
        println!("   {}", reply.secondary);
    }
}

fn print_stats(theme: &Theme, stats: &HistoryStats) {
    println!("\n{}", "Conversation statistics".with(theme.accent).bold());
    println!("   Total turns:     {}", stats.total);
    println!("   Your messages:   {}", stats.user);
    println!("   AI replies:      {}", stats.assistant);
    if let (Some(first), Some(last)) = (stats.first, stats.last) {
        println!("   Started:         {}", first.format("%Y-%m-%d %H:%M:%S"));
        println!("   Last message:    {}", last.format("%Y-%m-%d %H:%M:%S"));
    }
}
