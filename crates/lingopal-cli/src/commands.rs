/// Result of processing a line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Show conversation statistics.
    ShowStats,
    /// Export the history to a text file, optionally at the given path.
    Export(Option<String>),
    /// Clear the history (after confirmation).
    Clear,
    /// Quit the application.
    Quit,
    /// Blank input.
    Empty,
    /// Not a command - treat as a chat message.
    NotACommand,
}

/// Commands work as a single bare word (`stats`, `统计`) or slash-prefixed
/// (`/stats`). Only the slash form takes an argument, so a sentence that
/// starts with a command word is still sent as a message.
pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::Empty;
    }

    let (cmd, arg) = match input.strip_prefix('/') {
        Some(rest) => {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let cmd = parts.next().unwrap_or("");
            let arg = parts.next().map(str::trim).unwrap_or("");
            (cmd, arg)
        }
        None if !input.contains(char::is_whitespace) => (input, ""),
        None => return CommandResult::NotACommand,
    };

    match cmd.to_lowercase().as_str() {
        "help" | "h" | "帮助" => show_help(),
        "quit" | "exit" | "q" | "退出" => CommandResult::Quit,
        "stats" | "s" | "统计" => CommandResult::ShowStats,
        "clear" | "c" | "清空" => CommandResult::Clear,
        "export" | "e" | "导出" => {
            if arg.is_empty() {
                CommandResult::Export(None)
            } else {
                CommandResult::Export(Some(arg.to_string()))
            }
        }
        "version" if input.starts_with('/') => {
            CommandResult::Message(format!("Lingopal v{}", env!("CARGO_PKG_VERSION")))
        }
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: /{cmd}. Type help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

/// Answer to the clear-history confirmation prompt.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "是")
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Lingopal Commands ────────────────────────────────────────────╮

  help, h, 帮助             Show this help message
  stats, s, 统计            Show conversation statistics
  export, e, 导出           Export the conversation to a text file
  /export <file>            Export to a specific file
  clear, c, 清空            Clear the conversation history
  quit, exit, q, 退出       Save and quit
  /version                  Show version information

  Anything else is sent to the assistant. Replies come in English
  followed by a translation.

  Suggested topics: learning English, personal growth, culture,
  hobbies, travel, science and technology, healthy living.

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
