//! Slash command parsing for the chat application.
//!
//! Only the exact command words below control the REPL.  Any other input,
//! including text that merely starts with `/`, is sent to the flow.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Re-render the full conversation.
    History,

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent to the flow.
///
/// # Examples
///
/// ```
/// # use flowchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/history").is_some());
/// assert!(parse_command("What is our Q3 burn rate?").is_none());
/// assert!(parse_command("/etc/hosts is missing?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let command = input.trim().strip_prefix('/')?.to_lowercase();

    match command.as_str() {
        "history" => Some(ChatCommand::History),
        "stats" | "status" => Some(ChatCommand::Stats),
        "help" | "?" => Some(ChatCommand::Help),
        "quit" | "exit" | "q" => Some(ChatCommand::Quit),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /history               Show the whole conversation
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /QUIT  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_history_and_stats() {
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn commands_with_trailing_text_go_to_the_flow() {
        assert!(parse_command("/history all").is_none());
        assert!(parse_command("/help me plan the budget").is_none());
    }

    #[test]
    fn unknown_slash_input_goes_to_the_flow() {
        assert!(parse_command("/model gpt").is_none());
        assert!(parse_command("/etc/hosts is missing?").is_none());
        assert!(parse_command("/").is_none());
    }

    #[test]
    fn non_commands() {
        assert!(parse_command("Hello").is_none());
        assert!(parse_command("what does a/b mean").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/history"));
        assert!(help.contains("/quit"));
    }
}
