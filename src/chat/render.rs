//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the REPL can
//! draw turns with or without ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{Role, Turn};

/// ANSI escape code for bold text (used for role labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for the thinking indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for user labels).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for assistant labels).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Erase the current line and return to its start.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text shown while waiting for the flow.
pub const THINKING: &str = "Thinking...";

/// Label printed in front of a turn.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print one turn.
    fn print_turn(&mut self, turn: &Turn);

    /// Print the whole conversation, oldest first.
    fn print_history(&mut self, turns: &[Turn]) {
        for turn in turns {
            self.print_turn(turn);
        }
    }

    /// Show that a request is in flight.
    fn start_thinking(&mut self);

    /// Remove the in-flight indicator.
    fn finish_thinking(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    thinking: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            thinking: false,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a turn the way [`PlainTextRenderer`] prints it.
pub fn format_turn(turn: &Turn, use_color: bool) -> String {
    let label = role_label(turn.role());
    if use_color {
        let color = match turn.role() {
            Role::User => ANSI_CYAN,
            Role::Assistant => ANSI_GREEN,
        };
        format!("{ANSI_BOLD}{color}{label}:{ANSI_RESET} {}", turn.content())
    } else {
        format!("{label}: {}", turn.content())
    }
}

impl Renderer for PlainTextRenderer {
    fn print_turn(&mut self, turn: &Turn) {
        self.finish_thinking();
        println!("{}", format_turn(turn, self.use_color));
        self.flush();
    }

    fn start_thinking(&mut self) {
        if self.use_color {
            print!("{ANSI_DIM}{THINKING}{ANSI_RESET}");
        } else {
            print!("{THINKING}");
        }
        self.thinking = true;
        self.flush();
    }

    fn finish_thinking(&mut self) {
        if !self.thinking {
            return;
        }
        if self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        } else {
            println!();
        }
        self.thinking = false;
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.finish_thinking();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.finish_thinking();
        println!("{info}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn plain_turn_format() {
        assert_eq!(format_turn(&Turn::user("Hello"), false), "You: Hello");
        assert_eq!(
            format_turn(&Turn::assistant("Hi there"), false),
            "Assistant: Hi there"
        );
    }

    #[test]
    fn colored_turn_format() {
        let line = format_turn(&Turn::assistant("Hi"), true);
        assert!(line.starts_with(ANSI_BOLD));
        assert!(line.contains(ANSI_GREEN));
        assert!(line.ends_with("Assistant:\x1b[0m Hi"));
    }

    struct Recording(Vec<String>);

    impl Renderer for Recording {
        fn print_turn(&mut self, turn: &Turn) {
            self.0.push(format_turn(turn, false));
        }
        fn start_thinking(&mut self) {}
        fn finish_thinking(&mut self) {}
        fn print_error(&mut self, error: &str) {
            self.0.push(format!("error {error}"));
        }
        fn print_info(&mut self, info: &str) {
            self.0.push(info.to_string());
        }
    }

    #[test]
    fn history_renders_in_order() {
        let mut recording = Recording(Vec::new());
        recording.print_history(&[Turn::user("a"), Turn::assistant("b"), Turn::user("c")]);
        assert_eq!(recording.0, vec!["You: a", "Assistant: b", "You: c"]);
    }
}
