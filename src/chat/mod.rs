//! Chat application module for conversing with a hosted flow.
//!
//! This module provides a REPL chat interface built on top of the flowchat
//! client library. It supports:
//!
//! - One request per user message, with a "Thinking..." indicator
//! - Inline error reporting that leaves the session usable
//! - Slash commands for viewing history and stats
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration resolution
//! - [`session`]: the conversation and the request/response cycle
//! - [`commands`]: slash command parsing
//! - [`render`]: terminal output

mod commands;
mod config;
mod render;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_CONFIG_FILE, DEFAULT_TITLE};
pub use render::{PlainTextRenderer, Renderer, THINKING, format_turn, role_label};
pub use session::{ChatSession, DisplayError, ErrorKind, SessionStats};
