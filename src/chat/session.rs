//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! and runs one request/response cycle per user input.

use std::fmt;

use crate::client::{FlowClient, FlowRunner};
use crate::config::FlowConfig;
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_ASSISTANT_TURNS, SESSION_FAILED_SUBMISSIONS, SESSION_SHAPE_ERRORS, SESSION_USER_TURNS,
};
use crate::types::{FlowResponse, INVALID_RESPONSE_FORMAT, Role, Turn, Tweaks};

/// Broad category of a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never got an HTTP response (connection, timeout, client).
    Transport,
    /// The service answered with a non-success status.
    Status,
    /// The body was not valid JSON.
    Parse,
    /// The body was JSON but the reply text was not where expected.
    Shape,
    /// Anything else.
    Other,
}

/// A failed submission, carrying a message fit to show inline in the chat.
#[derive(Debug, Clone)]
pub struct DisplayError {
    kind: ErrorKind,
    message: String,
    source: Error,
}

impl DisplayError {
    /// The category of the failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying error.
    pub fn error(&self) -> &Error {
        &self.source
    }
}

impl From<Error> for DisplayError {
    fn from(err: Error) -> Self {
        let (kind, message) = match &err {
            Error::Timeout { .. } | Error::Connection { .. } | Error::HttpClient { .. } => (
                ErrorKind::Transport,
                format!("Failed to reach the flow service: {err}"),
            ),
            Error::Api {
                status_code,
                message,
            } => (
                ErrorKind::Status,
                format!("Flow service returned HTTP {status_code}: {message}"),
            ),
            Error::Serialization { .. } => (
                ErrorKind::Parse,
                format!("Failed to parse the flow response: {err}"),
            ),
            Error::UnexpectedShape { .. } => {
                (ErrorKind::Shape, INVALID_RESPONSE_FORMAT.to_string())
            }
            _ => (ErrorKind::Other, err.to_string()),
        };
        Self {
            kind,
            message,
            source: err,
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The flow endpoint the session talks to.
    pub endpoint: String,
    /// The number of turns in the conversation.
    pub turn_count: usize,
    /// The number of user turns.
    pub user_turns: usize,
    /// The number of assistant turns.
    pub assistant_turns: usize,
    /// Total number of requests sent.
    pub total_requests: u64,
    /// Number of requests that ended in an error.
    pub failed_requests: u64,
    /// Number of components in the fixed tweak set.
    pub tweak_count: usize,
}

/// A chat session that owns the conversation for one run of the program.
///
/// Turns are only ever appended.  A failed submission appends nothing, so the
/// conversation is exactly what it was before the call.
pub struct ChatSession<R: FlowRunner = FlowClient> {
    runner: R,
    tweaks: Tweaks,
    turns: Vec<Turn>,
    request_count: u64,
    failure_count: u64,
}

impl ChatSession<FlowClient> {
    /// Creates a session backed by a real client for `config`.
    pub fn from_config(config: &FlowConfig) -> Result<Self> {
        let client = FlowClient::new(config)?;
        Ok(Self::new(client, config.tweaks.clone()))
    }
}

impl<R: FlowRunner> ChatSession<R> {
    /// Creates an empty session that sends `tweaks` with every request.
    pub fn new(runner: R, tweaks: Tweaks) -> Self {
        Self {
            runner,
            tweaks,
            turns: Vec::new(),
            request_count: 0,
            failure_count: 0,
        }
    }

    /// Appends a user turn.
    pub fn append_user_turn(&mut self, text: &str) {
        SESSION_USER_TURNS.click();
        self.turns.push(Turn::user(text));
    }

    /// Sends `text` to the flow and appends the reply.
    ///
    /// On success the assistant turn is appended and returned.  On any failure
    /// nothing is appended and the error is returned for display.
    pub async fn submit_and_append_reply(
        &mut self,
        text: &str,
    ) -> std::result::Result<Turn, DisplayError> {
        self.request_count = self.request_count.saturating_add(1);
        let outcome = self
            .runner
            .run(text, Some(&self.tweaks))
            .await
            .and_then(|body| {
                let response = FlowResponse::new(body);
                response.reply_text().map(str::to_string)
            });

        match outcome {
            Ok(reply) => {
                let turn = Turn::assistant(reply);
                SESSION_ASSISTANT_TURNS.click();
                self.turns.push(turn.clone());
                Ok(turn)
            }
            Err(err) => {
                self.failure_count = self.failure_count.saturating_add(1);
                SESSION_FAILED_SUBMISSIONS.click();
                if err.is_unexpected_shape() {
                    SESSION_SHAPE_ERRORS.click();
                }
                Err(DisplayError::from(err))
            }
        }
    }

    /// Runs a full cycle: appends the user turn, then submits it.
    ///
    /// The user turn stays in the conversation even when the submission fails.
    pub async fn send(&mut self, text: &str) -> std::result::Result<Turn, DisplayError> {
        self.append_user_turn(text);
        self.submit_and_append_reply(text).await
    }

    /// The conversation so far, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns in the conversation.
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// The fixed tweak set sent with every request.
    pub fn tweaks(&self) -> &Tweaks {
        &self.tweaks
    }

    /// The runner backing this session.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let user_turns = self
            .turns
            .iter()
            .filter(|turn| turn.role() == Role::User)
            .count();
        SessionStats {
            endpoint: self.runner.endpoint().to_string(),
            turn_count: self.turns.len(),
            user_turns,
            assistant_turns: self.turns.len() - user_turns,
            total_requests: self.request_count,
            failed_requests: self.failure_count,
            tweak_count: self.tweaks.len(),
        }
    }
}
