//! Logging trait for flow client operations.
//!
//! This module provides the [`FlowLogger`] trait that allows users to capture
//! and log every request passing through the [`FlowClient`](crate::FlowClient).

use serde_json::Value;

use crate::error::Error;
use crate::types::FlowRequest;

/// A trait for logging flow client operations.
///
/// Implement this trait to record API interactions.  Exactly one of
/// [`log_response`](FlowLogger::log_response) or
/// [`log_error`](FlowLogger::log_error) follows each
/// [`log_request`](FlowLogger::log_request).
///
/// # Example
///
/// ```rust,ignore
/// use flowchat::{Error, FlowLogger, FlowRequest};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl FlowLogger for FileLogger {
///     fn log_request(&self, url: &str, request: &FlowRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "POST {url}: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, response: &serde_json::Value) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response: {response}").unwrap();
///     }
///
///     fn log_error(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Error: {error}").unwrap();
///     }
/// }
/// ```
pub trait FlowLogger: Send + Sync {
    /// Log an outgoing request just before it is sent.
    ///
    /// The token is never passed to the logger.
    fn log_request(&self, url: &str, request: &FlowRequest);

    /// Log a successfully parsed response body.
    fn log_response(&self, response: &Value);

    /// Log the error that ended a request.
    fn log_error(&self, error: &Error);
}
