use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a flow should interpret its input or shape its output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoType {
    /// Conversational chat messages.
    #[default]
    Chat,

    /// Plain text.
    Text,

    /// Whatever the flow produces.
    Any,

    /// Debug output, including intermediate component results.
    Debug,
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoType::Chat => write!(f, "chat"),
            IoType::Text => write!(f, "text"),
            IoType::Any => write!(f, "any"),
            IoType::Debug => write!(f, "debug"),
        }
    }
}

/// Error returned when parsing an invalid input/output type string.
#[derive(Debug)]
pub struct IoTypeParseError {
    /// The invalid string value that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for IoTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown input/output type: {}", self.invalid_value)
    }
}

impl std::error::Error for IoTypeParseError {}

impl FromStr for IoType {
    type Err = IoTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(IoType::Chat),
            "text" => Ok(IoType::Text),
            "any" => Ok(IoType::Any),
            "debug" => Ok(IoType::Debug),
            _ => Err(IoTypeParseError {
                invalid_value: s.to_string(),
            }),
        }
    }
}
