use serde::{Deserialize, Serialize};

use crate::types::{IoType, Tweaks};

fn tweaks_absent(tweaks: &Option<Tweaks>) -> bool {
    tweaks.as_ref().is_none_or(Tweaks::is_empty)
}

/// Body of a "run flow" request.
///
/// `tweaks` is left out of the serialized body entirely when it is `None` or
/// empty; the service treats a missing key differently from `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRequest {
    /// The user message fed into the flow.
    pub input_value: String,

    /// How the flow should shape its output.
    pub output_type: IoType,

    /// How the flow should interpret the input.
    pub input_type: IoType,

    /// Per-component overrides.
    #[serde(default, skip_serializing_if = "tweaks_absent")]
    pub tweaks: Option<Tweaks>,
}

impl FlowRequest {
    /// Create a chat-in, chat-out request with no tweaks.
    pub fn new(input_value: impl Into<String>) -> Self {
        Self {
            input_value: input_value.into(),
            output_type: IoType::Chat,
            input_type: IoType::Chat,
            tweaks: None,
        }
    }

    /// Set the output type.
    pub fn with_output_type(mut self, output_type: IoType) -> Self {
        self.output_type = output_type;
        self
    }

    /// Set the input type.
    pub fn with_input_type(mut self, input_type: IoType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Set the tweaks.  Empty tweaks are kept but never serialized.
    pub fn with_tweaks(mut self, tweaks: Option<Tweaks>) -> Self {
        self.tweaks = tweaks;
        self
    }
}
