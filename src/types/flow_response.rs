use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Message shown to users when a response cannot be unwrapped.
pub const INVALID_RESPONSE_FORMAT: &str = "Invalid response format from the API";

/// A parsed "run flow" response.
///
/// The body is opaque apart from one path,
/// `outputs[0].outputs[0].outputs.message.message.text`, which carries the
/// reply text of a chat flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowResponse(Value);

/// One step of the reply path.
enum Step {
    Key(&'static str),
    Index(usize),
}

const REPLY_PATH: &[Step] = &[
    Step::Key("outputs"),
    Step::Index(0),
    Step::Key("outputs"),
    Step::Index(0),
    Step::Key("outputs"),
    Step::Key("message"),
    Step::Key("message"),
    Step::Key("text"),
];

impl FlowResponse {
    /// Wrap a raw JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw JSON body.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the response and return the raw JSON body.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Extract the reply text.
    ///
    /// Every level of the path is checked.  The first level that is missing,
    /// has the wrong type, or is an empty array yields
    /// [`Error::UnexpectedShape`] naming the path walked so far.  No other
    /// location is consulted.
    pub fn reply_text(&self) -> Result<&str> {
        let mut current = &self.0;
        let mut walked = String::new();
        for step in REPLY_PATH {
            let next = match step {
                Step::Key(key) => {
                    if !walked.is_empty() {
                        walked.push('.');
                    }
                    walked.push_str(key);
                    current.as_object().and_then(|object| object.get(*key))
                }
                Step::Index(index) => {
                    walked.push_str(&format!("[{index}]"));
                    current.as_array().and_then(|array| array.get(*index))
                }
            };
            current = next
                .ok_or_else(|| Error::unexpected_shape(INVALID_RESPONSE_FORMAT, &walked))?;
        }
        current
            .as_str()
            .ok_or_else(|| Error::unexpected_shape(INVALID_RESPONSE_FORMAT, walked))
    }
}

impl From<Value> for FlowResponse {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape_path(response: Value) -> String {
        match FlowResponse::new(response).reply_text() {
            Err(Error::UnexpectedShape { path, message }) => {
                assert_eq!(message, INVALID_RESPONSE_FORMAT);
                path
            }
            other => panic!("expected unexpected shape, got {other:?}"),
        }
    }

    #[test]
    fn extracts_reply_text() {
        let response = FlowResponse::new(json!({
            "session_id": "abc",
            "outputs": [{
                "inputs": {"input_value": "Hello"},
                "outputs": [{
                    "results": {},
                    "outputs": {"message": {"message": {"text": "Hi there"}, "type": "message"}}
                }]
            }]
        }));
        assert_eq!(response.reply_text().unwrap(), "Hi there");
    }

    #[test]
    fn missing_outputs_key() {
        assert_eq!(shape_path(json!({"detail": "nope"})), "outputs");
    }

    #[test]
    fn empty_outer_array() {
        assert_eq!(shape_path(json!({"outputs": []})), "outputs[0]");
    }

    #[test]
    fn empty_inner_array() {
        assert_eq!(
            shape_path(json!({"outputs": [{"outputs": []}]})),
            "outputs[0].outputs[0]"
        );
    }

    #[test]
    fn text_is_not_a_string() {
        let response = json!({"outputs": [{"outputs": [{"outputs": {"message": {"message": {"text": 7}}}}]}]});
        assert_eq!(
            shape_path(response),
            "outputs[0].outputs[0].outputs.message.message.text"
        );
    }

    #[test]
    fn alternate_text_field_is_not_guessed() {
        let response = json!({"outputs": [{"outputs": [{"outputs": {"message": {"message": {"content": "Hi"}}}}]}]});
        assert_eq!(
            shape_path(response),
            "outputs[0].outputs[0].outputs.message.message.text"
        );
    }

    #[test]
    fn non_object_body() {
        assert_eq!(shape_path(json!(null)), "outputs");
        assert_eq!(shape_path(json!([1, 2, 3])), "outputs");
    }
}
