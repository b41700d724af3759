use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-component overrides passed through to a flow at invocation time.
///
/// Keys are component identifiers inside the hosted flow (for example
/// `ChatInput-c1hCe`); values are the override objects for that component.
/// Insertion order is preserved so the serialized body matches the
/// configuration verbatim. Keys are never checked against the flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tweaks(Map<String, Value>);

impl Tweaks {
    /// Creates an empty tweak set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds an override for `component`, replacing any existing one.
    pub fn with_component(mut self, component: impl Into<String>, overrides: Value) -> Self {
        self.insert(component, overrides);
        self
    }

    /// Inserts an override for `component`.
    pub fn insert(&mut self, component: impl Into<String>, overrides: Value) {
        self.0.insert(component.into(), overrides);
    }

    /// Returns the override for `component`, if any.
    pub fn get(&self, component: &str) -> Option<&Value> {
        self.0.get(component)
    }

    /// Returns true when no component has an override.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of components with overrides.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates component identifiers in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for Tweaks {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Tweaks {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
