//! Offline backends that replay a recorded engine response.

use nl2ltl::{EngineError, IntentClassifier, TextGenerator};

/// A saved classifier parse payload (Rasa `/model/parse` shape).
pub struct RecordedPayload(pub serde_json::Value);

impl IntentClassifier for RecordedPayload {
    fn parse(&self, _utterance: &str) -> Result<serde_json::Value, EngineError> {
        Ok(self.0.clone())
    }
}

/// A saved text completion.
pub struct RecordedCompletion(pub String);

impl TextGenerator for RecordedCompletion {
    fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        tracing::debug!(prompt_len = prompt.len(), "replaying recorded completion");
        Ok(self.0.clone())
    }
}
