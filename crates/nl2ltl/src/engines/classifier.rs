//! Intent-classifier engines (Rasa-style NLU).
//!
//! The backend returns a parse payload with a top intent, an intent ranking
//! and a list of extracted entities:
//!
//! ```json
//! {
//!   "text": "whenever I get a Slack, send a Gmail.",
//!   "intent": {"name": "Response", "confidence": 0.92},
//!   "entities": [{"entity": "connector", "value": "Slack", "confidence_entity": 0.99}],
//!   "intent_ranking": [{"name": "Response", "confidence": 0.92}]
//! }
//! ```
//!
//! Every ranked intent is grounded against the same entity list.

use super::{apply_filter, ground_ranking, Engine, EngineError};
use crate::filters::Filter;
use crate::grounding::{Entities, KindMatcher, SimilarityMatcher};
use crate::WeightedTemplates;
use serde::{Deserialize, Serialize};

/// Backend that classifies an utterance into a parse payload.
pub trait IntentClassifier: Send + Sync {
    fn parse(&self, utterance: &str) -> Result<serde_json::Value, EngineError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIntent {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub value: String,
    #[serde(
        rename = "confidence_entity",
        alias = "confidence",
        default = "full_confidence"
    )]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

/// Normalized classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    #[serde(default)]
    pub text: String,
    pub intent: RankedIntent,
    #[serde(default)]
    pub entities: Vec<EntityMatch>,
    #[serde(default)]
    pub intent_ranking: Vec<RankedIntent>,
}

impl ClassifierOutput {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, EngineError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn entities(&self) -> Entities {
        self.entities
            .iter()
            .map(|e| (e.value.clone(), e.confidence))
            .collect()
    }

    /// The intent ranking, or just the top intent when no ranking was sent.
    pub fn ranking(&self) -> Vec<(&str, f64)> {
        if self.intent_ranking.is_empty() {
            return vec![(self.intent.name.as_str(), self.intent.confidence)];
        }
        self.intent_ranking
            .iter()
            .map(|i| (i.name.as_str(), i.confidence))
            .collect()
    }

    /// Ground every ranked intent; scores are the intent confidences.
    pub fn to_weighted(&self, matcher: &dyn KindMatcher) -> Result<WeightedTemplates, EngineError> {
        ground_ranking(matcher, self.ranking(), &self.entities())
    }
}

pub struct ClassifierEngine<C> {
    classifier: C,
    matcher: Box<dyn KindMatcher>,
}

impl<C: IntentClassifier> ClassifierEngine<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            matcher: Box::new(SimilarityMatcher::default()),
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn KindMatcher>) -> Self {
        self.matcher = matcher;
        self
    }
}

impl<C: IntentClassifier> Engine for ClassifierEngine<C> {
    fn name(&self) -> &'static str {
        "classifier"
    }

    fn translate(
        &self,
        utterance: &str,
        filter: Option<&dyn Filter>,
    ) -> Result<WeightedTemplates, EngineError> {
        let payload = self.classifier.parse(utterance.trim())?;
        let output = ClassifierOutput::from_value(payload)?;
        let result = output.to_weighted(self.matcher.as_ref())?;
        Ok(apply_filter(result, &output.entities(), filter))
    }
}
