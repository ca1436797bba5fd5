//! Engines: turn an utterance into weighted templates.
//!
//! An engine pairs an external language backend with the grounding and
//! filtering core. Backends sit behind small synchronous traits
//! ([`IntentClassifier`], [`TextGenerator`]); this module only normalizes
//! what they return.
//!
//! Grounding diagnostics are logged here, at `warn` level, so the core
//! functions in [`crate::grounding`] stay free of side effects.

mod classifier;
mod generator;

pub use classifier::{ClassifierEngine, ClassifierOutput, EntityMatch, IntentClassifier, RankedIntent};
pub use generator::{GeneratorEngine, GeneratorOutput, TextGenerator};

use crate::declare::TemplateError;
use crate::filters::Filter;
use crate::grounding::{ground_with, Entities, GroundingOutcome, KindMatcher};
use crate::WeightedTemplates;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("invalid engine output: {0}")]
    Parse(String),
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Natural language → weighted templates.
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    fn translate(
        &self,
        utterance: &str,
        filter: Option<&dyn Filter>,
    ) -> Result<WeightedTemplates, EngineError>;
}

/// Translate `utterance` with `engine`, optionally filtering the candidates.
pub fn translate(
    utterance: &str,
    engine: &dyn Engine,
    filter: Option<&dyn Filter>,
) -> Result<WeightedTemplates, EngineError> {
    let result = engine.translate(utterance, filter)?;
    tracing::debug!(
        engine = engine.name(),
        filter = filter.map(|f| f.name()).unwrap_or("none"),
        candidates = result.len(),
        "translated utterance"
    );
    Ok(result)
}

/// Ground every ranked kind name against the same entities.
///
/// A template reached through several names keeps its highest confidence.
pub(crate) fn ground_ranking<'a>(
    matcher: &dyn KindMatcher,
    ranking: impl IntoIterator<Item = (&'a str, f64)>,
    entities: &Entities,
) -> Result<WeightedTemplates, EngineError> {
    let mut out = WeightedTemplates::new();
    for (name, confidence) in ranking {
        match ground_with(matcher, name, entities)? {
            GroundingOutcome::Grounded(template) => {
                let slot = out.entry(template).or_insert(confidence);
                if confidence > *slot {
                    *slot = confidence;
                }
            }
            GroundingOutcome::Skipped(diagnostic) => {
                tracing::warn!(kind_name = name, %diagnostic, "no valid matching");
            }
        }
    }
    Ok(out)
}

pub(crate) fn apply_filter(
    output: WeightedTemplates,
    entities: &Entities,
    filter: Option<&dyn Filter>,
) -> WeightedTemplates {
    match filter {
        Some(filter) => filter.enforce(&output, entities),
        None => output,
    }
}

/// Human-readable listing of a result set.
pub fn render_results(result: &WeightedTemplates) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(80));
    out.push('\n');
    for (template, confidence) in result {
        out.push_str(&format!("Declare Template: {template}\n"));
        out.push_str(&format!("English meaning:  {}\n", template.to_text()));
        out.push_str(&format!("Confidence:       {confidence}\n\n"));
    }
    out
}
