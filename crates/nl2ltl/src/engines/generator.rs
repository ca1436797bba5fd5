//! Few-shot text-generation engines (GPT-style completion).
//!
//! The prompt is a list of worked examples; the utterance is appended as a
//! final `NL:` line and the completion is expected to carry one line each:
//!
//! ```text
//! PATTERN: Response
//! SYMBOLS: Gmail, Slack
//! ```

use super::{apply_filter, ground_ranking, Engine, EngineError};
use crate::filters::Filter;
use crate::grounding::{Entities, KindMatcher, SimilarityMatcher};
use crate::WeightedTemplates;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Backend that completes a prompt.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, EngineError>;
}

/// The pattern and symbol lines extracted from a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOutput {
    pub pattern: String,
    pub symbols: Vec<String>,
}

impl GeneratorOutput {
    pub fn parse(completion: &str) -> Result<Self, EngineError> {
        let pattern_re = Regex::new(r"(?m)^\s*PATTERN:\s*(.+?)\s*$")?;
        let symbols_re = Regex::new(r"(?m)^\s*SYMBOLS:\s*(.*?)\s*$")?;

        let pattern = pattern_re
            .captures(completion)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| EngineError::Parse("missing PATTERN line".to_string()))?;

        let symbols = symbols_re
            .captures(completion)
            .and_then(|c| c.get(1))
            .ok_or_else(|| EngineError::Parse("missing SYMBOLS line".to_string()))?
            .as_str()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { pattern, symbols })
    }

    /// Symbols as entities; generators carry no per-symbol confidence.
    pub fn entities(&self) -> Entities {
        self.symbols.iter().map(|s| (s.as_str(), 1.0)).collect()
    }

    pub fn to_weighted(&self, matcher: &dyn KindMatcher) -> Result<WeightedTemplates, EngineError> {
        ground_ranking(matcher, [(self.pattern.as_str(), 1.0)], &self.entities())
    }
}

pub struct GeneratorEngine<G> {
    generator: G,
    prompt: String,
    matcher: Box<dyn KindMatcher>,
}

impl<G: TextGenerator> GeneratorEngine<G> {
    pub fn new(generator: G, prompt: impl Into<String>) -> Self {
        Self {
            generator,
            prompt: prompt.into(),
            matcher: Box::new(SimilarityMatcher::default()),
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn KindMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn prompt_for(&self, utterance: &str) -> String {
        format!("{}NL: {}\n", self.prompt, utterance.trim())
    }
}

impl<G: TextGenerator> Engine for GeneratorEngine<G> {
    fn name(&self) -> &'static str {
        "generator"
    }

    fn translate(
        &self,
        utterance: &str,
        filter: Option<&dyn Filter>,
    ) -> Result<WeightedTemplates, EngineError> {
        let completion = self.generator.complete(&self.prompt_for(utterance))?;
        let output = GeneratorOutput::parse(&completion)?;
        let result = output.to_weighted(self.matcher.as_ref())?;
        Ok(apply_filter(result, &output.entities(), filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::Template;
    use crate::filters::GreedyFilter;
    use crate::grounding::ExactMatcher;
    use nl2ltl_logic::Atom;
    use std::sync::Mutex;

    fn atom(name: &str) -> Atom {
        Atom::new(name).unwrap()
    }

    struct Canned {
        completion: String,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(completion: &str) -> Self {
            Self {
                completion: completion.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Canned {
        fn complete(&self, prompt: &str) -> Result<String, EngineError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.completion.clone())
        }
    }

    #[test]
    fn parses_pattern_and_symbols() {
        let out = GeneratorOutput::parse(" PATTERN: Precedence\nSYMBOLS: Gmail ,  Slack,\n").unwrap();
        assert_eq!(out.pattern, "Precedence");
        assert_eq!(out.symbols, vec!["Gmail", "Slack"]);
    }

    #[test]
    fn missing_lines_are_parse_errors() {
        assert!(matches!(
            GeneratorOutput::parse("SYMBOLS: a"),
            Err(EngineError::Parse(_))
        ));
        assert!(matches!(
            GeneratorOutput::parse("PATTERN: Existence"),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn engine_appends_utterance_to_prompt() {
        let engine = GeneratorEngine::new(
            Canned::new("PATTERN: Response\nSYMBOLS: Gmail, Slack"),
            "NL: Eventually send a Slack.\nPATTERN: Existence\nSYMBOLS: Slack\n\n",
        );
        let out = engine
            .translate(" whenever I get a Gmail, send a Slack. ", Some(&GreedyFilter))
            .unwrap();
        assert_eq!(
            out,
            WeightedTemplates::from([(Template::response(atom("gmail"), atom("slack")), 1.0)])
        );

        let seen = engine.generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].ends_with("\n\nNL: whenever I get a Gmail, send a Slack.\n"));
    }

    #[test]
    fn unknown_pattern_yields_empty_result() {
        let engine = GeneratorEngine::new(Canned::new("PATTERN: Responce\nSYMBOLS: Gmail, Slack"), "")
            .with_matcher(Box::new(ExactMatcher));
        assert!(engine.translate("anything", None).unwrap().is_empty());
    }
}
