//! Scenario tests: grounding, filtering and engines end to end.

use approx::assert_relative_eq;
use nl2ltl::{
    ground, ground_with, translate, BasicFilter, ClassifierEngine, EngineError, Entities,
    ExactMatcher, Filter, FilterKind, GeneratorEngine, GreedyFilter, GroundingDiagnostic,
    GroundingOutcome, IntentClassifier, SimilarityMatcher, Template, TemplateKind, TextGenerator,
    TranslateConfig, WeightedTemplates,
};
use nl2ltl_logic::Atom;
use serde_json::json;

fn atom(name: &str) -> Atom {
    Atom::new(name).unwrap()
}

// ============================================================================
// Grounding
// ============================================================================

#[test]
fn response_with_one_entity_is_skipped_not_an_error() {
    let entities: Entities = [("Slack", 0.9)].into_iter().collect();
    let outcome = ground("Response", &entities).unwrap();
    assert!(outcome.templates().is_empty());
    assert_eq!(
        outcome.diagnostic(),
        Some(&GroundingDiagnostic::InsufficientEntities {
            kind: TemplateKind::Response,
            required: 2,
            available: 1,
        })
    );
}

#[test]
fn grounding_binds_entities_in_order_and_decapitalizes() {
    let entities: Entities = [("Gmail", 0.9), ("Slack", 0.8), ("Drive", 0.7)]
        .into_iter()
        .collect();
    let outcome = ground("Precedence", &entities).unwrap();
    assert_eq!(
        outcome,
        GroundingOutcome::Grounded(Template::precedence(atom("gmail"), atom("slack")))
    );

    let outcome = ground("NotCoExistence", &entities).unwrap();
    assert_eq!(
        outcome.template(),
        Some(&Template::not_co_existence(atom("gmail"), atom("slack")))
    );
}

#[test]
fn misspelled_kind_resolves_by_similarity() {
    let entities: Entities = [("Gmail", 1.0)].into_iter().collect();
    for name in ["existance", "Existence ", "EXISTENCE", "absense"] {
        let outcome = ground(name, &entities).unwrap();
        assert!(outcome.template().is_some(), "{name} did not resolve");
    }

    let outcome = ground_with(&ExactMatcher, "existance", &entities).unwrap();
    assert!(matches!(
        outcome,
        GroundingOutcome::Skipped(GroundingDiagnostic::UnresolvedKind { .. })
    ));
}

#[test]
fn similarity_scores_are_normalized() {
    assert_relative_eq!(
        SimilarityMatcher::score("responded existence", TemplateKind::RespondedExistence),
        1.0
    );
    assert_relative_eq!(
        SimilarityMatcher::score("Responce", TemplateKind::Response),
        0.875
    );
    assert!(SimilarityMatcher::score("greeting", TemplateKind::Response) < 0.6);
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn greedy_prefers_existence_over_conflicting_absence() {
    let input = WeightedTemplates::from([
        (Template::existence(atom("gmail")), 0.9),
        (Template::absence(atom("gmail")), 0.4),
    ]);
    let out = GreedyFilter.enforce(&input, &Entities::new());
    assert_eq!(out, WeightedTemplates::from([(Template::existence(atom("gmail")), 0.9)]));
}

#[test]
fn greedy_drops_what_the_pivot_subsumes() {
    let input = WeightedTemplates::from([
        (Template::response(atom("gmail"), atom("slack")), 0.8),
        (Template::existence(atom("gmail")), 0.5),
        (Template::chain_response(atom("gmail"), atom("slack")), 0.3),
    ]);
    let out = GreedyFilter.enforce(&input, &Entities::new());
    assert_eq!(
        out,
        WeightedTemplates::from([(Template::response(atom("gmail"), atom("slack")), 0.8)])
    );
    assert_eq!(BasicFilter.enforce(&input, &Entities::new()), input);
}

#[test]
fn filter_kind_parses_and_builds() {
    assert_eq!("Greedy".parse::<FilterKind>().unwrap(), FilterKind::Greedy);
    assert_eq!(FilterKind::Basic.filter().name(), "basic");
    assert!("optimal".parse::<FilterKind>().is_err());
}

// ============================================================================
// Engines
// ============================================================================

struct FixedIntent(serde_json::Value);

impl IntentClassifier for FixedIntent {
    fn parse(&self, _utterance: &str) -> Result<serde_json::Value, EngineError> {
        Ok(self.0.clone())
    }
}

struct Offline;

impl TextGenerator for Offline {
    fn complete(&self, _prompt: &str) -> Result<String, EngineError> {
        Err(EngineError::Backend("no network".to_string()))
    }
}

#[test]
fn classifier_engine_with_config() {
    let payload = json!({
        "text": "never send a slack and a gmail together",
        "intent": {"name": "NotCoExistence", "confidence": 0.7},
        "entities": [
            {"entity": "connector", "value": "Slack", "confidence_entity": 0.9},
            {"entity": "connector", "value": "Gmail", "confidence_entity": 0.8}
        ],
        "intent_ranking": [
            {"name": "NotCoExistence", "confidence": 0.7},
            {"name": "Existence", "confidence": 0.2},
            {"name": "RespondedExistence", "confidence": 0.1}
        ]
    });

    let config = TranslateConfig::from_json(r#"{"filter": "greedy"}"#).unwrap();
    let engine = ClassifierEngine::new(FixedIntent(payload)).with_matcher(config.matcher());
    let filter = config.filter.filter();

    let out = translate("never send a slack and a gmail together", &engine, Some(filter.as_ref()))
        .unwrap();
    assert_eq!(
        out,
        WeightedTemplates::from([
            (Template::not_co_existence(atom("slack"), atom("gmail")), 0.7),
            (Template::responded_existence(atom("slack"), atom("gmail")), 0.1),
        ])
    );
}

#[test]
fn backend_failures_propagate() {
    let engine = GeneratorEngine::new(Offline, "");
    let err = translate("anything", &engine, None).unwrap_err();
    assert!(matches!(err, EngineError::Backend(_)));
    assert_eq!(err.to_string(), "backend error: no network");
}
