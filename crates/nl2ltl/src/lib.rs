//! nl2ltl: natural-language intents to DECLARE templates
//!
//! The pipeline has three stages:
//! - an [`Engine`] asks a language backend for a template name and entities
//! - [`grounding`] binds that guess to a concrete [`Template`]
//! - a [`Filter`] prunes the weighted candidates with the
//!   [`relations`] tables
//!
//! Every template lowers to LTLf ([`Template::to_future_logic`]), PPLTL
//! ([`Template::to_past_logic`]) and English ([`Template::to_text`]).

use std::collections::BTreeMap;

pub mod config;
pub mod declare;
pub mod engines;
pub mod filters;
pub mod grounding;
pub mod relations;

pub use config::{ConfigError, MatcherKind, TranslateConfig};
pub use declare::{Template, TemplateError, TemplateKind, UnknownKind};
pub use engines::{
    render_results, translate, ClassifierEngine, ClassifierOutput, Engine, EngineError,
    GeneratorEngine, GeneratorOutput, IntentClassifier, TextGenerator,
};
pub use filters::{BasicFilter, Filter, FilterKind, GreedyFilter, UnknownFilter};
pub use grounding::{
    ground, ground_kind, ground_with, Entities, ExactMatcher, GroundingDiagnostic,
    GroundingOutcome, KindMatcher, SimilarityMatcher,
};
pub use relations::{conflicts, conflicts_with, is_subsumed_by, subsumes};

pub use nl2ltl_logic::{Atom, Formula, Logic};

/// Template instance → confidence. Ordered, so iteration is deterministic.
pub type WeightedTemplates = BTreeMap<Template, f64>;
