//! Grounding: bind a classifier's template guess to concrete atoms.
//!
//! Two steps:
//! 1. resolve the (possibly misspelled) kind name with a [`KindMatcher`]
//! 2. bind operands positionally from the entity mapping
//!
//! Neither "no kind matched" nor "not enough entities" is an error. Both are
//! reported as a [`GroundingDiagnostic`] next to an empty result, since they
//! are the normal outcome of best-effort language understanding.

use crate::declare::{Template, TemplateError, TemplateKind};
use nl2ltl_logic::Atom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Entities
// ============================================================================

/// Entity name → confidence, in insertion order.
///
/// Re-inserting a name updates its confidence and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    entries: Vec<(String, f64)>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, confidence: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = confidence,
            None => self.entries.push((name, confidence)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Entities {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut entities = Entities::new();
        for (name, confidence) in iter {
            entities.insert(name, confidence);
        }
        entities
    }
}

/// Lower-case the first character only (`"GoogleDrive"` → `"googleDrive"`).
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Kind resolution
// ============================================================================

/// Policy mapping a free-form name onto a catalog kind.
pub trait KindMatcher: Send + Sync {
    fn resolve(&self, name: &str) -> Option<TemplateKind>;
}

/// Accepts canonical names only (surrounding whitespace ignored).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl KindMatcher for ExactMatcher {
    fn resolve(&self, name: &str) -> Option<TemplateKind> {
        name.trim().parse().ok()
    }
}

/// Closest catalog name by normalized edit distance.
///
/// Names are compared lower-cased with separators removed, so
/// `"responded_existence"` and `"Responded Existence"` both score 1.0 against
/// `RespondedExistence`. The best score wins (catalog order breaks ties) if it
/// reaches the cutoff.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    cutoff: f64,
}

impl SimilarityMatcher {
    pub const DEFAULT_CUTOFF: f64 = 0.6;

    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Similarity in `[0, 1]` between `name` and the canonical name of `kind`.
    pub fn score(name: &str, kind: TemplateKind) -> f64 {
        let a = normalize(name);
        let b = normalize(kind.name());
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 0.0;
        }
        1.0 - levenshtein(&a, &b) as f64 / longest as f64
    }
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CUTOFF)
    }
}

impl KindMatcher for SimilarityMatcher {
    fn resolve(&self, name: &str) -> Option<TemplateKind> {
        let mut best: Option<(TemplateKind, f64)> = None;
        for kind in TemplateKind::ALL {
            let score = Self::score(name, kind);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((kind, score));
            }
        }
        best.filter(|(_, score)| *score >= self.cutoff)
            .map(|(kind, _)| kind)
    }
}

fn normalize(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }

    // Two DP rows: distances between `a[..i]` and `b[..j]`.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for j in 1..=b.len() {
            let cost = if *ca == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ============================================================================
// Grounding
// ============================================================================

/// Why grounding produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GroundingDiagnostic {
    UnresolvedKind {
        name: String,
    },
    InsufficientEntities {
        kind: TemplateKind,
        required: usize,
        available: usize,
    },
}

impl std::fmt::Display for GroundingDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroundingDiagnostic::UnresolvedKind { name } => {
                write!(f, "no template kind matches `{name}`")
            }
            GroundingDiagnostic::InsufficientEntities {
                kind,
                required,
                available,
            } => write!(
                f,
                "cannot instantiate {kind} with {available} entities (needs {required})"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundingOutcome {
    Grounded(Template),
    Skipped(GroundingDiagnostic),
}

impl GroundingOutcome {
    pub fn template(&self) -> Option<&Template> {
        match self {
            GroundingOutcome::Grounded(t) => Some(t),
            GroundingOutcome::Skipped(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&GroundingDiagnostic> {
        match self {
            GroundingOutcome::Grounded(_) => None,
            GroundingOutcome::Skipped(d) => Some(d),
        }
    }

    /// The grounded set: one instance, or empty when skipped.
    pub fn templates(&self) -> BTreeSet<Template> {
        self.template().cloned().into_iter().collect()
    }
}

/// Ground `kind_name` using the default [`SimilarityMatcher`].
pub fn ground(kind_name: &str, entities: &Entities) -> Result<GroundingOutcome, TemplateError> {
    ground_with(&SimilarityMatcher::default(), kind_name, entities)
}

/// Ground `kind_name` using an explicit matching policy.
pub fn ground_with<M: KindMatcher + ?Sized>(
    matcher: &M,
    kind_name: &str,
    entities: &Entities,
) -> Result<GroundingOutcome, TemplateError> {
    match matcher.resolve(kind_name) {
        Some(kind) => ground_kind(kind, entities),
        None => Ok(GroundingOutcome::Skipped(
            GroundingDiagnostic::UnresolvedKind {
                name: kind_name.to_string(),
            },
        )),
    }
}

/// Bind the first `kind.arity()` entities, in order, as operands.
///
/// Errors only when an entity name cannot become an atom (empty or blank).
pub fn ground_kind(
    kind: TemplateKind,
    entities: &Entities,
) -> Result<GroundingOutcome, TemplateError> {
    let required = kind.arity();
    if entities.len() < required {
        return Ok(GroundingOutcome::Skipped(
            GroundingDiagnostic::InsufficientEntities {
                kind,
                required,
                available: entities.len(),
            },
        ));
    }

    let atoms = entities
        .names()
        .take(required)
        .enumerate()
        .map(|(position, name)| {
            Atom::new(decapitalize(name)).map_err(|_| TemplateError::InvalidOperand {
                kind,
                position,
                operand: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Template::from_atoms(kind, atoms).map(GroundingOutcome::Grounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Atom {
        Atom::new(name).unwrap()
    }

    #[test]
    fn entities_keep_insertion_order_on_update() {
        let mut e: Entities = [("Slack", 0.9), ("Gmail", 0.8)].into_iter().collect();
        e.insert("Slack", 0.5);
        let names: Vec<&str> = e.names().collect();
        assert_eq!(names, vec!["Slack", "Gmail"]);
        assert_eq!(e.get("Slack"), Some(0.5));
    }

    #[test]
    fn decapitalize_only_touches_first_char() {
        assert_eq!(decapitalize("GoogleDrive"), "googleDrive");
        assert_eq!(decapitalize("slack"), "slack");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn similarity_matcher_tolerates_typos_and_separators() {
        let m = SimilarityMatcher::default();
        assert_eq!(m.resolve("Response"), Some(TemplateKind::Response));
        assert_eq!(m.resolve("Responce"), Some(TemplateKind::Response));
        assert_eq!(
            m.resolve("responded_existence"),
            Some(TemplateKind::RespondedExistence)
        );
        assert_eq!(m.resolve("chain response"), Some(TemplateKind::ChainResponse));
        assert_eq!(m.resolve("greeting"), None);
        assert_eq!(m.resolve(""), None);
    }

    #[test]
    fn exact_matcher_is_strict() {
        assert_eq!(ExactMatcher.resolve(" Absence "), Some(TemplateKind::Absence));
        assert_eq!(ExactMatcher.resolve("absence"), None);
    }

    #[test]
    fn grounds_binary_template_in_entity_order() {
        let e: Entities = [("Gmail", 0.9), ("Slack", 0.7), ("Drive", 0.2)]
            .into_iter()
            .collect();
        let outcome = ground("Response", &e).expect("ground");
        assert_eq!(
            outcome.template(),
            Some(&Template::response(atom("gmail"), atom("slack")))
        );
        assert!(outcome.diagnostic().is_none());
    }

    #[test]
    fn not_co_existence_binds_distinct_entities() {
        let e: Entities = [("Gmail", 0.9), ("Slack", 0.7)].into_iter().collect();
        let outcome = ground("NotCoExistence", &e).expect("ground");
        assert_eq!(
            outcome.template(),
            Some(&Template::not_co_existence(atom("gmail"), atom("slack")))
        );
    }

    #[test]
    fn insufficient_entities_is_a_diagnostic() {
        let e: Entities = [("Slack", 0.9)].into_iter().collect();
        let outcome = ground("Response", &e).expect("never an error");
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
    fn unresolved_kind_is_a_diagnostic() {
        let e: Entities = [("Slack", 0.9)].into_iter().collect();
        let outcome = ground("xyzzy", &e).expect("never an error");
        assert!(outcome.templates().is_empty());
        assert!(matches!(
            outcome.diagnostic(),
            Some(GroundingDiagnostic::UnresolvedKind { .. })
        ));
    }

    #[test]
    fn blank_entity_name_is_malformed_input() {
        let e: Entities = [("  ", 0.9)].into_iter().collect();
        let err = ground("Existence", &e).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidOperand { position: 0, .. }));
    }
}
