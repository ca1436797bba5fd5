//! DECLARE template catalog.
//!
//! Eight fixed templates over one or two atomic propositions. Each instance
//! lowers to an LTLf formula, to its PPLTL dual, and to an English sentence.
//!
//! The catalog is closed: [`Template`] is an enum, and every table in this
//! crate matches on it exhaustively. Adding a template is a compile error in
//! every place that needs to learn about it.

use nl2ltl_logic::{Atom, Formula};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Kinds
// ============================================================================

/// The payload-free template tag, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemplateKind {
    Existence,
    ExistenceTwo,
    Absence,
    RespondedExistence,
    Response,
    Precedence,
    ChainResponse,
    NotCoExistence,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 8] = [
        TemplateKind::Existence,
        TemplateKind::ExistenceTwo,
        TemplateKind::Absence,
        TemplateKind::RespondedExistence,
        TemplateKind::Response,
        TemplateKind::Precedence,
        TemplateKind::ChainResponse,
        TemplateKind::NotCoExistence,
    ];

    /// Canonical name, as emitted by intent classifiers.
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Existence => "Existence",
            TemplateKind::ExistenceTwo => "ExistenceTwo",
            TemplateKind::Absence => "Absence",
            TemplateKind::RespondedExistence => "RespondedExistence",
            TemplateKind::Response => "Response",
            TemplateKind::Precedence => "Precedence",
            TemplateKind::ChainResponse => "ChainResponse",
            TemplateKind::NotCoExistence => "NotCoExistence",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            TemplateKind::Existence | TemplateKind::ExistenceTwo | TemplateKind::Absence => 1,
            TemplateKind::RespondedExistence
            | TemplateKind::Response
            | TemplateKind::Precedence
            | TemplateKind::ChainResponse
            | TemplateKind::NotCoExistence => 2,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown template kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for TemplateKind {
    type Err = UnknownKind;

    /// Exact match on the canonical name. Fuzzy resolution lives in
    /// [`crate::grounding`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ============================================================================
// Instances
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("{kind} expects exactly {expected} operand(s), found {found}")]
    Arity {
        kind: TemplateKind,
        expected: usize,
        found: usize,
    },
    #[error("{kind} operand {position} must be an atomic proposition, found `{operand}`")]
    InvalidOperand {
        kind: TemplateKind,
        position: usize,
        operand: String,
    },
}

/// A template instantiated over concrete atoms.
///
/// Equality, hashing and ordering are structural. The derived order sorts by
/// catalog kind first, then by operand names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "template", content = "operands")]
pub enum Template {
    Existence(Atom),
    ExistenceTwo(Atom),
    Absence(Atom),
    RespondedExistence(Atom, Atom),
    Response(Atom, Atom),
    Precedence(Atom, Atom),
    ChainResponse(Atom, Atom),
    NotCoExistence(Atom, Atom),
}

impl Template {
    /// Build an instance from arbitrary formulas.
    ///
    /// Fails with [`TemplateError::Arity`] when the operand count does not
    /// match the kind, and with [`TemplateError::InvalidOperand`] when an
    /// operand is not an atomic proposition. Arity is checked first.
    pub fn new(kind: TemplateKind, operands: Vec<Formula>) -> Result<Self, TemplateError> {
        let expected = kind.arity();
        if operands.len() != expected {
            return Err(TemplateError::Arity {
                kind,
                expected,
                found: operands.len(),
            });
        }

        let atoms = operands
            .into_iter()
            .enumerate()
            .map(|(position, operand)| match operand {
                Formula::Atom { name } => Ok(name),
                other => Err(TemplateError::InvalidOperand {
                    kind,
                    position,
                    operand: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_atoms(kind, atoms)
    }

    /// Build an instance from atoms, checking only arity.
    pub fn from_atoms(kind: TemplateKind, atoms: Vec<Atom>) -> Result<Self, TemplateError> {
        let found = atoms.len();
        let mut it = atoms.into_iter();
        let template = match (kind, it.next(), it.next(), it.next()) {
            (TemplateKind::Existence, Some(a), None, None) => Template::Existence(a),
            (TemplateKind::ExistenceTwo, Some(a), None, None) => Template::ExistenceTwo(a),
            (TemplateKind::Absence, Some(a), None, None) => Template::Absence(a),
            (TemplateKind::RespondedExistence, Some(a), Some(b), None) => {
                Template::RespondedExistence(a, b)
            }
            (TemplateKind::Response, Some(a), Some(b), None) => Template::Response(a, b),
            (TemplateKind::Precedence, Some(a), Some(b), None) => Template::Precedence(a, b),
            (TemplateKind::ChainResponse, Some(a), Some(b), None) => Template::ChainResponse(a, b),
            (TemplateKind::NotCoExistence, Some(a), Some(b), None) => {
                Template::NotCoExistence(a, b)
            }
            _ => {
                return Err(TemplateError::Arity {
                    kind,
                    expected: kind.arity(),
                    found,
                })
            }
        };
        Ok(template)
    }

    pub fn existence(a: Atom) -> Self {
        Template::Existence(a)
    }

    pub fn existence_two(a: Atom) -> Self {
        Template::ExistenceTwo(a)
    }

    pub fn absence(a: Atom) -> Self {
        Template::Absence(a)
    }

    pub fn responded_existence(a: Atom, b: Atom) -> Self {
        Template::RespondedExistence(a, b)
    }

    pub fn response(a: Atom, b: Atom) -> Self {
        Template::Response(a, b)
    }

    pub fn precedence(a: Atom, b: Atom) -> Self {
        Template::Precedence(a, b)
    }

    pub fn chain_response(a: Atom, b: Atom) -> Self {
        Template::ChainResponse(a, b)
    }

    pub fn not_co_existence(a: Atom, b: Atom) -> Self {
        Template::NotCoExistence(a, b)
    }

    pub fn kind(&self) -> TemplateKind {
        match self {
            Template::Existence(_) => TemplateKind::Existence,
            Template::ExistenceTwo(_) => TemplateKind::ExistenceTwo,
            Template::Absence(_) => TemplateKind::Absence,
            Template::RespondedExistence(..) => TemplateKind::RespondedExistence,
            Template::Response(..) => TemplateKind::Response,
            Template::Precedence(..) => TemplateKind::Precedence,
            Template::ChainResponse(..) => TemplateKind::ChainResponse,
            Template::NotCoExistence(..) => TemplateKind::NotCoExistence,
        }
    }

    /// Operands in binding order.
    pub fn operands(&self) -> Vec<&Atom> {
        match self {
            Template::Existence(a) | Template::ExistenceTwo(a) | Template::Absence(a) => vec![a],
            Template::RespondedExistence(a, b)
            | Template::Response(a, b)
            | Template::Precedence(a, b)
            | Template::ChainResponse(a, b)
            | Template::NotCoExistence(a, b) => vec![a, b],
        }
    }

    /// Lower to LTLf.
    pub fn to_future_logic(&self) -> Formula {
        match self {
            Template::Existence(a) => Formula::eventually(p(a)),
            Template::ExistenceTwo(a) => Formula::eventually(Formula::and(
                p(a),
                Formula::next(Formula::eventually(p(a))),
            )),
            Template::Absence(a) => Formula::not(Formula::eventually(p(a))),
            Template::RespondedExistence(a, b) => {
                Formula::implies(Formula::eventually(p(a)), Formula::eventually(p(b)))
            }
            Template::Response(a, b) => {
                Formula::always(Formula::implies(p(a), Formula::eventually(p(b))))
            }
            Template::Precedence(a, b) => Formula::or(
                Formula::until(Formula::not(p(b)), p(a)),
                Formula::always(Formula::not(p(b))),
            ),
            Template::ChainResponse(a, b) => {
                Formula::always(Formula::implies(p(a), Formula::next(p(b))))
            }
            Template::NotCoExistence(a, b) => Formula::implies(
                Formula::eventually(p(a)),
                Formula::not(Formula::eventually(p(b))),
            ),
        }
    }

    /// Lower to PPLTL, mirroring [`Template::to_future_logic`] operator by
    /// operator (`F ↦ O`, `G ↦ H`, `U ↦ S`, `X ↦ Y`).
    pub fn to_past_logic(&self) -> Formula {
        match self {
            Template::Existence(a) => Formula::once(p(a)),
            Template::ExistenceTwo(a) => {
                Formula::once(Formula::and(p(a), Formula::before(Formula::once(p(a)))))
            }
            Template::Absence(a) => Formula::not(Formula::once(p(a))),
            Template::RespondedExistence(a, b) => {
                Formula::implies(Formula::once(p(a)), Formula::once(p(b)))
            }
            Template::Response(a, b) => {
                Formula::historically(Formula::implies(p(a), Formula::once(p(b))))
            }
            Template::Precedence(a, b) => Formula::or(
                Formula::since(Formula::not(p(b)), p(a)),
                Formula::historically(Formula::not(p(b))),
            ),
            Template::ChainResponse(a, b) => {
                Formula::historically(Formula::implies(p(a), Formula::before(p(b))))
            }
            Template::NotCoExistence(a, b) => {
                Formula::implies(Formula::once(p(a)), Formula::not(Formula::once(p(b))))
            }
        }
    }

    /// English reading of the constraint.
    pub fn to_text(&self) -> String {
        match self {
            Template::Existence(a) => format!("Eventually, {a} will happen."),
            Template::ExistenceTwo(a) => format!("{a} will happen at least twice."),
            Template::Absence(a) => format!("{a} will never happen."),
            Template::RespondedExistence(a, b) => format!(
                "If {a} happens at least once then {b} has to happen or happened before {a}."
            ),
            Template::Response(a, b) => {
                format!("Whenever {a} happens, {b} has to happen eventually afterward.")
            }
            Template::Precedence(a, b) => {
                format!("Whenever {b} happens, {a} has to have happened before it.")
            }
            Template::ChainResponse(a, b) => format!(
                "Every time {a} happens, it must be directly followed by {b} ({b} can also follow other activities)."
            ),
            Template::NotCoExistence(a, b) => {
                format!("Either {a} or {b} can happen, but not both.")
            }
        }
    }
}

fn p(atom: &Atom) -> Formula {
    Formula::atom(atom.clone())
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operands: Vec<String> = self.operands().iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.kind(), operands.join(", "))
    }
}
