//! Formula AST for LTLf and PPLTL.
//!
//! One enum carries both operator families so that a future-time formula and
//! its past-time dual share the same propositional skeleton. [`Formula::logic`]
//! tells the two apart.

use crate::atom::Atom;
use serde::{Deserialize, Serialize};

// ============================================================================
// AST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Formula {
    Atom {
        name: Atom,
    },
    Not {
        arg: Box<Formula>,
    },
    And {
        left: Box<Formula>,
        right: Box<Formula>,
    },
    Or {
        left: Box<Formula>,
        right: Box<Formula>,
    },
    Implies {
        left: Box<Formula>,
        right: Box<Formula>,
    },

    // Future time (LTLf)
    Next {
        arg: Box<Formula>,
    },
    Eventually {
        arg: Box<Formula>,
    },
    Always {
        arg: Box<Formula>,
    },
    Until {
        left: Box<Formula>,
        right: Box<Formula>,
    },

    // Past time (PPLTL)
    Before {
        arg: Box<Formula>,
    },
    Once {
        arg: Box<Formula>,
    },
    Historically {
        arg: Box<Formula>,
    },
    Since {
        left: Box<Formula>,
        right: Box<Formula>,
    },
}

/// Which temporal operator family a formula uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    /// No temporal operators at all.
    Propositional,
    /// Only future-time operators (LTLf).
    Future,
    /// Only past-time operators (PPLTL).
    Past,
    /// Both families.
    Mixed,
}

impl Logic {
    fn join(self, other: Logic) -> Logic {
        match (self, other) {
            (Logic::Propositional, x) | (x, Logic::Propositional) => x,
            (a, b) if a == b => a,
            _ => Logic::Mixed,
        }
    }
}

impl std::fmt::Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Logic::Propositional => "propositional",
            Logic::Future => "ltlf",
            Logic::Past => "ppltl",
            Logic::Mixed => "mixed",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Formula {
    pub fn atom(name: Atom) -> Self {
        Formula::Atom { name }
    }

    pub fn not(arg: Formula) -> Self {
        Formula::Not { arg: Box::new(arg) }
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::Implies {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn next(arg: Formula) -> Self {
        Formula::Next { arg: Box::new(arg) }
    }

    pub fn eventually(arg: Formula) -> Self {
        Formula::Eventually { arg: Box::new(arg) }
    }

    pub fn always(arg: Formula) -> Self {
        Formula::Always { arg: Box::new(arg) }
    }

    pub fn until(left: Formula, right: Formula) -> Self {
        Formula::Until {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn before(arg: Formula) -> Self {
        Formula::Before { arg: Box::new(arg) }
    }

    pub fn once(arg: Formula) -> Self {
        Formula::Once { arg: Box::new(arg) }
    }

    pub fn historically(arg: Formula) -> Self {
        Formula::Historically { arg: Box::new(arg) }
    }

    pub fn since(left: Formula, right: Formula) -> Self {
        Formula::Since {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl From<Atom> for Formula {
    fn from(name: Atom) -> Self {
        Formula::Atom { name }
    }
}

// ============================================================================
// Queries and transformations
// ============================================================================

impl Formula {
    pub fn is_atomic(&self) -> bool {
        matches!(self, Formula::Atom { .. })
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Formula::Atom { name } => Some(name),
            _ => None,
        }
    }

    /// Classify the temporal operators used by this formula.
    pub fn logic(&self) -> Logic {
        match self {
            Formula::Atom { .. } => Logic::Propositional,
            Formula::Not { arg } => arg.logic(),
            Formula::And { left, right }
            | Formula::Or { left, right }
            | Formula::Implies { left, right } => left.logic().join(right.logic()),
            Formula::Next { arg } | Formula::Eventually { arg } | Formula::Always { arg } => {
                Logic::Future.join(arg.logic())
            }
            Formula::Until { left, right } => {
                Logic::Future.join(left.logic()).join(right.logic())
            }
            Formula::Before { arg } | Formula::Once { arg } | Formula::Historically { arg } => {
                Logic::Past.join(arg.logic())
            }
            Formula::Since { left, right } => Logic::Past.join(left.logic()).join(right.logic()),
        }
    }

    /// Map every future-time operator onto its past-time counterpart.
    ///
    /// `F ↦ O`, `G ↦ H`, `U ↦ S`, `X ↦ Y`. Propositional structure and
    /// operands are preserved; past-time operators are left as they are.
    pub fn past_dual(&self) -> Formula {
        match self {
            Formula::Atom { name } => Formula::atom(name.clone()),
            Formula::Not { arg } => Formula::not(arg.past_dual()),
            Formula::And { left, right } => Formula::and(left.past_dual(), right.past_dual()),
            Formula::Or { left, right } => Formula::or(left.past_dual(), right.past_dual()),
            Formula::Implies { left, right } => {
                Formula::implies(left.past_dual(), right.past_dual())
            }
            Formula::Next { arg } | Formula::Before { arg } => Formula::before(arg.past_dual()),
            Formula::Eventually { arg } | Formula::Once { arg } => Formula::once(arg.past_dual()),
            Formula::Always { arg } | Formula::Historically { arg } => {
                Formula::historically(arg.past_dual())
            }
            Formula::Until { left, right } | Formula::Since { left, right } => {
                Formula::since(left.past_dual(), right.past_dual())
            }
        }
    }

    /// Atoms occurring in the formula, in first-occurrence order.
    pub fn atoms(&self) -> Vec<&Atom> {
        fn walk<'a>(f: &'a Formula, out: &mut Vec<&'a Atom>) {
            match f {
                Formula::Atom { name } => {
                    if !out.contains(&name) {
                        out.push(name);
                    }
                }
                Formula::Not { arg }
                | Formula::Next { arg }
                | Formula::Eventually { arg }
                | Formula::Always { arg }
                | Formula::Before { arg }
                | Formula::Once { arg }
                | Formula::Historically { arg } => walk(arg, out),
                Formula::And { left, right }
                | Formula::Or { left, right }
                | Formula::Implies { left, right }
                | Formula::Until { left, right }
                | Formula::Since { left, right } => {
                    walk(left, out);
                    walk(right, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

// ============================================================================
// Text form
// ============================================================================

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Binary nodes always carry their own parentheses, so temporal unary
        // operators only add parentheses around atoms and other unary nodes.
        fn unary(
            f: &mut std::fmt::Formatter<'_>,
            op: &str,
            arg: &Formula,
        ) -> std::fmt::Result {
            match arg {
                Formula::And { .. }
                | Formula::Or { .. }
                | Formula::Implies { .. }
                | Formula::Until { .. }
                | Formula::Since { .. } => write!(f, "{op}{arg}"),
                _ => write!(f, "{op}({arg})"),
            }
        }

        match self {
            Formula::Atom { name } => write!(f, "{name}"),
            Formula::Not { arg } => write!(f, "!{arg}"),
            Formula::And { left, right } => write!(f, "({left} & {right})"),
            Formula::Or { left, right } => write!(f, "({left} | {right})"),
            Formula::Implies { left, right } => write!(f, "({left} -> {right})"),
            Formula::Next { arg } => unary(f, "X", arg),
            Formula::Eventually { arg } => unary(f, "F", arg),
            Formula::Always { arg } => unary(f, "G", arg),
            Formula::Until { left, right } => write!(f, "({left} U {right})"),
            Formula::Before { arg } => unary(f, "Y", arg),
            Formula::Once { arg } => unary(f, "O", arg),
            Formula::Historically { arg } => unary(f, "H", arg),
            Formula::Since { left, right } => write!(f, "({left} S {right})"),
        }
    }
}
