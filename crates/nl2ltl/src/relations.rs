//! Conflict and subsumption tables.
//!
//! Both tables are hand-authored domain knowledge keyed on the template kind
//! and its operands. They are pure: the same instance always yields the same
//! set, and no instance appears in its own conflicts or subsumptions.

use crate::declare::Template;
use std::collections::BTreeSet;

/// Instances that cannot hold together with `template`.
pub fn conflicts(template: &Template) -> BTreeSet<Template> {
    match template {
        Template::Existence(a) | Template::ExistenceTwo(a) => {
            BTreeSet::from([Template::Absence(a.clone())])
        }
        Template::Absence(a) => BTreeSet::from([Template::Existence(a.clone())]),
        Template::RespondedExistence(a, b)
        | Template::Response(a, b)
        | Template::ChainResponse(a, b) => BTreeSet::from([
            Template::Absence(a.clone()),
            Template::Absence(b.clone()),
            Template::Precedence(b.clone(), a.clone()),
        ]),
        Template::Precedence(a, b) => BTreeSet::from([
            Template::RespondedExistence(b.clone(), a.clone()),
            Template::Response(b.clone(), a.clone()),
            Template::ChainResponse(b.clone(), a.clone()),
        ]),
        Template::NotCoExistence(..) => BTreeSet::new(),
    }
}

/// Instances implied by `template` (redundant once it is kept).
pub fn subsumes(template: &Template) -> BTreeSet<Template> {
    match template {
        Template::Existence(_) | Template::Absence(_) => BTreeSet::new(),
        Template::ExistenceTwo(a) => BTreeSet::from([Template::Existence(a.clone())]),
        Template::RespondedExistence(a, b)
        | Template::Precedence(a, b)
        | Template::NotCoExistence(a, b) => BTreeSet::from([
            Template::Existence(a.clone()),
            Template::Existence(b.clone()),
        ]),
        Template::Response(a, b) => BTreeSet::from([
            Template::Existence(a.clone()),
            Template::Existence(b.clone()),
            Template::RespondedExistence(a.clone(), b.clone()),
            Template::ChainResponse(a.clone(), b.clone()),
        ]),
        Template::ChainResponse(a, b) => BTreeSet::from([
            Template::Existence(a.clone()),
            Template::Existence(b.clone()),
            Template::RespondedExistence(a.clone(), b.clone()),
        ]),
    }
}

/// Whether either instance lists the other as a conflict.
pub fn conflicts_with(x: &Template, y: &Template) -> bool {
    conflicts(x).contains(y) || conflicts(y).contains(x)
}

/// Whether `weaker` is implied by `stronger`.
pub fn is_subsumed_by(weaker: &Template, stronger: &Template) -> bool {
    subsumes(stronger).contains(weaker)
}
