//! Filters: reduce a weighted candidate pool to a final answer set.

mod simple;

pub use simple::{BasicFilter, GreedyFilter};

use crate::grounding::Entities;
use crate::WeightedTemplates;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A selection policy over grounded candidates.
///
/// Implementations are pure: output depends only on the arguments.
pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;

    fn enforce(&self, output: &WeightedTemplates, entities: &Entities) -> WeightedTemplates;
}

/// Configuration-level choice of filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Basic,
    #[default]
    Greedy,
}

impl FilterKind {
    pub fn filter(self) -> Box<dyn Filter> {
        match self {
            FilterKind::Basic => Box::new(BasicFilter),
            FilterKind::Greedy => Box::new(GreedyFilter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter `{0}` (expected basic|greedy)")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FilterKind::Basic),
            "greedy" => Ok(FilterKind::Greedy),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.filter().name())
    }
}
