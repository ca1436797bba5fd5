use super::Filter;
use crate::declare::Template;
use crate::grounding::Entities;
use crate::relations::{conflicts, subsumes};
use crate::WeightedTemplates;

/// Pass-through: the raw ranked candidate set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFilter;

impl Filter for BasicFilter {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn enforce(&self, output: &WeightedTemplates, _entities: &Entities) -> WeightedTemplates {
        output.clone()
    }
}

/// Single-pivot greedy selection.
///
/// Algorithm:
/// - pick the candidate with the highest confidence (the first one in
///   template order on ties; NaN never wins)
/// - drop every other candidate that conflicts with it or that it subsumes
/// - keep everything else with its original confidence
///
/// Survivors are not compared with each other, only with the pivot.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyFilter;

impl GreedyFilter {
    fn pivot(output: &WeightedTemplates) -> Option<&Template> {
        let mut best: Option<(&Template, f64)> = None;
        for (template, &confidence) in output {
            if confidence.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, top)| confidence > top) {
                best = Some((template, confidence));
            }
        }
        best.map(|(t, _)| t)
    }
}

impl Filter for GreedyFilter {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn enforce(&self, output: &WeightedTemplates, _entities: &Entities) -> WeightedTemplates {
        let Some(pivot) = Self::pivot(output) else {
            return WeightedTemplates::new();
        };
        let pivot_conflicts = conflicts(pivot);
        let pivot_subsumes = subsumes(pivot);

        output
            .iter()
            .filter(|(template, _)| {
                *template == pivot
                    || !(pivot_conflicts.contains(*template) || pivot_subsumes.contains(*template))
            })
            .map(|(template, confidence)| (template.clone(), *confidence))
            .collect()
    }
}
