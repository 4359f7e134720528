//! Similarity oracles: score two entities and propose a field correspondence.
//!
//! The merge core only ever sees the [`SimilarityOracle`] trait. Two built-in
//! strategies are provided; callers can plug in anything else, including a
//! plain closure.

mod lexical;
mod semantic;

pub use lexical::LexicalOracle;
pub use semantic::SemanticOracle;

use std::collections::BTreeSet;

use crate::core::types::{Entity, Field, FieldMap};

/// What an oracle says about one `(a, b)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub score: f64,
    //keys are fields of `a`, values fields of `b`
    pub field_map: Option<FieldMap>,
}

impl Alignment {
    pub fn new(score: f64, field_map: Option<FieldMap>) -> Self {
        Self { score, field_map }
    }

    pub fn unaligned(score: f64) -> Self {
        Self { score, field_map: None }
    }
}

/// Scores how alike two entities are and proposes which fields correspond.
///
/// Implementations must be side-effect free: the matcher calls them once per
/// entity pair and may share one oracle across independent builds.
pub trait SimilarityOracle: Send + Sync {
    fn score_and_align(&self, a: &Entity, b: &Entity) -> Alignment;
}

impl<F> SimilarityOracle for F
where
    F: Fn(&Entity, &Entity) -> Alignment + Send + Sync,
{
    fn score_and_align(&self, a: &Entity, b: &Entity) -> Alignment {
        self(a, b)
    }
}

// greedy and injective: each field of `a` takes the best unused field of `b`
// scoring at least `cutoff`
pub(crate) fn align_fields(
    a: &Entity,
    b: &Entity,
    cutoff: f64,
    similarity: impl Fn(&str, &str) -> f64,
) -> FieldMap {
    let mut used: BTreeSet<&Field> = BTreeSet::new();
    let mut mapping = FieldMap::new();

    for fa in &a.fields {
        let mut best: Option<(&Field, f64)> = None;
        for fb in b.fields.iter().filter(|fb| !used.contains(fb)) {
            let score = similarity(fa.name.base(), fb.name.base());
            if score >= cutoff && best.is_none_or(|(_, s)| score > s) {
                best = Some((fb, score));
            }
        }
        if let Some((fb, _)) = best {
            used.insert(fb);
            mapping.insert(fa.clone(), fb.clone());
        }
    }
    mapping
}

//mean of name score and paired-field share; field-less pairs use the name alone
pub(crate) fn combined_score(name_score: f64, a: &Entity, b: &Entity, mapped: usize) -> f64 {
    let total = a.fields.len() + b.fields.len();
    let coverage = if total == 0 { name_score } else { (2 * mapped) as f64 / total as f64 };
    (name_score + coverage) / 2.0
}

pub(crate) fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(&a.to_lowercase(), &b.to_lowercase())
}
