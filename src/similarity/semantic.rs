use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::Entity;
use crate::similarity::{align_fields, combined_score, name_similarity, Alignment, SimilarityOracle};

/// Lexicon-backed oracle: names listed in one synonym group are the same
/// concept (score 1.0); anything else falls back to spelling similarity.
///
/// No lexicon ships with the crate. Without configured synonyms this scores
/// exactly like [`LexicalOracle`](crate::similarity::LexicalOracle).
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticOracle {
    field_cutoff: f64,
    //lower-cased name -> ids of the groups it belongs to
    groups: BTreeMap<String, BTreeSet<usize>>,
}

impl SemanticOracle {
    pub fn new(field_cutoff: f64, synonyms: &[Vec<String>]) -> Self {
        let mut groups: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (id, group) in synonyms.iter().enumerate() {
            for name in group {
                groups.entry(name.trim().to_lowercase()).or_default().insert(id);
            }
        }
        Self { field_cutoff, groups }
    }

    fn synonymous(&self, a: &str, b: &str) -> bool {
        match (self.groups.get(&a.to_lowercase()), self.groups.get(&b.to_lowercase())) {
            (Some(ga), Some(gb)) => !ga.is_disjoint(gb),
            _ => false,
        }
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        if self.synonymous(a, b) { 1.0 } else { name_similarity(a, b) }
    }
}

impl SimilarityOracle for SemanticOracle {
    fn score_and_align(&self, a: &Entity, b: &Entity) -> Alignment {
        let name_score = self.similarity(a.name.base(), b.name.base());
        let mapping = align_fields(a, b, self.field_cutoff, |x, y| self.similarity(x, y));
        let score = combined_score(name_score, a, b, mapping.len());
        Alignment::new(score, Some(mapping))
    }
}
