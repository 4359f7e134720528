use crate::core::config::DEFAULT_FIELD_CUTOFF;
use crate::core::types::Entity;
use crate::similarity::{align_fields, combined_score, name_similarity, Alignment, SimilarityOracle};

/// Spelling-based oracle: Jaro-Winkler over lower-cased base names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalOracle {
    field_cutoff: f64,
}

impl LexicalOracle {
    pub fn new(field_cutoff: f64) -> Self {
        Self { field_cutoff }
    }
}

impl Default for LexicalOracle {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_CUTOFF)
    }
}

impl SimilarityOracle for LexicalOracle {
    fn score_and_align(&self, a: &Entity, b: &Entity) -> Alignment {
        let name_score = name_similarity(a.name.base(), b.name.base());
        let mapping = align_fields(a, b, self.field_cutoff, name_similarity);
        let score = combined_score(name_score, a, b, mapping.len());
        Alignment::new(score, Some(mapping))
    }
}
