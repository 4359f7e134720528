use serde::{Deserialize, Serialize};

use crate::core::error::{MergeError, Result};
use crate::similarity::{LexicalOracle, SemanticOracle, SimilarityOracle};

//entities merge strictly above this
pub const DEFAULT_ENTITY_CUTOFF: f64 = 0.9;

pub const DEFAULT_FIELD_CUTOFF: f64 = 0.85;

/// Which built-in similarity oracle a merger uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityStrategy {
    #[default]
    Lexical,
    //only differs from Lexical once `synonyms` are configured
    Semantic,
}

impl SimilarityStrategy {
    pub fn from_semantic_flag(use_semantic: bool) -> Self {
        if use_semantic { SimilarityStrategy::Semantic } else { SimilarityStrategy::Lexical }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeConfig {
    pub cutoff: f64,
    pub field_cutoff: f64,
    pub strategy: SimilarityStrategy,
    //groups of names the semantic oracle treats as the same concept
    pub synonyms: Vec<Vec<String>>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_ENTITY_CUTOFF,
            field_cutoff: DEFAULT_FIELD_CUTOFF,
            strategy: SimilarityStrategy::default(),
            synonyms: Vec::new(),
        }
    }
}

impl MergeConfig {
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_strategy(mut self, strategy: SimilarityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_synonyms<I, S>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (what, value) in [("cutoff", self.cutoff), ("fieldCutoff", self.field_cutoff)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MergeError::validation(format!("{what} must be a finite, non-negative score, got {value}")));
            }
        }
        if let Some(group) = self.synonyms.iter().find(|g| g.iter().any(|s| s.trim().is_empty())) {
            return Err(MergeError::validation(format!("synonym group {group:?} contains a blank name")));
        }
        Ok(())
    }

    pub fn oracle(&self) -> Box<dyn SimilarityOracle> {
        match self.strategy {
            SimilarityStrategy::Lexical => Box::new(LexicalOracle::new(self.field_cutoff)),
            SimilarityStrategy::Semantic => Box::new(SemanticOracle::new(self.field_cutoff, &self.synonyms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_the_historic_cutoff() {
        let config = MergeConfig::default();
        assert_eq!(config.cutoff, 0.9);
        assert_eq!(config.strategy, SimilarityStrategy::Lexical);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn semantic_flag_picks_strategy() {
        assert_eq!(SimilarityStrategy::from_semantic_flag(true), SimilarityStrategy::Semantic);
        assert_eq!(SimilarityStrategy::from_semantic_flag(false), SimilarityStrategy::Lexical);
    }

    #[test]
    fn rejects_unusable_cutoffs() {
        assert!(MergeConfig::default().with_cutoff(f64::NAN).validate().is_err());
        assert!(MergeConfig::default().with_cutoff(-0.1).validate().is_err());
        assert!(MergeConfig::default().with_synonyms(["person", " "]).validate().is_err());
        assert!(MergeConfig::default().with_cutoff(0.0).validate().is_ok());
    }

    #[test]
    fn deserializes_partial_documents() {
        let config: MergeConfig =
            serde_json::from_str(r#"{ "strategy": "semantic", "synonyms": [["person", "user"]] }"#).unwrap();
        assert_eq!(config.cutoff, DEFAULT_ENTITY_CUTOFF);
        assert_eq!(config.strategy, SimilarityStrategy::Semantic);
        assert_eq!(config.synonyms, vec![vec!["person".to_string(), "user".to_string()]]);
    }
}
