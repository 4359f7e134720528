use std::fmt;

use tracing::warn;

use crate::core::config::{MergeConfig, SimilarityStrategy};
use crate::core::error::Result;
use crate::similarity::SimilarityOracle;

// config + oracle; operations live in module.rs and context.rs
pub struct ContextMerger {
    pub(crate) config: MergeConfig,
    pub(crate) oracle: Box<dyn SimilarityOracle>,
}

impl ContextMerger {
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;
        if config.strategy == SimilarityStrategy::Semantic && config.synonyms.is_empty() {
            warn!("semantic strategy without synonyms scores like the lexical one");
        }
        let oracle = config.oracle();
        Ok(Self { config, oracle })
    }

    //`config.strategy` is ignored
    pub fn with_oracle(config: MergeConfig, oracle: impl SimilarityOracle + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, oracle: Box::new(oracle) })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn cutoff(&self) -> f64 {
        self.config.cutoff
    }

    pub fn oracle(&self) -> &dyn SimilarityOracle {
        self.oracle.as_ref()
    }
}

impl fmt::Debug for ContextMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMerger").field("config", &self.config).finish_non_exhaustive()
    }
}
