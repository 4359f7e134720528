//! Consolidates independently modeled modules of a system into one
//! deduplicated domain model (a bounded context).
//!
//! Pipeline: names are normalized once, then modules are folded pairwise off a
//! LIFO stack. Each fold matches entities through a [`SimilarityOracle`],
//! merges matched pairs field by field, and keeps everything else as
//! module-qualified copies.

pub mod core;
pub mod input;
pub mod similarity;

pub use crate::core::config::{MergeConfig, SimilarityStrategy, DEFAULT_ENTITY_CUTOFF};
pub use crate::core::entity::merge_entities;
pub use crate::core::error::{MergeError, Result};
pub use crate::core::field::{merge_fields, TypeRank};
pub use crate::core::matcher::{match_entities, EntityMatch, SimilarityRecord};
pub use crate::core::merger::ContextMerger;
pub use crate::core::name::{base_token, normalize_system, QualifiedName};
pub use crate::core::types::{Annotation, BoundedContext, Entity, Field, FieldMap, Module, SystemContext};
pub use crate::input::{load_merge_config, load_system_context, parse_system_context, DocumentFormat};
pub use crate::similarity::{Alignment, LexicalOracle, SemanticOracle, SimilarityOracle};
