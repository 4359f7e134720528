//! Reading system descriptions and merge settings from documents.
//!
//! Inputs:
//!   - system context document (`.json` or `.toon`): modules, entities, fields
//!   - optional merge config document, same formats
//!
//! Everything read here is checked before it reaches the merge core.

mod document;

pub use document::{load_merge_config, load_system_context, parse_document, parse_system_context, DocumentFormat};
