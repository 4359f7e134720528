use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::config::MergeConfig;
use crate::core::error::{MergeError, Result};
use crate::core::types::SystemContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toon,
}

impl DocumentFormat {
    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Toon => "toon",
        }
    }

    //chosen by file extension, case-insensitive
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("toon") => Ok(DocumentFormat::Toon),
            _ => Err(MergeError::validation(format!(
                "cannot tell the document format of {} (expected .json or .toon)",
                path.display()
            ))),
        }
    }
}

pub fn parse_document<T: DeserializeOwned>(text: &str, format: DocumentFormat) -> Result<T> {
    let decoded = match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        DocumentFormat::Toon => toon_format::decode_default(text).map_err(|e| e.to_string()),
    };
    decoded.map_err(|message| MergeError::Decode { format: format.name(), message })
}

fn read(path: &Path) -> Result<(String, DocumentFormat)> {
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| MergeError::Io { path: path.to_path_buf(), source })?;
    Ok((text, format))
}

pub fn parse_system_context(text: &str, format: DocumentFormat) -> Result<SystemContext> {
    let system: SystemContext = parse_document(text, format)?;
    if system.system_name.trim().is_empty() {
        return Err(MergeError::validation("system context has no system name"));
    }
    debug!(system = %system.system_name, modules = system.modules.len(), "parsed system context");
    Ok(system)
}

pub fn load_system_context(path: impl AsRef<Path>) -> Result<SystemContext> {
    let (text, format) = read(path.as_ref())?;
    parse_system_context(&text, format)
}

pub fn load_merge_config(path: impl AsRef<Path>) -> Result<MergeConfig> {
    let (text, format) = read(path.as_ref())?;
    let config: MergeConfig = parse_document(&text, format)?;
    config.validate()?;
    Ok(config)
}
