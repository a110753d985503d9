/* Reading schema documents from disk */

use crate::error::CodegenResult;
use anyhow::Context;
use packgen_types::SchemaDocument;
use std::path::Path;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /* `.json` files are JSON, everything else is read as YAML */
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SchemaFormat::Json,
            _ => SchemaFormat::Yaml,
        }
    }
}

pub fn parse_document(text: &str, format: SchemaFormat) -> CodegenResult<SchemaDocument> {
    Ok(match format {
        SchemaFormat::Json => serde_json::from_str(text)?,
        SchemaFormat::Yaml => serde_yml::from_str(text)?,
    })
}

pub fn load_document(path: &Path) -> anyhow::Result<SchemaDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let document = parse_document(&text, SchemaFormat::from_path(path))
        .with_context(|| format!("failed to parse schema file {}", path.display()))?;
    tracing::debug!(path = %path.display(), types = document.types.len(), "loaded schema");
    Ok(document)
}
