use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::{FormSpec, ValidatorRegistry, parse_form_spec};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse a spec document, trying `format` first and then every other
/// available format.
pub fn parse_document_any(contents: &str, format: DocumentFormat) -> Result<Value> {
    let primary = match parse_document_str(contents, format) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    DocumentFormat::available_formats()
        .into_iter()
        .filter(|candidate| *candidate != format)
        .find_map(|candidate| parse_document_str(contents, candidate).ok())
        .ok_or(primary)
}

/// Read a [`FormSpec`] from document text, resolving validator names
/// against `registry`.
pub fn load_form_spec(
    contents: &str,
    format: DocumentFormat,
    registry: &ValidatorRegistry,
) -> Result<FormSpec> {
    let document = parse_document_any(contents, format)?;
    parse_form_spec(&document, registry).context("spec document rejected")
}
