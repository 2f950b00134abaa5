//! Extracts the declared PHP versions from `.travis.yml`

use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

use super::{display_name, read_manifest, reduction};
use crate::{
    error::{Error, Result},
    version::{coerce_semver, is_excluded, sort_descending},
};

#[derive(Debug, thiserror::Error)]
enum ParseFailure {
    #[error("flow-style documents are not supported")]
    FlowRoot,
    #[error("document is not a mapping")]
    NotAMapping,
    #[error(transparent)]
    Syntax(#[from] serde_yaml::Error),
}

/// Resolves the PHP versions a project declares in its CI manifest
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionResolver;

impl VersionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Declared versions, normalised to `major.minor.patch` and sorted
    /// descending. Duplicates are kept.
    pub fn resolve(&self, manifest_path: &Path) -> Result<Vec<String>> {
        let file = display_name(manifest_path);
        let raw = read_manifest(manifest_path)?;

        let stripped = raw.replace(';', "");
        let configuration = stripped.trim();
        if configuration.is_empty() {
            return Err(Error::Blank { file });
        }

        let document = match parse(configuration) {
            Ok(document) => document,
            Err(e) => {
                debug!("Full parse of {} failed ({}), reducing", file, e);
                reduction::reduce(&raw)
                    .ok_or_else(|| {
                        debug!("No matrix or php block found in {}", file);
                        Error::ConfigurationNotParseable { file: file.clone() }
                    })
                    .and_then(|reduced| {
                        parse(&reduced).map_err(|e| {
                            debug!("Reduced parse of {} failed: {}", file, e);
                            Error::ConfigurationNotParseable { file: file.clone() }
                        })
                    })?
            }
        };

        resolve_versions(&document)
    }
}

fn parse(text: &str) -> std::result::Result<Value, ParseFailure> {
    if reduction::has_flow_root(text) {
        return Err(ParseFailure::FlowRoot);
    }

    let document: Value = serde_yaml::from_str(text)?;
    if !document.is_mapping() {
        return Err(ParseFailure::NotAMapping);
    }
    Ok(document)
}

fn resolve_versions(document: &Value) -> Result<Vec<String>> {
    let mut tokens: Vec<&Value> = Vec::new();

    if let Some(includes) = document
        .get("matrix")
        .and_then(|matrix| matrix.get("include"))
        .and_then(Value::as_sequence)
    {
        tokens.extend(includes.iter().filter_map(|include| include.get("php")));
    }

    match document.get("php") {
        Some(Value::Sequence(versions)) => tokens.extend(versions),
        Some(version) => tokens.push(version),
        None => {}
    }

    let mut versions: Vec<String> = tokens
        .into_iter()
        .filter_map(stringify)
        .filter(|token| !is_excluded(token))
        .map(|token| coerce_semver(&token))
        .collect();

    sort_descending(&mut versions);

    if versions.is_empty() {
        return Err(Error::VersionsNotResolvable);
    }

    debug!("Declared PHP versions: {:?}", versions);
    Ok(versions)
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(token) => Some(token.trim().to_string()),
        Value::Number(number) => {
            if let Some(n) = number.as_u64() {
                Some(n.to_string())
            } else if let Some(n) = number.as_i64() {
                Some(n.to_string())
            } else {
                number.as_f64().map(|n| n.to_string())
            }
        }
        other => {
            debug!("Skipping non-scalar version token {:?}", other);
            None
        }
    }
}
