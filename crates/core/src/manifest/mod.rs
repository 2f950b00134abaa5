//! Readers for the two project manifests: the Composer scripts and the CI
//! build matrix.

pub mod composer;
pub mod reduction;
pub mod travis;

pub use composer::{Script, ScriptResolver};
pub use travis::VersionResolver;

use std::path::Path;

use crate::error::{Error, Result};

/// File name used in user-facing messages about a manifest
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a manifest, failing with `NotFound` when it is missing. Bytes that
/// are not UTF-8 (a Latin-1 comment, say) are replaced rather than rejected.
pub(crate) fn read_manifest(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::NotFound {
            file: display_name(path),
        });
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
