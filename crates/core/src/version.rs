//! PHP version token helpers

/// Tokens naming pseudo-runtimes that are never run against
pub const EXCLUDED_VERSIONS: [&str; 2] = ["hhvm", "nightly"];

/// Whether a raw CI token names a pseudo-runtime
pub fn is_excluded(token: &str) -> bool {
    EXCLUDED_VERSIONS.contains(&token)
}

/// Zero-fill missing minor and patch components: `7` → `7.0.0`, `7.1` → `7.1.0`.
/// Tokens with three or more components are returned unchanged.
pub fn coerce_semver(token: &str) -> String {
    match token.split('.').count() {
        1 => format!("{token}.0.0"),
        2 => format!("{token}.0"),
        _ => token.to_string(),
    }
}

/// The `(major, minor)` pair of a version, ignoring the patch level and
/// phpbrew's `php-` prefix. `None` when there is no minor component.
pub fn minor_key(version: &str) -> Option<(&str, &str)> {
    let version = version.trim();
    let version = version.strip_prefix("php-").unwrap_or(version);
    let mut parts = version.split('.');
    let major = parts.next().filter(|part| !part.is_empty())?;
    let minor = parts.next().filter(|part| !part.is_empty())?;
    Some((major, minor))
}

/// Descending order over the normalised string form
pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by(|a, b| b.cmp(a));
}
