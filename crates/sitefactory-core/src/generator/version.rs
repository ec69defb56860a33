//! Version comparison for generator requirements

use anyhow::Result;
use semver::Version;

/// Parse version string, handling a leading `v` and build suffixes
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim().strip_prefix('v').unwrap_or(version_str.trim());
    Version::parse(cleaned)
        .map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Pull the first `X.Y.Z` token out of a generator's version banner
///
/// `hugo v0.121.1-00b46fed8e47f7bb0a85d7cfc2d9f1356379b740+extended linux/amd64`
/// yields `0.121.1`.
pub fn extract_version(banner: &str) -> Option<Version> {
    banner.split_whitespace().find_map(|token| {
        let token = token.strip_prefix('v').unwrap_or(token);
        if !token.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let core = token.split(['-', '+']).next().unwrap_or(token);
        Version::parse(core).ok()
    })
}

/// Compare a detected generator version against a template's minimum
///
/// Returns a warning message if the generator is older than required.
/// Unparseable requirements are skipped.
pub fn check_compatibility(found: &Version, required: &str) -> Option<String> {
    let required_ver = parse_version(required).ok()?;

    if *found < required_ver {
        Some(format!(
            "Template requires generator version {} or newer, found {}",
            required_ver, found
        ))
    } else {
        None
    }
}
