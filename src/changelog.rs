//! Changelog extraction from a downloaded artifact.
//!
//! Release artifacts may bundle a `changelog.json` entry describing the
//! release as ordered pages of text lines. A changelog is only accepted when
//! its embedded version matches the release it was downloaded for; anything
//! stale, missing, or malformed is logged and dropped.

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use tracing::warn;

const CHANGELOG_ENTRY: &str = "changelog.json";
const MAX_CHANGELOG_BYTES: usize = 1024 * 1024;

/// Ordered pages of changelog text for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    pub version: String,
    pub pages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawChangelog {
    version: String,
    data: Vec<Vec<String>>,
}

/// Read the bundled changelog from `artifact_path`, keeping it only when its
/// version matches `expected_version` (case-insensitive). Never fails the
/// caller; all errors degrade to `None`.
pub fn read_changelog(artifact_path: &Path, expected_version: &str) -> Option<ChangelogDocument> {
    let raw = match read_changelog_entry(artifact_path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                artifact = %artifact_path.display(),
                error = %err,
                "Failed to read bundled changelog"
            );
            return None;
        }
    };
    document_for_version(raw, expected_version)
}

fn read_changelog_entry(artifact_path: &Path) -> Result<RawChangelog, crate::UpdateError> {
    let file = File::open(artifact_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|err| crate::UpdateError::Archive(err.to_string()))?;
    let entry = archive
        .by_name(CHANGELOG_ENTRY)
        .map_err(|err| crate::UpdateError::Archive(err.to_string()))?;
    let mut bytes = Vec::new();
    entry
        .take(MAX_CHANGELOG_BYTES as u64)
        .read_to_end(&mut bytes)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn document_for_version(raw: RawChangelog, expected_version: &str) -> Option<ChangelogDocument> {
    if !raw.version.eq_ignore_ascii_case(expected_version) {
        warn!(
            embedded = %raw.version,
            expected = %expected_version,
            "Bundled changelog is for a different release, discarding"
        );
        return None;
    }
    let pages = raw
        .data
        .into_iter()
        .map(|lines| lines.join("\n"))
        .collect();
    Some(ChangelogDocument {
        version: raw.version,
        pages,
    })
}
