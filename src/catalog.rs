//! Remote release-catalog access.

use serde::{Deserialize, Deserializer};

use crate::UpdateError;
use crate::http_client;

const API_FILES: &str = "/servermods/files?projectIds=";
const MAX_CATALOG_BYTES: usize = 1024 * 1024;

/// Release classification attached to catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Alpha,
    Beta,
    Release,
}

impl<'de> Deserialize<'de> for ReleaseType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "alpha" => Ok(Self::Alpha),
            "beta" => Ok(Self::Beta),
            "release" => Ok(Self::Release),
            other => Err(serde::de::Error::custom(format!(
                "unknown release type '{other}'"
            ))),
        }
    }
}

/// Metadata for one catalog release entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub name: String,
    #[serde(rename = "releaseType")]
    pub release_type: ReleaseType,
    #[serde(rename = "gameVersion")]
    pub game_version: String,
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

/// Client for the servermods file listing of one project.
#[derive(Debug, Clone)]
pub struct ReleaseCatalogClient {
    base_url: String,
    project_id: u32,
    api_key: Option<String>,
}

impl ReleaseCatalogClient {
    pub fn new(base_url: impl Into<String>, project_id: u32, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project_id,
            api_key,
        }
    }

    /// Fetch the latest release listed for the project.
    ///
    /// The catalog returns files in chronological order; the last element is
    /// taken as the latest.
    pub fn fetch_latest(&self) -> Result<ReleaseInfo, UpdateError> {
        let url = format!("{}{API_FILES}{}", self.base_url, self.project_id);
        let mut request = http_client::agent()
            .get(&url)
            .set("User-Agent", http_client::USER_AGENT);
        if let Some(key) = self.api_key.as_deref() {
            request = request.set("X-API-Key", key);
        }
        let response = request
            .call()
            .map_err(|err| UpdateError::Http(err.to_string()))?;
        let bytes = http_client::read_response_bytes(response, MAX_CATALOG_BYTES)?;
        latest_from_listing(&bytes, self.project_id)
    }
}

fn latest_from_listing(bytes: &[u8], project_id: u32) -> Result<ReleaseInfo, UpdateError> {
    let mut files: Vec<ReleaseInfo> = serde_json::from_slice(bytes)?;
    files.pop().ok_or(UpdateError::NoFiles(project_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_release_shape() {
        let json = r#"
        [
          {
            "name": "v2.0",
            "releaseType": "release",
            "gameVersion": "1.20",
            "downloadUrl": "http://x/y.jar"
          }
        ]"#;
        let latest = latest_from_listing(json.as_bytes(), 7).unwrap();
        assert_eq!(latest.name, "v2.0");
        assert_eq!(latest.release_type, ReleaseType::Release);
        assert_eq!(latest.game_version, "1.20");
        assert_eq!(latest.download_url, "http://x/y.jar");
    }

    #[test]
    fn last_entry_wins() {
        let json = r#"
        [
          {"name": "v1.0", "releaseType": "beta", "gameVersion": "1.19", "downloadUrl": "http://x/a.jar"},
          {"name": "v1.1", "releaseType": "release", "gameVersion": "1.20", "downloadUrl": "http://x/b.jar"}
        ]"#;
        let latest = latest_from_listing(json.as_bytes(), 7).unwrap();
        assert_eq!(latest.name, "v1.1");
    }

    #[test]
    fn release_type_is_case_insensitive() {
        for raw in ["\"BETA\"", "\"Beta\"", "\"beta\""] {
            let parsed: ReleaseType = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, ReleaseType::Beta);
        }
        assert!(serde_json::from_str::<ReleaseType>("\"nightly\"").is_err());
    }

    #[test]
    fn empty_listing_is_no_files() {
        let err = latest_from_listing(b"[]", 42).unwrap_err();
        assert!(matches!(err, UpdateError::NoFiles(42)));
    }

    #[test]
    fn missing_field_is_a_json_error() {
        let json = r#"[{"name": "v1.0", "releaseType": "release", "gameVersion": "1.20"}]"#;
        let err = latest_from_listing(json.as_bytes(), 7).unwrap_err();
        assert!(matches!(err, UpdateError::Json(_)));
    }
}
