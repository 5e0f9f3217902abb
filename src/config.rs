//! Checker configuration and the legacy external override file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::warn;

/// Default catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.curseforge.com";
/// Minimum interval between remote catalog queries.
pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(3 * 60 * 60);

/// Configuration for one managed artifact, rebuilt at startup.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Catalog project identifier.
    pub project_id: u32,
    /// Version string of the currently installed artifact.
    pub current_version: String,
    /// Whether update checking is turned on.
    pub enabled: bool,
    /// Optional catalog API key, sent as `X-API-Key`.
    pub api_key: Option<String>,
    /// Catalog endpoint; overridable for tests.
    pub base_url: String,
    /// Minimum interval between catalog queries.
    pub cache_window: Duration,
    /// Directory the downloaded artifact is staged into.
    pub staging_dir: PathBuf,
    /// File name of the staged artifact.
    pub artifact_file_name: String,
}

impl UpdaterConfig {
    pub fn new(
        project_id: u32,
        current_version: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
        artifact_file_name: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            current_version: current_version.into(),
            enabled: true,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_window: DEFAULT_CACHE_WINDOW,
            staging_dir: staging_dir.into(),
            artifact_file_name: artifact_file_name.into(),
        }
    }

    /// Apply the external updater override file if one exists.
    ///
    /// Some hosts run a shared updater that drops `Updater/config.yml` next
    /// to the plugin directories. When present, its `api-key` replaces any
    /// configured key and its `disable` flag decides whether checking is on.
    pub fn apply_legacy_override(&mut self, server_root: &Path) {
        let path = server_root.join("Updater").join("config.yml");
        let Some(overrides) = LegacyOverride::load(&path) else {
            return;
        };
        self.api_key = overrides.api_key;
        self.enabled = !overrides.disable;
    }
}

#[derive(Debug, Deserialize)]
struct LegacyOverride {
    #[serde(rename = "api-key")]
    api_key: Option<String>,
    #[serde(default)]
    disable: bool,
}

impl LegacyOverride {
    fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read updater override");
                return None;
            }
        };
        match serde_yaml::from_str(&text) {
            Ok(overrides) => Some(overrides),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to parse updater override");
                None
            }
        }
    }
}
