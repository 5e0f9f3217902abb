//! Update polling state machine.

use std::time::Instant;

use tracing::{info, warn};

use crate::catalog::{ReleaseCatalogClient, ReleaseInfo};
use crate::changelog::{self, ChangelogDocument};
use crate::config::UpdaterConfig;
use crate::download;
use crate::version::{LegacyDigitComparator, VersionComparator};

/// Current position of the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Checking turned off by configuration; never touches the network.
    Disabled,
    /// No check performed yet.
    Idle,
    /// A catalog fetch is in flight.
    Checking,
    /// Last check found nothing newer, or failed and fell back to "no update".
    UpToDate,
    /// A newer release is known and can be downloaded.
    UpdateAvailable,
}

/// Owns all mutable update state for one managed artifact.
///
/// Calls are expected from a single control thread; both entry points take
/// `&mut self`, so concurrent use requires external serialization.
pub struct UpdateChecker {
    config: UpdaterConfig,
    catalog: ReleaseCatalogClient,
    comparator: Box<dyn VersionComparator>,
    state: CheckState,
    deadline: Option<Instant>,
    latest: Option<ReleaseInfo>,
    outdated: bool,
    changelog: Option<ChangelogDocument>,
}

impl UpdateChecker {
    /// Build a checker using the legacy digit comparator.
    pub fn new(config: UpdaterConfig) -> Self {
        Self::with_comparator(config, Box::new(LegacyDigitComparator))
    }

    /// Build a checker with a custom version ordering.
    pub fn with_comparator(config: UpdaterConfig, comparator: Box<dyn VersionComparator>) -> Self {
        let catalog = ReleaseCatalogClient::new(
            config.base_url.clone(),
            config.project_id,
            config.api_key.clone(),
        );
        let state = if config.enabled {
            CheckState::Idle
        } else {
            CheckState::Disabled
        };
        Self {
            config,
            catalog,
            comparator,
            state,
            deadline: None,
            latest: None,
            outdated: false,
            changelog: None,
        }
    }

    /// Report whether a newer release is available, refreshing from the
    /// catalog when the cache window has elapsed.
    ///
    /// Fetch failures are absorbed: the checker logs them and answers "no
    /// update" for the rest of the cache window.
    pub fn has_update(&mut self) -> bool {
        if self.state == CheckState::Disabled {
            return false;
        }
        let now = Instant::now();
        let due = self.deadline.is_none_or(|deadline| now >= deadline);
        if due {
            // Advance the deadline before fetching so a slow or failing
            // fetch cannot trigger immediate re-fetch storms.
            self.deadline = Some(now + self.config.cache_window);
            self.refresh();
        }
        self.state == CheckState::UpdateAvailable
    }

    fn refresh(&mut self) {
        self.state = CheckState::Checking;
        match self.catalog.fetch_latest() {
            Ok(release) => {
                self.outdated = self
                    .comparator
                    .is_newer(&self.config.current_version, &release.name);
                self.state = if self.outdated {
                    CheckState::UpdateAvailable
                } else {
                    CheckState::UpToDate
                };
                self.latest = Some(release);
            }
            Err(err) => {
                warn!(
                    project = self.config.project_id,
                    error = %err,
                    "Update check failed"
                );
                self.outdated = false;
                self.state = CheckState::UpToDate;
            }
        }
    }

    /// Download the known newer release into the staging directory.
    ///
    /// On success the current version advances to the downloaded release and
    /// further prompts for it are suppressed; the bundled changelog is read
    /// best-effort from the staged artifact. On failure the update state is
    /// left untouched and the error text is returned for the host to report.
    pub fn download_update(&mut self) -> Result<(), String> {
        if self.state != CheckState::UpdateAvailable {
            return Err("no update available to download".to_string());
        }
        let Some(release) = self.latest.clone() else {
            return Err("no update available to download".to_string());
        };
        info!(release = %release.name, "Downloading update");
        let staged = download::download_artifact(
            &release.download_url,
            &self.config.staging_dir,
            &self.config.artifact_file_name,
        )
        .map_err(|err| err.to_string())?;

        self.config.current_version = release.name.clone();
        self.outdated = false;
        self.state = CheckState::UpToDate;
        self.changelog = changelog::read_changelog(&staged, &release.name);
        info!(path = %staged.display(), "Download complete");
        Ok(())
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn current_version(&self) -> &str {
        &self.config.current_version
    }

    pub fn latest_release(&self) -> Option<&ReleaseInfo> {
        self.latest.as_ref()
    }

    pub fn changelog(&self) -> Option<&ChangelogDocument> {
        self.changelog.as_ref()
    }
}
