//! Update-check and artifact-staging library for an installed plugin jar.
//!
//! The host constructs an [`UpdateChecker`] per managed artifact and drives it
//! from a single control thread: [`UpdateChecker::has_update`] polls the
//! remote catalog behind a cache window, [`UpdateChecker::download_update`]
//! stages the new artifact and pulls its bundled changelog. Rendering the
//! changelog and installing the staged file are the host's concern.

mod catalog;
mod changelog;
mod checker;
mod config;
mod download;
mod http_client;
mod version;

pub use catalog::{ReleaseCatalogClient, ReleaseInfo, ReleaseType};
pub use changelog::{ChangelogDocument, read_changelog};
pub use checker::{CheckState, UpdateChecker};
pub use config::UpdaterConfig;
pub use download::download_artifact;
pub use version::{LegacyDigitComparator, SemverComparator, VersionComparator};

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("No files listed for project {0}")]
    NoFiles(u32),
}
