//! JSON-file implementation of the installation store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::foundation::TeamId;
use crate::ports::{InstallationStore, InstallationStoreError, TeamInstallation};

/// Installation store backed by a single JSON file.
///
/// The file holds one JSON object keyed by team id. Every mutation rereads,
/// modifies, and rewrites the whole file under an internal lock; install
/// traffic is rare enough that this never matters.
#[derive(Debug)]
pub struct JsonFileInstallationStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileInstallationStore {
    /// Creates a store persisting to the given file path.
    ///
    /// The file does not need to exist yet; a missing file reads as an
    /// empty store and is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, TeamInstallation>, InstallationStoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                InstallationStoreError::ReadFailed(format!("{}: {}", self.path.display(), err))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(InstallationStoreError::ReadFailed(format!(
                "{}: {}",
                self.path.display(),
                err
            ))),
        }
    }

    async fn persist(
        &self,
        installations: &BTreeMap<String, TeamInstallation>,
        team: &TeamId,
    ) -> Result<(), InstallationStoreError> {
        let write_failed = |reason: String| InstallationStoreError::WriteFailed {
            team: team.to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| write_failed(err.to_string()))?;
            }
        }

        let bytes =
            serde_json::to_vec_pretty(installations).map_err(|err| write_failed(err.to_string()))?;
        fs::write(&self.path, bytes)
            .await
            .map_err(|err| write_failed(err.to_string()))
    }
}

#[async_trait]
impl InstallationStore for JsonFileInstallationStore {
    async fn list_known_teams(&self) -> Result<Vec<TeamInstallation>, InstallationStoreError> {
        Ok(self.load().await?.into_values().collect())
    }

    async fn record_installation(
        &self,
        installation: TeamInstallation,
    ) -> Result<(), InstallationStoreError> {
        let _guard = self.write_lock.lock().await;

        let mut installations = self.load().await?;
        let team = installation.team.clone();
        installations.insert(team.as_str().to_string(), installation);
        self.persist(&installations, &team).await?;

        debug!(%team, path = %self.path.display(), "recorded installation");
        Ok(())
    }

    async fn find_by_team(
        &self,
        team: &TeamId,
    ) -> Result<Option<TeamInstallation>, InstallationStoreError> {
        Ok(self.load().await?.remove(team.as_str()))
    }
}
