//! In-Memory Installation Store Adapter
//!
//! Keeps installation records in a map. Useful for testing and for
//! running without a configured storage path.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::TeamId;
use crate::ports::{InstallationStore, InstallationStoreError, TeamInstallation};

/// In-memory installation store.
#[derive(Debug, Clone)]
pub struct InMemoryInstallationStore {
    installations: Arc<RwLock<HashMap<TeamId, TeamInstallation>>>,
    fail_reads: bool,
}

impl InMemoryInstallationStore {
    pub fn new() -> Self {
        Self {
            installations: Arc::new(RwLock::new(HashMap::new())),
            fail_reads: false,
        }
    }

    /// A store whose reads always fail (useful for tests).
    pub fn failing() -> Self {
        Self {
            installations: Arc::new(RwLock::new(HashMap::new())),
            fail_reads: true,
        }
    }

    /// Seeds a record, bypassing the port (useful for tests).
    pub async fn seed(&self, installation: TeamInstallation) {
        self.installations
            .write()
            .await
            .insert(installation.team.clone(), installation);
    }

    /// Number of stored installations.
    pub async fn count(&self) -> usize {
        self.installations.read().await.len()
    }
}

impl Default for InMemoryInstallationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstallationStore for InMemoryInstallationStore {
    async fn list_known_teams(&self) -> Result<Vec<TeamInstallation>, InstallationStoreError> {
        if self.fail_reads {
            return Err(InstallationStoreError::ReadFailed(
                "installation store unavailable".to_string(),
            ));
        }
        Ok(self.installations.read().await.values().cloned().collect())
    }

    async fn record_installation(
        &self,
        installation: TeamInstallation,
    ) -> Result<(), InstallationStoreError> {
        self.installations
            .write()
            .await
            .insert(installation.team.clone(), installation);
        Ok(())
    }

    async fn find_by_team(
        &self,
        team: &TeamId,
    ) -> Result<Option<TeamInstallation>, InstallationStoreError> {
        if self.fail_reads {
            return Err(InstallationStoreError::ReadFailed(
                "installation store unavailable".to_string(),
            ));
        }
        Ok(self.installations.read().await.get(team).cloned())
    }
}
