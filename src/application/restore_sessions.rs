//! Startup session restore - reconnects every known workspace.
//!
//! The installation store is the source of truth for which workspaces
//! should be live. Restore runs the connection attempts concurrently,
//! each under its own timeout, so one unreachable workspace can neither
//! block the others nor stall startup.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::ports::{ChatTransport, InstallationStore, InstallationStoreError, TeamInstallation};

use super::session_registry::SessionRegistry;

/// Tally of one restore pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Sessions opened and registered.
    pub restored: usize,
    /// Records skipped: no bot session granted, or already registered.
    pub skipped: usize,
    /// Connection attempts that failed or timed out.
    pub failed: usize,
}

enum RestoreOutcome {
    Restored,
    Skipped,
    Failed,
}

/// Reconnects the workspaces recorded in the installation store.
pub struct RestoreSessionsHandler {
    store: Arc<dyn InstallationStore>,
    transport: Arc<dyn ChatTransport>,
    registry: Arc<SessionRegistry>,
    connect_timeout: Duration,
}

impl RestoreSessionsHandler {
    pub fn new(
        store: Arc<dyn InstallationStore>,
        transport: Arc<dyn ChatTransport>,
        registry: Arc<SessionRegistry>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            registry,
            connect_timeout,
        }
    }

    /// Restores every known workspace session.
    ///
    /// Individual connection failures are logged and tallied; they never
    /// abort the remaining restorations.
    ///
    /// # Errors
    ///
    /// Returns the store error when the installation list itself cannot
    /// be read. Without that list the process has nothing to restore
    /// from, so callers treat this as fatal.
    pub async fn handle(&self) -> Result<RestoreReport, InstallationStoreError> {
        let installations = self.store.list_known_teams().await?;
        info!(teams = installations.len(), "restoring known workspace sessions");

        let attempts = installations
            .into_iter()
            .map(|installation| self.restore_one(installation));
        let outcomes = futures::future::join_all(attempts).await;

        let mut report = RestoreReport::default();
        for outcome in outcomes {
            match outcome {
                RestoreOutcome::Restored => report.restored += 1,
                RestoreOutcome::Skipped => report.skipped += 1,
                RestoreOutcome::Failed => report.failed += 1,
            }
        }
        info!(
            restored = report.restored,
            skipped = report.skipped,
            failed = report.failed,
            "session restore finished"
        );
        Ok(report)
    }

    async fn restore_one(&self, installation: TeamInstallation) -> RestoreOutcome {
        if !installation.had_active_bot {
            debug!(team = %installation.team, "skipping installation without a bot session");
            return RestoreOutcome::Skipped;
        }

        let connect = self.transport.open_connection(&installation.credential);
        let handle = match timeout(self.connect_timeout, connect).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(err)) => {
                error!(team = %installation.team, error = %err, "failed to restore session");
                return RestoreOutcome::Failed;
            }
            Err(_) => {
                error!(
                    team = %installation.team,
                    timeout_secs = self.connect_timeout.as_secs(),
                    "timed out restoring session"
                );
                return RestoreOutcome::Failed;
            }
        };

        if self.registry.register(handle).await {
            info!(team = %installation.team, "session restored");
            RestoreOutcome::Restored
        } else {
            debug!(team = %installation.team, "session already registered");
            RestoreOutcome::Skipped
        }
    }
}
