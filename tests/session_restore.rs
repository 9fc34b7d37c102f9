//! Integration tests for startup session restore and installation flow.
//!
//! These tests verify the end-to-end lifecycle of workspace sessions:
//! 1. Stored installations are replayed into live sessions at startup
//! 2. Bad or hung credentials are tallied without blocking the rest
//! 3. Restored sessions immediately serve conversations
//! 4. New installations connect, register, and greet the installer

use std::sync::Arc;
use std::time::Duration;

use namesmith::adapters::chat::ConnectScript;
use namesmith::adapters::{InMemoryChatTransport, InMemoryInstallationStore, JsonFileInstallationStore};
use namesmith::application::{
    ConnectionEventRouter, ConversationDirectory, RestoreSessionsHandler, SessionRegistry,
    INSTALL_GREETING,
};
use namesmith::domain::dialog::{DialogPolicy, OPENING_LINE};
use namesmith::domain::foundation::{ChannelId, Credential, TeamId, UserId};
use namesmith::domain::messaging::{AddressKind, InboundMessage, TriggerVocabulary};
use namesmith::ports::{ChatTransport, InstallationStore, TeamInstallation, TransportEvent};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct ServiceFixture {
    store: Arc<InMemoryInstallationStore>,
    transport: Arc<InMemoryChatTransport>,
    registry: Arc<SessionRegistry>,
    directory: Arc<ConversationDirectory>,
    router: ConnectionEventRouter,
}

fn service() -> ServiceFixture {
    let store = Arc::new(InMemoryInstallationStore::new());
    let transport = Arc::new(InMemoryChatTransport::new());
    let registry = Arc::new(SessionRegistry::new());
    let directory = Arc::new(ConversationDirectory::new());
    let router = ConnectionEventRouter::new(
        Arc::clone(&registry),
        Arc::clone(&directory),
        Arc::clone(&transport) as Arc<dyn ChatTransport>,
        TriggerVocabulary::default(),
        DialogPolicy::default(),
    );
    ServiceFixture {
        store,
        transport,
        registry,
        directory,
        router,
    }
}

impl ServiceFixture {
    fn restore_handler(&self, timeout: Duration) -> RestoreSessionsHandler {
        RestoreSessionsHandler::new(
            Arc::clone(&self.store) as Arc<dyn InstallationStore>,
            Arc::clone(&self.transport) as Arc<dyn ChatTransport>,
            Arc::clone(&self.registry),
            timeout,
        )
    }

    async fn seed_workspace(&self, team: &str, token: &str, has_bot: bool) -> Credential {
        let credential = Credential::new(token).unwrap();
        self.store
            .seed(TeamInstallation {
                team: TeamId::new(team).unwrap(),
                credential: credential.clone(),
                installer: UserId::new("U-OWNER").unwrap(),
                had_active_bot: has_bot,
            })
            .await;
        credential
    }

    async fn accept(&self, credential: &Credential, team: &str) {
        self.transport
            .script_connect(
                credential.clone(),
                ConnectScript::Accept {
                    team: TeamId::new(team).unwrap(),
                    bot_user: UserId::new("U-BOT").unwrap(),
                },
            )
            .await;
    }
}

async fn wait_for_messages(transport: &InMemoryChatTransport, at_least: usize) {
    for _ in 0..200 {
        if transport.sent().await.len() >= at_least {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("transport never saw {at_least} messages");
}

const TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Startup restore
// =============================================================================

#[tokio::test]
async fn restores_every_stored_workspace_with_a_bot_session() {
    let service = service();
    let one = service.seed_workspace("T1", "xoxb-one", true).await;
    let two = service.seed_workspace("T2", "xoxb-two", true).await;
    let dormant = service.seed_workspace("T3", "xoxb-three", false).await;
    service.accept(&one, "T1").await;
    service.accept(&two, "T2").await;

    let report = service.restore_handler(TIMEOUT).handle().await.unwrap();

    assert_eq!(report.restored, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert!(service.registry.is_registered(&one).await);
    assert!(service.registry.is_registered(&two).await);
    assert!(!service.registry.is_registered(&dormant).await);
    assert_eq!(service.transport.connect_attempts().await, 2);
}

#[tokio::test]
async fn one_bad_credential_does_not_block_the_others() {
    let service = service();
    let good = service.seed_workspace("T1", "xoxb-good", true).await;
    let bad = service.seed_workspace("T2", "xoxb-bad", true).await;
    service.accept(&good, "T1").await;
    service
        .transport
        .script_connect(bad.clone(), ConnectScript::Reject("invalid_auth".to_string()))
        .await;

    let report = service.restore_handler(TIMEOUT).handle().await.unwrap();

    assert_eq!(report.restored, 1);
    assert_eq!(report.failed, 1);
    assert!(service.registry.is_registered(&good).await);
    assert!(!service.registry.is_registered(&bad).await);
}

#[tokio::test]
async fn hung_connection_is_bounded_by_the_timeout() {
    let service = service();
    let hung = service.seed_workspace("T1", "xoxb-hung", true).await;
    service
        .transport
        .script_connect(hung.clone(), ConnectScript::Hang)
        .await;

    let report = service
        .restore_handler(Duration::from_millis(50))
        .handle()
        .await
        .unwrap();

    assert_eq!(report.restored, 0);
    assert_eq!(report.failed, 1);
    assert!(!service.registry.is_registered(&hung).await);
}

#[tokio::test]
async fn restored_session_serves_conversations_immediately() {
    let service = service();
    let credential = service.seed_workspace("T1", "xoxb-live", true).await;
    service.accept(&credential, "T1").await;
    service.restore_handler(TIMEOUT).handle().await.unwrap();

    service
        .router
        .handle_event(TransportEvent::Inbound(InboundMessage {
            credential: credential.clone(),
            channel: ChannelId::new("D1").unwrap(),
            user: UserId::new("U1").unwrap(),
            text: "hi".to_string(),
            address: AddressKind::DirectMessage,
        }))
        .await;
    wait_for_messages(&service.transport, 2).await;

    let sent = service.transport.sent().await;
    assert_eq!(sent[0].text(), OPENING_LINE);
    assert_eq!(service.directory.count().await, 1);
}

// =============================================================================
// New installations
// =============================================================================

#[tokio::test]
async fn new_installation_connects_registers_and_greets_the_installer() {
    let service = service();
    let credential = Credential::new("xoxb-new").unwrap();
    service.accept(&credential, "T-NEW").await;

    service
        .router
        .handle_event(TransportEvent::NewInstallation {
            team: TeamId::new("T-NEW").unwrap(),
            credential: credential.clone(),
            installer: UserId::new("U-OWNER").unwrap(),
        })
        .await;

    assert!(service.registry.is_registered(&credential).await);
    wait_for_messages(&service.transport, 1).await;
    assert_eq!(service.transport.count_containing(INSTALL_GREETING).await, 1);

    // The greeting goes to the installer's direct channel
    let dm = ChannelId::new("DU-OWNER").unwrap();
    let to_installer = service.transport.sent_to(&dm).await;
    assert_eq!(to_installer.len(), 1);
}

#[tokio::test]
async fn repeated_installation_event_is_idempotent() {
    let service = service();
    let credential = Credential::new("xoxb-new").unwrap();
    service.accept(&credential, "T-NEW").await;

    let event = TransportEvent::NewInstallation {
        team: TeamId::new("T-NEW").unwrap(),
        credential: credential.clone(),
        installer: UserId::new("U-OWNER").unwrap(),
    };
    service.router.handle_event(event.clone()).await;
    service.router.handle_event(event).await;

    assert_eq!(service.transport.connect_attempts().await, 1);
    assert_eq!(service.transport.count_containing(INSTALL_GREETING).await, 1);
}

// =============================================================================
// Persistence across restarts
// =============================================================================

#[tokio::test]
async fn installations_survive_a_process_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("installations.json");
    let credential = Credential::new("xoxb-durable").unwrap();

    // First process records the installation
    {
        let store = JsonFileInstallationStore::new(&path);
        store
            .record_installation(TeamInstallation {
                team: TeamId::new("T1").unwrap(),
                credential: credential.clone(),
                installer: UserId::new("U-OWNER").unwrap(),
                had_active_bot: true,
            })
            .await
            .unwrap();
    }

    // Second process restores from the same file
    let store: Arc<dyn InstallationStore> = Arc::new(JsonFileInstallationStore::new(&path));
    let transport = Arc::new(InMemoryChatTransport::new());
    let registry = Arc::new(SessionRegistry::new());
    transport
        .script_connect(
            credential.clone(),
            ConnectScript::Accept {
                team: TeamId::new("T1").unwrap(),
                bot_user: UserId::new("U-BOT").unwrap(),
            },
        )
        .await;

    let handler = RestoreSessionsHandler::new(
        store,
        Arc::clone(&transport) as Arc<dyn ChatTransport>,
        Arc::clone(&registry),
        TIMEOUT,
    );
    let report = handler.handle().await.unwrap();

    assert_eq!(report.restored, 1);
    assert!(registry.is_registered(&credential).await);
}
