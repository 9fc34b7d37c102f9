//! Namesmith service entry point.
//!
//! Boots the bot end to end: loads configuration, restores sessions for
//! every stored workspace installation, starts the single event consumer
//! loop, and serves the webhook endpoints until shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use namesmith::adapters::{
    slack_webhook_router, InMemoryInstallationStore, JsonFileInstallationStore, SlackChatTransport,
    SlackRequestVerifier, SlackTransportConfig, SlackWebhookState,
};
use namesmith::application::{
    ConnectionEventRouter, ConversationDirectory, RestoreSessionsHandler, SessionRegistry,
};
use namesmith::config::AppConfig;
use namesmith::domain::dialog::DialogPolicy;
use namesmith::domain::messaging::TriggerVocabulary;
use namesmith::ports::{ChatTransport, InstallationStore, TransportEvent};

/// Backpressure bound on the webhook-to-consumer event queue.
const EVENT_QUEUE_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    config.validate().context("invalid configuration")?;
    info!(environment = ?config.server.environment, "starting namesmith");

    // Installation persistence
    let store: Arc<dyn InstallationStore> = match &config.storage.installations_path {
        Some(path) => {
            info!(path = %path.display(), "using JSON file installation store");
            Arc::new(JsonFileInstallationStore::new(path))
        }
        None => {
            info!("using in-memory installation store; installations will not survive restarts");
            Arc::new(InMemoryInstallationStore::new())
        }
    };

    // Slack Web API transport
    let transport_config = SlackTransportConfig::new()
        .with_api_base_url(&config.slack.api_base_url)
        .with_timeout(Duration::from_secs(config.server.request_timeout_secs));
    let transport: Arc<dyn ChatTransport> = Arc::new(SlackChatTransport::new(transport_config));

    // Application state
    let registry = Arc::new(SessionRegistry::new());
    let directory = Arc::new(ConversationDirectory::new());
    let policy = DialogPolicy {
        reject_empty_filename: config.dialog.reject_empty_filename,
    };
    let event_router = ConnectionEventRouter::new(
        registry.clone(),
        directory.clone(),
        transport.clone(),
        TriggerVocabulary::default(),
        policy,
    );

    // Single consumer loop: events are handled in arrival order
    let (event_tx, mut event_rx) = mpsc::channel::<TransportEvent>(EVENT_QUEUE_CAPACITY);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            event_router.handle_event(event).await;
        }
    });

    // Reconnect every workspace that previously had a live session. A
    // store that cannot even be listed is fatal; individual workspace
    // failures are tallied and logged by the handler.
    let restore = RestoreSessionsHandler::new(
        store.clone(),
        transport.clone(),
        registry.clone(),
        config.restore.connect_timeout(),
    );
    restore
        .handle()
        .await
        .context("failed to read stored installations")?;

    // Webhook surface
    let verifier = config
        .slack
        .signing_secret
        .as_ref()
        .map(|secret| Arc::new(SlackRequestVerifier::new(secret.expose_secret().clone())));
    if verifier.is_none() {
        info!("request signature verification disabled");
    }
    let webhook_state = SlackWebhookState::new(
        event_tx.clone(),
        store.clone(),
        verifier,
        config.slack.client_secret.clone(),
    );
    let app = slack_webhook_router()
        .with_state(webhook_state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config
        .server
        .socket_addr()
        .context("invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
