//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ChatTransport` - Sending to and connecting with the messaging platform
//! - `InstallationStore` - Persistence for workspace installations

mod chat_transport;
mod installation_store;

pub use chat_transport::{ChatTransport, ConnectionHandle, TransportError, TransportEvent};
pub use installation_store::{InstallationStore, InstallationStoreError, TeamInstallation};
