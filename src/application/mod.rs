//! Application layer - session lifecycle and conversation orchestration.
//!
//! This layer owns the live state the domain deliberately does not:
//! which workspace sessions are connected, which conversations are in
//! flight, and how transport events reach them. All event routing runs
//! on a single consumer loop; per-conversation work happens in spawned
//! runner tasks fed strictly in arrival order.

mod conversation_directory;
mod conversation_runner;
mod event_router;
mod restore_sessions;
mod session_registry;

pub use conversation_directory::{ConversationDirectory, ConversationKey};
pub use conversation_runner::run_conversation;
pub use event_router::{ConnectionEventRouter, INSTALL_GREETING};
pub use restore_sessions::{RestoreReport, RestoreSessionsHandler};
pub use session_registry::SessionRegistry;
