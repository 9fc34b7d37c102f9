//! Storage Adapters
//!
//! Implementations of the InstallationStore port for persisting workspace
//! installations.
//!
//! ## Available Adapters
//!
//! - **JsonFileInstallationStore** - Stores installations in one JSON file
//! - **InMemoryInstallationStore** - Stores installations in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryInstallationStore, JsonFileInstallationStore};
//!
//! // Production: file-based storage
//! let store = JsonFileInstallationStore::new("./data/installations.json");
//!
//! // Testing: in-memory storage
//! let store = InMemoryInstallationStore::new();
//! ```

mod in_memory_installation_store;
mod json_file_installation_store;

pub use in_memory_installation_store::InMemoryInstallationStore;
pub use json_file_installation_store::JsonFileInstallationStore;
