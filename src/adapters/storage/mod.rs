//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Sessions in a process-local map
//!
//! ## Usage
//!
//! ```ignore
//! use review_collector::adapters::storage::InMemorySessionStore;
//!
//! let store = InMemorySessionStore::new();
//! ```

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
