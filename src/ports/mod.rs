//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue core and the outside world. Adapters implement these ports.
//!
//! - `BusinessProfileLookup` - Authorization and questionnaire data per user
//! - `GenerationClient` - Review text generation
//! - `SessionStore` - Active dialogue sessions keyed by user

mod business_profile_lookup;
mod generation_client;
mod session_store;

pub use business_profile_lookup::{BusinessProfileLookup, ProfileLookupError};
pub use generation_client::{GenerationClient, GenerationError};
pub use session_store::{SessionStore, SessionStoreError};
