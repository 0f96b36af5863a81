//! Backend seams and the bundled in-process implementation.
//!
//! The console core never names a concrete service. It holds
//! `Arc<dyn IdentityProvider>` for authentication and
//! `Arc<dyn DocumentStore>` for data, which keeps a hosted deployment and
//! the bundled [`MemoryBackend`] interchangeable.

pub mod documents;
pub mod identity;
pub mod memory;

pub use documents::{Document, DocumentStore, StoreError};
pub use identity::{AuthError, Credential, IdentityProvider};
pub use memory::MemoryBackend;

/// Collection names shared by every component.
pub mod collections {
    pub const USERS: &str = "users";
    pub const BUSES: &str = "buses";
    pub const BUS_TYPES: &str = "busTypes";
    pub const CONTACT_MESSAGES: &str = "contactMessages";

    /// All collections, in display order for status output.
    pub const ALL: [&str; 4] = [USERS, BUSES, BUS_TYPES, CONTACT_MESSAGES];
}
