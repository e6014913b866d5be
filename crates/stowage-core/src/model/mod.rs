// ── Domain model ──
//
// Typed records mirroring the registry's wire representation. Decoding
// is schema-validated serde deserialization through the typed client
// verbs; encoding goes through each record's `write_payload`, which
// emits only the server-writable allowlist for that record kind.
// Server-owned fields (id, timestamps, denormalized names, counts)
// never round-trip back to the server.

pub mod collection;
pub mod container;
pub mod entity;
pub mod group;
pub mod image;
pub mod ldap;
pub mod manifest;
pub mod passkey;
pub mod search;
pub mod token;
pub mod user;

pub use collection::Collection;
pub use container::{Container, LatestContainer};
pub use entity::Entity;
pub use group::{Group, GroupMember};
pub use image::Image;
pub use ldap::LdapStatus;
pub use manifest::Manifest;
pub use passkey::Passkey;
pub use search::SearchResults;
pub use token::Token;
pub use user::User;

/// Anything stored in a [`ResourceCache`](crate::store::ResourceCache):
/// carries the server-assigned opaque identity used for upsert/remove
/// reconciliation.
pub trait Identified {
    fn id(&self) -> &str;
}
