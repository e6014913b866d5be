// ── Resource store modules ──
//
// One independent state container per remote resource collection. Each
// module wraps the shared `RegistryClient`, tracks a request-lifecycle
// status, and reconciles a local cache against server mutations through
// merge-by-identity upserts. Operations are thin pass-throughs: they
// flip the status flag as a side effect and reject with the original
// transport error, unwrapped.

pub mod cache;
pub mod collections;
pub mod containers;
pub mod entities;
pub mod groups;
pub mod images;
pub mod ldap;
pub mod manifests;
pub mod passkeys;
pub mod search;
pub mod status;
pub mod tokens;
pub mod users;

pub use cache::{ResourceCache, SingleCache};
pub use collections::Collections;
pub use containers::Containers;
pub use entities::Entities;
pub use groups::Groups;
pub use images::Images;
pub use ldap::Ldap;
pub use manifests::Manifests;
pub use passkeys::Passkeys;
pub use search::Search;
pub use status::ResourceStatus;
pub use tokens::Tokens;
pub use users::Users;

use futures_util::future::BoxFuture;
use stowage_api::Error;

/// Capability for resolving a collection's natural key to its opaque
/// id. Injected into [`Containers`] at construction so that creating a
/// container from denormalized names doesn't couple the containers
/// module to a concrete collections implementation.
pub trait ResolveCollection: Send + Sync {
    /// Resolve `entity/name` to the collection's id.
    fn resolve<'a>(&'a self, entity: &'a str, name: &'a str)
    -> BoxFuture<'a, Result<String, Error>>;
}
