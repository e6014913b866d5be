//! Core state layer for the Stowage registry client.
//!
//! [`Registry`] is the entry point: construct one with a
//! [`RegistryConfig`] and a [`CredentialStore`], then drive the
//! per-resource store modules it exposes. Each module owns a local
//! cache reconciled against server responses, and broadcasts its
//! request-lifecycle [`ResourceStatus`] over a watch channel so UIs can
//! render spinners and error banners without polling.
//!
//! ```no_run
//! use std::sync::Arc;
//! use secrecy::SecretString;
//! use stowage_core::{MemoryCredentialStore, Registry, RegistryConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig::new("https://registry.example.org".parse()?);
//! let registry = Registry::new(&config, Arc::new(MemoryCredentialStore::new()))?;
//!
//! registry.login("admin", &SecretString::from("hunter2".to_owned())).await?;
//! registry.entities().list().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod model;
pub mod session;
pub mod store;

pub use config::{RegistryConfig, TlsVerification};
pub use session::persist::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, PersistedSession,
};
pub use session::{DownloadGrant, Registry};
pub use store::ResourceStatus;

pub use stowage_api::Error;
