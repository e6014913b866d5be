// stowage-api: Async Rust client for the Stowage registry HTTP API

pub mod client;
pub mod error;
pub mod transport;

pub use client::{FailureInterceptor, RegistryClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
