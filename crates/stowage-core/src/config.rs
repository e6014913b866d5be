// ── Runtime connection configuration ──
//
// Describes *how* to reach a registry. The embedding application
// constructs a `RegistryConfig` and hands it in -- this crate never
// reads config files itself.

use std::time::Duration;

use url::Url;

use stowage_api::transport::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default -- registries normally carry
    /// publicly trusted certificates.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development registries).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry root URL (e.g., `https://registry.example.org`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl RegistryConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Lower this config into the transport settings used to build the
    /// HTTP client.
    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
