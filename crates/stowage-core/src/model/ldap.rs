// ── LDAP status (admin view) ──

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Directory-sync status reported by the admin endpoint. Read-only;
/// no identity, so it is cached as a single record rather than a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapStatus {
    #[serde(default)]
    pub status: Option<String>,
    /// Sanitized server-side configuration (host, base DN, ...).
    #[serde(default)]
    pub config: Value,
}
