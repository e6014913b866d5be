// ── Passkey domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;

/// A registered WebAuthn credential on the current user's account.
/// Managed (listed/deleted) from the account settings view; enrollment
/// itself happens through the browser's WebAuthn ceremony, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passkey {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted: bool,
}

impl Passkey {
    /// Serialize the server-writable subset (the display name only).
    pub fn write_payload(&self) -> Value {
        json!({ "name": self.name })
    }
}

impl Identified for Passkey {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_payload_sends_only_the_display_name() {
        let passkey: Passkey = serde_json::from_value(json!({
            "id": "p1",
            "name": "yubikey",
            "lastUsed": "2024-03-01T10:00:00Z",
            "createdAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        let payload = passkey.write_payload();
        assert_eq!(payload["name"], "yubikey");
        assert_eq!(payload.as_object().unwrap().len(), 1);
    }
}
