// ── Token domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;
use super::user::User;

/// An API token belonging to a user (explicit or defaulted to the
/// current session user by the addressing path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    /// The opaque token value. Only returned in full on creation.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub user: Option<User>,

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

impl Token {
    /// Serialize the server-writable subset of this record. The token
    /// value itself is server-generated and never sent.
    pub fn write_payload(&self) -> Value {
        json!({
            "comment": self.comment,
            "expiresAt": self.expires_at,
        })
    }
}

impl Identified for Token {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_payload_never_sends_token_value() {
        let token: Token = serde_json::from_value(json!({
            "id": "t1",
            "token": "geheim",
            "comment": "eins",
        }))
        .unwrap();

        let payload = token.write_payload();
        assert_eq!(payload["comment"], "eins");
        assert!(payload.get("token").is_none());
        assert!(payload.get("id").is_none());
    }
}
