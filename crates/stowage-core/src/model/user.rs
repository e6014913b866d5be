// ── User domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;
use super::group::Group;

/// A registry account.
///
/// `username` is the natural key used in write paths and routes; `id`
/// is the opaque server identity used for cache reconciliation.
/// `groups` is populated only when the server was explicitly asked to
/// embed memberships -- absent otherwise, never defaulted to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_active: bool,
    /// Origin of the account ("local", "ldap", ...).
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub groups: Option<Vec<Group>>,

    // Audit fields -- server-owned.
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

impl User {
    /// Serialize the server-writable subset of this record.
    ///
    /// With `unroll`, embedded group memberships are serialized
    /// recursively; without it they are omitted entirely.
    pub fn write_payload(&self, unroll: bool) -> Value {
        let mut payload = json!({
            "username": self.username,
            "email": self.email,
            "firstname": self.firstname,
            "lastname": self.lastname,
            "isAdmin": self.is_admin,
            "isActive": self.is_active,
            "source": self.source,
        });
        if unroll {
            if let Some(groups) = &self.groups {
                payload["groups"] = Value::Array(
                    groups.iter().map(|g| g.write_payload(true)).collect(),
                );
            }
        }
        payload
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_parses_dates_and_leaves_absent_groups_unset() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "username": "test.hase",
            "email": "hase@testha.se",
            "isAdmin": true,
            "createdAt": "2021-03-04T05:06:07Z",
            "deletedAt": null,
        }))
        .unwrap();

        assert_eq!(user.username, "test.hase");
        assert!(user.is_admin);
        assert!(!user.is_active);
        assert!(user.created_at.is_some());
        assert_eq!(user.deleted_at, None);
        assert_eq!(user.groups, None);
    }

    #[test]
    fn write_payload_never_leaks_server_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "username": "test.hase",
            "createdAt": "2021-03-04T05:06:07Z",
        }))
        .unwrap();

        let payload = user.write_payload(false);
        assert_eq!(payload["username"], "test.hase");
        assert!(payload.get("id").is_none());
        assert!(payload.get("createdAt").is_none());
        assert!(payload.get("groups").is_none());
    }

    #[test]
    fn write_payload_unrolls_groups() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "username": "test.hase",
            "groups": [{ "id": "g1", "name": "testhasenstall" }],
        }))
        .unwrap();

        let payload = user.write_payload(true);
        assert_eq!(payload["groups"][0]["name"], "testhasenstall");
        assert!(payload["groups"][0].get("id").is_none());
    }
}
