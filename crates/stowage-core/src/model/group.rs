// ── Group domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;
use super::user::User;

/// A membership entry relating a [`User`] to a [`Group`] with role
/// metadata. Carried inside `Group::members` when the server embeds
/// the relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user: User,
    #[serde(default)]
    pub role: Option<String>,
}

impl GroupMember {
    /// Serialize for the bulk membership-replace endpoint. The user is
    /// always unrolled -- the server matches members by username.
    pub fn write_payload(&self) -> Value {
        json!({
            "user": self.user.write_payload(true),
            "role": self.role,
        })
    }
}

/// A named account group. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Present only when the server embedded the membership relation.
    #[serde(default)]
    pub members: Option<Vec<GroupMember>>,

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

impl Group {
    /// Serialize the server-writable subset of this record.
    pub fn write_payload(&self, unroll: bool) -> Value {
        let mut payload = json!({
            "name": self.name,
            "email": self.email,
        });
        if unroll {
            if let Some(members) = &self.members {
                payload["members"] =
                    Value::Array(members.iter().map(GroupMember::write_payload).collect());
            }
        }
        payload
    }
}

impl Identified for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_embeds_members_only_when_present() {
        let group: Group = serde_json::from_value(json!({
            "id": "g1",
            "name": "testhasenstall",
            "members": [
                { "user": { "id": "u1", "username": "test.hase" }, "role": "admin" }
            ],
        }))
        .unwrap();

        let members = group.members.as_ref().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.username, "test.hase");
        assert_eq!(members[0].role.as_deref(), Some("admin"));

        let bare: Group =
            serde_json::from_value(json!({ "id": "g2", "name": "leer" })).unwrap();
        assert!(bare.members.is_none());
    }

    #[test]
    fn write_payload_omits_members_unless_unrolled() {
        let group: Group = serde_json::from_value(json!({
            "id": "g1",
            "name": "testhasenstall",
            "members": [
                { "user": { "id": "u1", "username": "test.hase" }, "role": "admin" }
            ],
        }))
        .unwrap();

        assert!(group.write_payload(false).get("members").is_none());
        let unrolled = group.write_payload(true);
        assert_eq!(unrolled["members"][0]["role"], "admin");
        assert_eq!(unrolled["members"][0]["user"]["username"], "test.hase");
    }
}
