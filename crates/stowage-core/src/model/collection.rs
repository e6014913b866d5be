// ── Collection domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;

/// A collection of containers owned by exactly one entity.
///
/// `entity` holds the owning entity's opaque id; `entity_name` is a
/// read-only denormalized projection for display and path building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    /// Owning entity id (foreign key).
    #[serde(default)]
    pub entity: Option<String>,
    /// Denormalized owning entity name -- never written back.
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_data: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub size: Option<u64>,

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

impl Collection {
    /// Serialize the server-writable subset of this record.
    pub fn write_payload(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "entity": self.entity,
            "private": self.private,
            "customData": self.custom_data,
        })
    }
}

impl Identified for Collection {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_payload_keeps_foreign_key_but_not_denormalized_name() {
        let collection: Collection = serde_json::from_value(json!({
            "id": "c1",
            "name": "stall",
            "entity": "e1",
            "entityName": "oink",
            "size": 99,
        }))
        .unwrap();

        let payload = collection.write_payload();
        assert_eq!(payload["entity"], "e1");
        assert!(payload.get("entityName").is_none());
        assert!(payload.get("size").is_none());
    }
}
