// ── Container domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;

/// A named container of images inside a collection.
///
/// `collection` is the owning collection's opaque id;
/// `collection_name`/`entity_name` are read-only denormalized
/// projections. `stars`, `download_count`, `size`, and `tags` are
/// server-derived and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    pub name: String,
    /// Owning collection id (foreign key).
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub custom_data: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub stars: Option<u64>,
    #[serde(default)]
    pub download_count: Option<u64>,
    #[serde(default)]
    pub vcs_url: Option<String>,
    /// Derived from the container's tagged images, not owned.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

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

impl Container {
    /// Serialize the server-writable subset of this record.
    pub fn write_payload(&self) -> Value {
        json!({
            "collection": self.collection,
            "customData": self.custom_data,
            "description": self.description,
            "fullDescription": self.full_description,
            "name": self.name,
            "private": self.private,
            "readOnly": self.read_only,
            "vcsUrl": self.vcs_url,
        })
    }

    /// `entity/collection` path segment for container-scoped endpoints,
    /// when both denormalized names are known.
    pub fn path_prefix(&self) -> Option<String> {
        match (&self.entity_name, &self.collection_name) {
            (Some(entity), Some(collection)) => Some(format!("{entity}/{collection}")),
            _ => None,
        }
    }
}

impl Identified for Container {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One entry of the global "latest uploads" feed: a container together
/// with the tags touched by its most recent pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestContainer {
    pub container: Container,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_payload_matches_allowlist() {
        let container: Container = serde_json::from_value(json!({
            "id": "1",
            "name": "zebra",
            "collection": "c1",
            "collectionName": "stall",
            "entityName": "oink",
            "stars": 7,
            "downloadCount": 42,
            "readOnly": true,
            "vcsUrl": "https://example.org/zebra.git",
        }))
        .unwrap();

        let payload = container.write_payload();
        assert_eq!(payload["collection"], "c1");
        assert_eq!(payload["readOnly"], true);
        assert_eq!(payload["vcsUrl"], "https://example.org/zebra.git");
        for server_owned in ["id", "stars", "downloadCount", "collectionName", "entityName"] {
            assert!(payload.get(server_owned).is_none(), "{server_owned} leaked");
        }
    }

    #[test]
    fn path_prefix_requires_both_names() {
        let full: Container = serde_json::from_value(json!({
            "id": "1", "name": "zebra", "collectionName": "stall", "entityName": "oink",
        }))
        .unwrap();
        assert_eq!(full.path_prefix().as_deref(), Some("oink/stall"));

        let partial: Container =
            serde_json::from_value(json!({ "id": "2", "name": "esel" })).unwrap();
        assert_eq!(partial.path_prefix(), None);
    }
}
