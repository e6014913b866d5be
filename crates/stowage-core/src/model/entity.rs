// ── Entity domain type ──
//
// Top level of the registry namespace hierarchy:
// entity / collection / container / image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;

/// A registry namespace entity. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_data: Option<String>,
    /// New collections under this entity default to private.
    #[serde(default)]
    pub default_private: bool,
    /// Storage quota in bytes; 0 or absent means unlimited.
    #[serde(default)]
    pub quota: Option<u64>,
    /// Current storage use in bytes -- server-computed.
    #[serde(default)]
    pub size: Option<u64>,
    /// Ids of owned collections (reference only, never embedded).
    #[serde(default)]
    pub collections: Option<Vec<String>>,

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

impl Entity {
    /// Serialize the server-writable subset of this record.
    pub fn write_payload(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "customData": self.custom_data,
            "defaultPrivate": self.default_private,
            "quota": self.quota,
        })
    }
}

impl Identified for Entity {
    fn id(&self) -> &str {
        &self.id
    }
}
