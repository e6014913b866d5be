// ── Image domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Identified;

/// A stored image (one blob, possibly multiple tags) inside a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    /// Owning container id (foreign key).
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Blob storage reference.
    #[serde(default)]
    pub blob: Option<String>,
    /// Content digest (e.g. `sha256.<hex>`).
    #[serde(default)]
    pub hash: Option<String>,
    /// Tags pointing at this image, in server order.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub uploaded: bool,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub download_count: Option<u64>,

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

impl Image {
    /// Serialize the server-writable subset of this record.
    pub fn write_payload(&self) -> Value {
        json!({
            "container": self.container,
            "description": self.description,
            "hash": self.hash,
            "blob": self.blob,
        })
    }
}

impl Identified for Image {
    fn id(&self) -> &str {
        &self.id
    }
}
