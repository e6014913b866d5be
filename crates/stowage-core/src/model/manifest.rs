// ── Manifest domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Identified;

/// An OCI-style manifest attached to a container.
///
/// `content` is kept as arbitrary structured JSON -- the registry
/// accepts several manifest schemas and this layer only ever inspects
/// the optional `config.digest` blob reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: Value,

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

impl Manifest {
    /// The `config.digest` blob reference inside the manifest content,
    /// if the manifest carries one.
    pub fn config_digest(&self) -> Option<&str> {
        self.content.get("config")?.get("digest")?.as_str()
    }
}

impl Identified for Manifest {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_digest_resolves_nested_reference() {
        let manifest: Manifest = serde_json::from_value(json!({
            "id": "m1",
            "content": { "config": { "digest": "sha256:abc" } },
        }))
        .unwrap();
        assert_eq!(manifest.config_digest(), Some("sha256:abc"));

        let bare: Manifest =
            serde_json::from_value(json!({ "id": "m2", "content": {} })).unwrap();
        assert_eq!(bare.config_digest(), None);
    }
}
