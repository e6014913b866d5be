// ── Search result aggregate ──

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::container::Container;
use super::entity::Entity;
use super::image::Image;

/// Aggregate, non-persistent search response: parallel match lists per
/// record kind. No identity, never cached by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub entity: Vec<Entity>,
    #[serde(default)]
    pub collection: Vec<Collection>,
    #[serde(default)]
    pub container: Vec<Container>,
    #[serde(default)]
    pub image: Vec<Image>,
}

impl SearchResults {
    /// Total number of matches across all record kinds.
    pub fn len(&self) -> usize {
        self.entity.len() + self.collection.len() + self.container.len() + self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
