// ── Images store module ──
//
// Images are read-only from this layer: pushes happen through the
// upload protocol, not the web API, so the module only lists and
// inspects what a container holds.

use std::sync::Arc;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::Image;

pub struct Images {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Image>,
}

impl Images {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Image> {
        &self.cache
    }

    /// Derived getter: cached images carrying the given tag.
    pub fn by_tag(&self, tag: &str) -> Vec<Image> {
        self.cache
            .items()
            .into_iter()
            .filter(|image| image.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// `GET /v1/containers/{entity}/{collection}/{container}/images`
    /// -- full cache replace.
    pub async fn list(
        &self,
        entity: &str,
        collection: &str,
        container: &str,
    ) -> Result<Vec<Image>, Error> {
        let token = self.cache.begin_fetch();
        match self
            .client
            .get::<Vec<Image>>(&format!(
                "containers/{entity}/{collection}/{container}/images"
            ))
            .await
        {
            Ok(images) => {
                self.cache.finish_fetch(token, images.clone());
                Ok(images)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }
}
