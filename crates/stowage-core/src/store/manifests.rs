// ── Manifests store module ──

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::Manifest;

pub struct Manifests {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Manifest>,
}

impl Manifests {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Manifest> {
        &self.cache
    }

    /// `GET /v1/containers/{entity}/{collection}/{container}/manifests`
    /// -- full cache replace.
    pub async fn list(
        &self,
        entity: &str,
        collection: &str,
        container: &str,
    ) -> Result<Vec<Manifest>, Error> {
        let token = self.cache.begin_fetch();
        match self
            .client
            .get::<Vec<Manifest>>(&format!(
                "containers/{entity}/{collection}/{container}/manifests"
            ))
            .await
        {
            Ok(manifests) => {
                self.cache.finish_fetch(token, manifests.clone());
                Ok(manifests)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/manifests/{id}/config` -- the config blob belonging to
    /// a manifest.
    ///
    /// The endpoint is addressed by manifest id; the server resolves
    /// the blob itself. `content.config.digest` only tells us whether a
    /// config blob exists at all: when absent, this fails fast with
    /// [`Error::MissingReference`] -- no request, no `Loading`
    /// transition.
    pub async fn get_config(&self, manifest: &Manifest) -> Result<Value, Error> {
        let digest = manifest
            .config_digest()
            .ok_or(Error::MissingReference("manifest has no config digest"))?;
        debug!(digest, "fetching manifest config blob");

        self.cache.start();
        match self
            .client
            .get::<Value>(&format!("manifests/{}/config", manifest.id))
            .await
        {
            Ok(config) => {
                self.cache.succeed();
                Ok(config)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }
}
