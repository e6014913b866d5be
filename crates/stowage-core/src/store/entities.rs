// ── Entities store module ──

use std::sync::Arc;

use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::{Entity, Identified};

/// State container for the registry's top-level namespace entities.
pub struct Entities {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Entity>,
}

impl Entities {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    /// The cached list and status flag.
    pub fn cache(&self) -> &ResourceCache<Entity> {
        &self.cache
    }

    /// Derived getter: cached entity by natural key.
    pub fn by_name(&self, name: &str) -> Option<Entity> {
        self.cache.find(|e| e.name == name)
    }

    /// `GET /v1/entities` -- full cache replace.
    pub async fn list(&self) -> Result<Vec<Entity>, Error> {
        let token = self.cache.begin_fetch();
        match self.client.get::<Vec<Entity>>("entities").await {
            Ok(entities) => {
                self.cache.finish_fetch(token, entities.clone());
                Ok(entities)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/entities/{name}` -- upsert into the cache.
    pub async fn get(&self, name: &str) -> Result<Entity, Error> {
        self.cache.start();
        match self.client.get::<Entity>(&format!("entities/{name}")).await {
            Ok(entity) => {
                self.cache.upsert(entity.clone());
                self.cache.succeed();
                Ok(entity)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `POST /v1/entities` -- upsert the server echo into the cache.
    pub async fn create(&self, entity: &Entity) -> Result<Entity, Error> {
        self.cache.start();
        match self
            .client
            .post::<Entity>("entities", &entity.write_payload())
            .await
        {
            Ok(created) => {
                debug!(name = %created.name, "entity created");
                self.cache.upsert(created.clone());
                self.cache.succeed();
                Ok(created)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `PUT /v1/entities/{name}` -- natural-key addressed update.
    pub async fn update(&self, entity: &Entity) -> Result<Entity, Error> {
        self.cache.start();
        match self
            .client
            .put::<Entity>(&format!("entities/{}", entity.name), &entity.write_payload())
            .await
        {
            Ok(updated) => {
                self.cache.upsert(updated.clone());
                self.cache.succeed();
                Ok(updated)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `DELETE /v1/entities/{name}` -- drop the matching cache entry.
    pub async fn delete(&self, entity: &Entity) -> Result<(), Error> {
        self.cache.start();
        match self.client.delete(&format!("entities/{}", entity.name)).await {
            Ok(()) => {
                self.cache.remove(entity.id());
                self.cache.succeed();
                Ok(())
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }
}
