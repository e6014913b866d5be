// ── Collections store module ──

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::ResolveCollection;
use super::cache::ResourceCache;
use crate::model::{Collection, Identified};

/// State container for collections. List and read paths are scoped by
/// the owning entity's name.
pub struct Collections {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Collection>,
}

impl Collections {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Collection> {
        &self.cache
    }

    /// Derived getter: cached collection by entity + name.
    pub fn by_name(&self, entity: &str, name: &str) -> Option<Collection> {
        self.cache
            .find(|c| c.entity_name.as_deref() == Some(entity) && c.name == name)
    }

    /// The owning entity name for path construction; a local
    /// precondition, checked before any request is sent.
    fn entity_segment(collection: &Collection) -> Result<&str, Error> {
        collection
            .entity_name
            .as_deref()
            .ok_or(Error::MissingReference("collection has no entityName"))
    }

    /// `GET /v1/collections/{entity}` -- full cache replace.
    ///
    /// Replaces the whole cache even though the listing is scoped to
    /// one entity; mixing scopes across calls therefore drops the
    /// previous scope's entries.
    pub async fn list(&self, entity: &str) -> Result<Vec<Collection>, Error> {
        let token = self.cache.begin_fetch();
        match self
            .client
            .get::<Vec<Collection>>(&format!("collections/{entity}"))
            .await
        {
            Ok(collections) => {
                self.cache.finish_fetch(token, collections.clone());
                Ok(collections)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/collections/{entity}/{name}` -- upsert into the cache.
    pub async fn get(&self, entity: &str, name: &str) -> Result<Collection, Error> {
        self.cache.start();
        match self
            .client
            .get::<Collection>(&format!("collections/{entity}/{name}"))
            .await
        {
            Ok(collection) => {
                self.cache.upsert(collection.clone());
                self.cache.succeed();
                Ok(collection)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `POST /v1/collections`.
    pub async fn create(&self, collection: &Collection) -> Result<Collection, Error> {
        self.cache.start();
        match self
            .client
            .post::<Collection>("collections", &collection.write_payload())
            .await
        {
            Ok(created) => {
                debug!(name = %created.name, "collection created");
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

    /// `PUT /v1/collections/{entity}/{name}`.
    pub async fn update(&self, collection: &Collection) -> Result<Collection, Error> {
        let entity = Self::entity_segment(collection)?;
        let path = format!("collections/{entity}/{}", collection.name);
        self.cache.start();
        match self
            .client
            .put::<Collection>(&path, &collection.write_payload())
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

    /// `DELETE /v1/collections/{entity}/{name}`.
    pub async fn delete(&self, collection: &Collection) -> Result<(), Error> {
        let entity = Self::entity_segment(collection)?;
        let path = format!("collections/{entity}/{}", collection.name);
        self.cache.start();
        match self.client.delete(&path).await {
            Ok(()) => {
                self.cache.remove(collection.id());
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

impl ResolveCollection for Collections {
    fn resolve<'a>(
        &'a self,
        entity: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move {
            let collection = self.get(entity, name).await?;
            Ok(collection.id)
        })
    }
}
