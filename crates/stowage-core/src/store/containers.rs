// ── Containers store module ──

use std::sync::Arc;

use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::ResolveCollection;
use super::cache::ResourceCache;
use crate::model::{Container, Identified, LatestContainer};

impl Identified for LatestContainer {
    fn id(&self) -> &str {
        &self.container.id
    }
}

/// State container for containers. Scoped paths require the owning
/// entity and collection names; the global "latest uploads" feed is
/// cached independently of that scoping.
pub struct Containers {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Container>,
    latest: ResourceCache<LatestContainer>,
    /// Capability for resolving a collection name to its id when a
    /// container is created with only denormalized names supplied.
    resolver: Arc<dyn ResolveCollection>,
}

impl Containers {
    pub(crate) fn new(client: Arc<RegistryClient>, resolver: Arc<dyn ResolveCollection>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
            latest: ResourceCache::new(),
            resolver,
        }
    }

    pub fn cache(&self) -> &ResourceCache<Container> {
        &self.cache
    }

    /// The cached global feed.
    pub fn latest_cache(&self) -> &ResourceCache<LatestContainer> {
        &self.latest
    }

    /// Derived getter: cached container by scope + name.
    pub fn by_name(&self, entity: &str, collection: &str, name: &str) -> Option<Container> {
        self.cache.find(|c| {
            c.entity_name.as_deref() == Some(entity)
                && c.collection_name.as_deref() == Some(collection)
                && c.name == name
        })
    }

    fn scoped_path(container: &Container) -> Result<String, Error> {
        let prefix = container
            .path_prefix()
            .ok_or(Error::MissingReference("container has no entity/collection names"))?;
        Ok(format!("containers/{prefix}/{}", container.name))
    }

    /// `GET /v1/containers/{entity}/{collection}` -- full cache replace.
    ///
    /// The cache holds one scope at a time: listing a different
    /// collection replaces entries from the previous one.
    pub async fn list(&self, entity: &str, collection: &str) -> Result<Vec<Container>, Error> {
        let token = self.cache.begin_fetch();
        match self
            .client
            .get::<Vec<Container>>(&format!("containers/{entity}/{collection}"))
            .await
        {
            Ok(containers) => {
                self.cache.finish_fetch(token, containers.clone());
                Ok(containers)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/latest` -- the registry-wide recent-upload feed,
    /// independent of entity/collection scoping.
    pub async fn latest(&self) -> Result<Vec<LatestContainer>, Error> {
        let token = self.latest.begin_fetch();
        match self.client.get::<Vec<LatestContainer>>("latest").await {
            Ok(feed) => {
                self.latest.finish_fetch(token, feed.clone());
                Ok(feed)
            }
            Err(err) => {
                self.latest.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/containers/{entity}/{collection}/{name}`.
    pub async fn get(
        &self,
        entity: &str,
        collection: &str,
        name: &str,
    ) -> Result<Container, Error> {
        self.cache.start();
        match self
            .client
            .get::<Container>(&format!("containers/{entity}/{collection}/{name}"))
            .await
        {
            Ok(container) => {
                self.cache.upsert(container.clone());
                self.cache.succeed();
                Ok(container)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `POST /v1/containers`.
    ///
    /// When the record carries no collection id, the owning collection
    /// is resolved from the denormalized entity/collection names first
    /// (through the injected [`ResolveCollection`] capability).
    pub async fn create(&self, container: &Container) -> Result<Container, Error> {
        let mut payload = container.write_payload();
        if container.collection.is_none() {
            let entity = container
                .entity_name
                .as_deref()
                .ok_or(Error::MissingReference("container has no collection or entityName"))?;
            let name = container
                .collection_name
                .as_deref()
                .ok_or(Error::MissingReference("container has no collection or collectionName"))?;
            let resolved = self.resolver.resolve(entity, name).await?;
            debug!(collection = %resolved, "resolved owning collection");
            payload["collection"] = serde_json::Value::String(resolved);
        }

        self.cache.start();
        match self.client.post::<Container>("containers", &payload).await {
            Ok(created) => {
                debug!(name = %created.name, "container created");
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

    /// `PUT /v1/containers/{entity}/{collection}/{name}`.
    pub async fn update(&self, container: &Container) -> Result<Container, Error> {
        let path = Self::scoped_path(container)?;
        self.cache.start();
        match self
            .client
            .put::<Container>(&path, &container.write_payload())
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

    /// `DELETE /v1/containers/{entity}/{collection}/{name}`.
    pub async fn delete(&self, container: &Container) -> Result<(), Error> {
        let path = Self::scoped_path(container)?;
        self.cache.start();
        match self.client.delete(&path).await {
            Ok(()) => {
                self.cache.remove(container.id());
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
