// ── Groups store module ──

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::{Group, GroupMember, Identified};

pub struct Groups {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Group>,
}

impl Groups {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Group> {
        &self.cache
    }

    /// Derived getter: cached group by natural key.
    pub fn by_name(&self, name: &str) -> Option<Group> {
        self.cache.find(|g| g.name == name)
    }

    /// `GET /v1/groups` -- full cache replace.
    pub async fn list(&self) -> Result<Vec<Group>, Error> {
        let token = self.cache.begin_fetch();
        match self.client.get::<Vec<Group>>("groups").await {
            Ok(groups) => {
                self.cache.finish_fetch(token, groups.clone());
                Ok(groups)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/groups/{name}`.
    pub async fn get(&self, name: &str) -> Result<Group, Error> {
        self.cache.start();
        match self.client.get::<Group>(&format!("groups/{name}")).await {
            Ok(group) => {
                self.cache.upsert(group.clone());
                self.cache.succeed();
                Ok(group)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `POST /v1/groups`.
    pub async fn create(&self, group: &Group) -> Result<Group, Error> {
        self.cache.start();
        match self
            .client
            .post::<Group>("groups", &group.write_payload(false))
            .await
        {
            Ok(created) => {
                debug!(name = %created.name, "group created");
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

    /// `PUT /v1/groups/{name}`.
    pub async fn update(&self, group: &Group) -> Result<Group, Error> {
        self.cache.start();
        match self
            .client
            .put::<Group>(&format!("groups/{}", group.name), &group.write_payload(false))
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

    /// `DELETE /v1/groups/{name}`.
    pub async fn delete(&self, group: &Group) -> Result<(), Error> {
        self.cache.start();
        match self.client.delete(&format!("groups/{}", group.name)).await {
            Ok(()) => {
                self.cache.remove(group.id());
                self.cache.succeed();
                Ok(())
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `PUT /v1/groups/{name}/members` -- atomically replace the full
    /// membership list server-side. The cached group is updated with
    /// the server's echoed member list.
    pub async fn set_members(
        &self,
        group: &Group,
        members: &[GroupMember],
    ) -> Result<Vec<GroupMember>, Error> {
        let payload =
            Value::Array(members.iter().map(GroupMember::write_payload).collect());
        self.cache.start();
        match self
            .client
            .put::<Vec<GroupMember>>(&format!("groups/{}/members", group.name), &payload)
            .await
        {
            Ok(confirmed) => {
                let mut updated = group.clone();
                updated.members = Some(confirmed.clone());
                self.cache.upsert(updated);
                self.cache.succeed();
                Ok(confirmed)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }
}
