// ── Users store module ──

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::{Container, Identified, User};

/// State container for registry accounts, plus the session user's
/// starred containers -- a lazily loaded per-user cache that must be
/// reset whenever the session identity changes.
pub struct Users {
    client: Arc<RegistryClient>,
    cache: ResourceCache<User>,
    starred: ResourceCache<Container>,
    starred_loaded: AtomicBool,
}

impl Users {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
            starred: ResourceCache::new(),
            starred_loaded: AtomicBool::new(false),
        }
    }

    pub fn cache(&self) -> &ResourceCache<User> {
        &self.cache
    }

    pub fn starred_cache(&self) -> &ResourceCache<Container> {
        &self.starred
    }

    /// Whether the starred list has been fetched for the current
    /// session user.
    pub fn starred_loaded(&self) -> bool {
        self.starred_loaded.load(Ordering::SeqCst)
    }

    /// Derived getter: cached account by username.
    pub fn by_username(&self, username: &str) -> Option<User> {
        self.cache.find(|u| u.username == username)
    }

    /// `GET /v1/users` -- full cache replace.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        let token = self.cache.begin_fetch();
        match self.client.get::<Vec<User>>("users").await {
            Ok(users) => {
                self.cache.finish_fetch(token, users.clone());
                Ok(users)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `GET /v1/users/{username}`.
    pub async fn get(&self, username: &str) -> Result<User, Error> {
        self.cache.start();
        match self.client.get::<User>(&format!("users/{username}")).await {
            Ok(user) => {
                self.cache.upsert(user.clone());
                self.cache.succeed();
                Ok(user)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `POST /v1/users`.
    pub async fn create(&self, user: &User) -> Result<User, Error> {
        self.cache.start();
        match self
            .client
            .post::<User>("users", &user.write_payload(false))
            .await
        {
            Ok(created) => {
                debug!(username = %created.username, "user created");
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

    /// `PUT /v1/users/{username}`.
    pub async fn update(&self, user: &User) -> Result<User, Error> {
        self.cache.start();
        match self
            .client
            .put::<User>(&format!("users/{}", user.username), &user.write_payload(false))
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

    /// `DELETE /v1/users/{username}`.
    pub async fn delete(&self, user: &User) -> Result<(), Error> {
        self.cache.start();
        match self.client.delete(&format!("users/{}", user.username)).await {
            Ok(()) => {
                self.cache.remove(user.id());
                self.cache.succeed();
                Ok(())
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    // ── Starred containers ───────────────────────────────────────────

    /// `GET /v1/users/{username}/stars`, served from cache after the
    /// first successful fetch.
    pub async fn starred(&self, username: &str) -> Result<Vec<Container>, Error> {
        if self.starred_loaded() {
            return Ok(self.starred.items());
        }
        let token = self.starred.begin_fetch();
        match self
            .client
            .get::<Vec<Container>>(&format!("users/{username}/stars"))
            .await
        {
            Ok(stars) => {
                if self.starred.finish_fetch(token, stars.clone()) {
                    self.starred_loaded.store(true, Ordering::SeqCst);
                }
                Ok(stars)
            }
            Err(err) => {
                self.starred.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `POST /v1/users/{username}/stars/{containerId}` -- the server
    /// answers with the full post-mutation star list, which replaces
    /// the cache wholesale.
    pub async fn add_star(
        &self,
        username: &str,
        container: &Container,
    ) -> Result<Vec<Container>, Error> {
        let token = self.starred.begin_fetch();
        match self
            .client
            .post_empty::<Vec<Container>>(&format!("users/{username}/stars/{}", container.id()))
            .await
        {
            Ok(stars) => {
                if self.starred.finish_fetch(token, stars.clone()) {
                    self.starred_loaded.store(true, Ordering::SeqCst);
                }
                Ok(stars)
            }
            Err(err) => {
                self.starred.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `DELETE /v1/users/{username}/stars/{containerId}` -- like
    /// [`add_star`](Self::add_star), replaces the cache with the
    /// server's authoritative list.
    pub async fn remove_star(
        &self,
        username: &str,
        container: &Container,
    ) -> Result<Vec<Container>, Error> {
        let token = self.starred.begin_fetch();
        match self
            .client
            .delete_json::<Vec<Container>>(&format!("users/{username}/stars/{}", container.id()))
            .await
        {
            Ok(stars) => {
                if self.starred.finish_fetch(token, stars.clone()) {
                    self.starred_loaded.store(true, Ordering::SeqCst);
                }
                Ok(stars)
            }
            Err(err) => {
                self.starred.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// Drop per-user state (starred cache + loaded flag). Called by the
    /// session layer on login and logout so a new session never sees
    /// the previous user's data.
    pub(crate) fn reset_user_state(&self) {
        self.starred.reset();
        self.starred_loaded.store(false, Ordering::SeqCst);
    }
}
